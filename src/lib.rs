// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod monitoring;
pub mod version;
pub mod vision;

pub use api::{create_router, AppState};
pub use classifier::{classify, GestureClassifier, LabelMap, OnnxGestureModel, Prediction};
pub use config::ServiceConfig;
pub use vision::{PreprocessConfig, PreprocessMode, Preprocessor};
