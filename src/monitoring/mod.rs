// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// src/monitoring/mod.rs - Prediction counters

pub mod metrics;

pub use metrics::PredictionMetrics;
