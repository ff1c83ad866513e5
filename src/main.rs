// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use sign_gesture_node::{
    api::{start_server, AppState},
    classifier::{GestureClassifier, LabelMap, OnnxGestureModel},
    config::ServiceConfig,
    version,
    vision::{PreprocessConfig, Preprocessor},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting {}", version::get_version_string());
    info!("Build: {}", version::VERSION);
    info!("Features: {}", version::FEATURES.join(", "));

    let config = ServiceConfig::parse();
    config.validate().context("Invalid configuration")?;

    // Load labels and model; the service does not start without them
    let labels = LabelMap::from_json_file(&config.model.class_indices_path).with_context(|| {
        format!(
            "Failed to load class indices from {}",
            config.model.class_indices_path.display()
        )
    })?;
    info!("Loaded {} class labels", labels.len());

    let model = OnnxGestureModel::load(
        &config.model.model_path,
        labels,
        config.model.intra_threads,
    )
    .context("Failed to load gesture model")?;
    let classifier: Arc<dyn GestureClassifier> = Arc::new(model);

    let preprocessor = Preprocessor::new(PreprocessConfig::default().with_img_size(config.img_size))
        .context("Invalid preprocessing configuration")?;

    if let Some(dir) = &config.debug_dump_dir {
        info!("Debug images will be written to {}", dir.display());
    }

    let state = AppState::new(Some(classifier), preprocessor)
        .with_debug_dump_dir(config.debug_dump_dir.clone());

    start_server(&config, state).await
}
