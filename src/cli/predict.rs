// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::classifier::{classify, LabelMap, OnnxGestureModel};
use crate::config::ModelPaths;
use crate::vision::{load_image_file, PreprocessConfig, PreprocessMode, Preprocessor, IMG_SIZE};

/// Arguments for predict command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Image to classify
    pub image: PathBuf,

    #[command(flatten)]
    pub model: ModelPaths,

    /// Side length the model was trained on
    #[arg(long, env = "IMG_SIZE", default_value_t = IMG_SIZE)]
    pub img_size: u32,
}

/// Run the plain pipeline (grayscale, resize, scale) on one file
pub async fn run_predict(args: PredictArgs) -> Result<()> {
    let labels = LabelMap::from_json_file(&args.model.class_indices_path).with_context(|| {
        format!(
            "Failed to load class indices from {}",
            args.model.class_indices_path.display()
        )
    })?;

    let preprocessor = Preprocessor::new(
        PreprocessConfig::default()
            .with_img_size(args.img_size)
            .with_mode(PreprocessMode::Plain),
    )?;

    let PredictArgs { image, model, .. } = args;

    let prediction = tokio::task::spawn_blocking(move || -> Result<_> {
        let classifier =
            OnnxGestureModel::load(&model.model_path, labels, model.intra_threads)?;
        info!("Using model {}", classifier.model_name());

        let (img, _) = load_image_file(&image)
            .with_context(|| format!("Failed to load {}", image.display()))?;
        let prepared = preprocessor.prepare(&img)?;
        classify(&classifier, &prepared.tensor)
    })
    .await
    .context("Prediction task panicked")??;

    println!("Prediction: {}", prediction.label);
    println!("Confidence: {:.4}", prediction.confidence);
    Ok(())
}
