// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Gesture classification on preprocessed tensors
//!
//! Components:
//! - `labels` - class index file written by training
//! - `onnx_model` - ONNX Runtime wrapper around the trained CNN
//! - `classify` - arg-max over the model scores

pub mod labels;
pub mod onnx_model;

pub use labels::{LabelError, LabelMap};
pub use onnx_model::{OnnxGestureModel, DEFAULT_INTRA_THREADS};

use anyhow::Result;
use ndarray::Array4;
use serde::{Deserialize, Serialize};

/// Anything that can score a preprocessed gesture tensor
///
/// `predict_scores` returns one score per label, in label-index order.
pub trait GestureClassifier: Send + Sync {
    fn predict_scores(&self, input: &Array4<f32>) -> Result<Vec<f32>>;

    fn labels(&self) -> &LabelMap;
}

/// The winning class for one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub index: usize,
    pub confidence: f32,
}

/// Run the classifier and pick the highest-scoring label
///
/// Ties go to the lowest index.
pub fn classify(classifier: &dyn GestureClassifier, input: &Array4<f32>) -> Result<Prediction> {
    let scores = classifier.predict_scores(input)?;
    let labels = classifier.labels();

    if scores.is_empty() {
        anyhow::bail!("Model returned no scores");
    }
    if scores.len() != labels.len() {
        anyhow::bail!(
            "Model returned {} scores but {} labels are known",
            scores.len(),
            labels.len()
        );
    }
    if scores.iter().any(|s| s.is_nan()) {
        anyhow::bail!("Model returned NaN scores");
    }

    let (index, confidence) = argmax(&scores);
    let label = labels
        .get(index)
        .ok_or_else(|| anyhow::anyhow!("No label for class index {}", index))?
        .to_string();

    Ok(Prediction {
        label,
        index,
        confidence,
    })
}

fn argmax(scores: &[f32]) -> (usize, f32) {
    scores
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, s)| {
            if s > best.1 {
                (i, s)
            } else {
                best
            }
        })
}
