// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX gesture classifier
//!
//! Wraps an ONNX Runtime session around the CNN exported from the training
//! run. The graph takes one NHWC tensor `[1, H, W, 1]` and produces one
//! softmax vector `[1, num_classes]`.

use anyhow::{anyhow, Context, Result};
use ndarray::Array4;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::labels::LabelMap;
use super::GestureClassifier;

/// Default number of intra-op threads for the CPU session
pub const DEFAULT_INTRA_THREADS: usize = 4;

/// CNN gesture classifier backed by ONNX Runtime (CPU only)
#[derive(Clone)]
pub struct OnnxGestureModel {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    /// Model output name
    output_name: String,
    /// Index -> label lookup
    labels: LabelMap,
    /// Model file stem, used in logs
    model_name: String,
}

impl std::fmt::Debug for OnnxGestureModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxGestureModel")
            .field("model_name", &self.model_name)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("num_classes", &self.labels.len())
            .finish_non_exhaustive()
    }
}

impl OnnxGestureModel {
    /// Load the classifier graph
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    pub fn load<P: AsRef<Path>>(
        model_path: P,
        labels: LabelMap,
        intra_threads: usize,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Gesture model not found: {}", model_path.display());
        }

        info!("Loading gesture model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(intra_threads.max(1))
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| {
                format!("Failed to load gesture model from {}", model_path.display())
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| anyhow!("Gesture model declares no inputs"))?;

        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| anyhow!("Gesture model declares no outputs"))?;

        if let Some(input) = session.inputs.first() {
            debug!("Gesture model input type: {:?}", input.input_type);
        }

        let model_name = model_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());

        info!(
            "Gesture model loaded (input: {}, output: {}, classes: {})",
            input_name,
            output_name,
            labels.len()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            output_name,
            labels,
            model_name,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl GestureClassifier for OnnxGestureModel {
    fn predict_scores(&self, input: &Array4<f32>) -> Result<Vec<f32>> {
        let shape = input.shape();
        if shape[0] != 1 || shape[3] != 1 {
            anyhow::bail!("Invalid input shape: {:?}, expected [1, H, W, 1]", shape);
        }

        let input_value =
            Value::from_array(input.to_owned()).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("Gesture model session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Gesture inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        debug!("Gesture model output shape: {:?}", output_tensor.shape());

        let scores: Vec<f32> = output_tensor.iter().copied().collect();
        Ok(scores)
    }

    fn labels(&self) -> &LabelMap {
        &self.labels
    }
}
