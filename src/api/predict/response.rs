// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction response types

use serde::{Deserialize, Serialize};

use crate::classifier::Prediction;

/// Response from a successful prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    /// Predicted gesture label
    pub prediction: String,
    /// Model score for that label (0.0-1.0)
    pub confidence: f32,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            prediction: prediction.label,
            confidence: prediction.confidence,
        }
    }
}
