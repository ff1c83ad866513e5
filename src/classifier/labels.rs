// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Class index mapping written alongside the trained model
//!
//! The training run stores `{"label": index, ...}`; inference needs the
//! reverse direction.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("Failed to read class indices: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid class indices JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Class indices are empty")]
    Empty,

    #[error("Index {index} is assigned to both '{first}' and '{second}'")]
    DuplicateIndex {
        index: usize,
        first: String,
        second: String,
    },

    #[error("Class indices are not contiguous: index {0} has no label")]
    MissingIndex(usize),
}

/// Index -> label lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    labels: Vec<String>,
}

impl LabelMap {
    /// Build from labels already ordered by index
    pub fn new(labels: Vec<String>) -> Result<Self, LabelError> {
        if labels.is_empty() {
            return Err(LabelError::Empty);
        }
        Ok(Self { labels })
    }

    /// Invert a `label -> index` map; indices must cover `0..n` exactly once
    pub fn from_indices(indices: HashMap<String, usize>) -> Result<Self, LabelError> {
        if indices.is_empty() {
            return Err(LabelError::Empty);
        }

        let mut entries: Vec<(usize, String)> =
            indices.into_iter().map(|(label, index)| (index, label)).collect();
        entries.sort();

        let mut labels: Vec<String> = Vec::with_capacity(entries.len());
        for (index, label) in entries {
            match index.cmp(&labels.len()) {
                Ordering::Equal => labels.push(label),
                Ordering::Less => {
                    return Err(LabelError::DuplicateIndex {
                        index,
                        first: labels[index].clone(),
                        second: label,
                    })
                }
                Ordering::Greater => return Err(LabelError::MissingIndex(labels.len())),
            }
        }

        Ok(Self { labels })
    }

    pub fn from_json_str(json: &str) -> Result<Self, LabelError> {
        let indices: HashMap<String, usize> = serde_json::from_str(json)?;
        Self::from_indices(indices)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, LabelError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
