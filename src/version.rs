// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Sign Gesture Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-adaptive-threshold-2025-11-02";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-11-02";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "onnx-inference",
    "adaptive-threshold",
    "morphological-open",
    "multipart-upload",
    "debug-dumps",
    "prometheus-metrics",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Sign Gesture Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
