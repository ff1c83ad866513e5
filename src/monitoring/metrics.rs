// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction Prometheus Metrics
//!
//! Counters for the `/predict` endpoint, exported as Prometheus text.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Prediction metrics for Prometheus
///
/// Cloning shares the underlying counters.
#[derive(Debug, Clone)]
pub struct PredictionMetrics {
    /// Number of prediction requests received
    requests_total: Arc<AtomicU64>,
    /// Number of requests answered with a prediction
    predictions_success: Arc<AtomicU64>,
    /// Number of requests rejected with a 4xx
    client_errors: Arc<AtomicU64>,
    /// Number of requests failed with a 5xx
    server_errors: Arc<AtomicU64>,
    /// Total decode + preprocess + inference time in milliseconds
    inference_duration_ms: Arc<AtomicU64>,
}

impl PredictionMetrics {
    pub fn new() -> Self {
        Self {
            requests_total: Arc::new(AtomicU64::new(0)),
            predictions_success: Arc::new(AtomicU64::new(0)),
            client_errors: Arc::new(AtomicU64::new(0)),
            server_errors: Arc::new(AtomicU64::new(0)),
            inference_duration_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self, duration_ms: u64) {
        self.predictions_success.fetch_add(1, Ordering::Relaxed);
        self.inference_duration_ms
            .fetch_add(duration_ms, Ordering::Relaxed);
    }

    pub fn record_client_error(&self) {
        self.client_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_server_error(&self) {
        self.server_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests_total(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }

    pub fn predictions_success(&self) -> u64 {
        self.predictions_success.load(Ordering::Relaxed)
    }

    pub fn client_errors(&self) -> u64 {
        self.client_errors.load(Ordering::Relaxed)
    }

    pub fn server_errors(&self) -> u64 {
        self.server_errors.load(Ordering::Relaxed)
    }

    /// Average latency of successful predictions
    pub fn avg_inference_ms(&self) -> f64 {
        let total_ms = self.inference_duration_ms.load(Ordering::Relaxed);
        let count = self.predictions_success.load(Ordering::Relaxed);

        if count == 0 {
            0.0
        } else {
            total_ms as f64 / count as f64
        }
    }

    pub fn export_prometheus(&self) -> String {
        format!(
            r#"# HELP sign_prediction_requests_total Total number of prediction requests
# TYPE sign_prediction_requests_total counter
sign_prediction_requests_total {}

# HELP sign_prediction_success_total Number of successful predictions
# TYPE sign_prediction_success_total counter
sign_prediction_success_total {}

# HELP sign_prediction_client_errors_total Number of requests rejected as invalid
# TYPE sign_prediction_client_errors_total counter
sign_prediction_client_errors_total {}

# HELP sign_prediction_server_errors_total Number of requests that failed server-side
# TYPE sign_prediction_server_errors_total counter
sign_prediction_server_errors_total {}

# HELP sign_prediction_duration_ms_avg Average prediction latency in milliseconds
# TYPE sign_prediction_duration_ms_avg gauge
sign_prediction_duration_ms_avg {:.2}
"#,
            self.requests_total(),
            self.predictions_success(),
            self.client_errors(),
            self.server_errors(),
            self.avg_inference_ms(),
        )
    }
}

impl Default for PredictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
