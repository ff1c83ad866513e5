// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers::{health_handler, metrics_handler};
use super::predict::predict_handler;
use crate::classifier::GestureClassifier;
use crate::config::ServiceConfig;
use crate::monitoring::PredictionMetrics;
use crate::vision::Preprocessor;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// `None` when the service runs without a model (health reports it, predict returns 503)
    pub classifier: Option<Arc<dyn GestureClassifier>>,
    pub preprocessor: Arc<Preprocessor>,
    pub debug_dump_dir: Option<PathBuf>,
    pub metrics: PredictionMetrics,
}

impl AppState {
    pub fn new(classifier: Option<Arc<dyn GestureClassifier>>, preprocessor: Preprocessor) -> Self {
        Self {
            classifier,
            preprocessor: Arc::new(preprocessor),
            debug_dump_dir: None,
            metrics: PredictionMetrics::new(),
        }
    }

    pub fn with_debug_dump_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.debug_dump_dir = dir;
        self
    }

    pub fn model_loaded(&self) -> bool {
        self.classifier.is_some()
    }
}

pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Prediction, plus the path the web client posts to
        .route("/predict", post(predict_handler))
        .route("/api/predict", post(predict_handler))
        // Metrics endpoint
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(config: &ServiceConfig, state: AppState) -> Result<()> {
    let app = create_router(state, config.max_upload_bytes);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Sign gesture API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
