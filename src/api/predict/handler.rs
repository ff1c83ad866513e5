// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction endpoint handler

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::response::PredictResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::classifier::{classify, GestureClassifier, Prediction};
use crate::vision::{decode_image_bytes, write_debug_images, Preprocessor};

/// Multipart field carrying the photo
pub const IMAGE_FIELD: &str = "image";

/// POST /predict - Classify a hand-sign photo
///
/// # Request
/// `multipart/form-data` with the photo in the `image` field.
///
/// # Response
/// - `prediction`: Predicted label
/// - `confidence`: Score of that label
///
/// # Errors
/// - 400 Bad Request: No image field, or the upload could not be decoded
/// - 503 Service Unavailable: Model not loaded
/// - 500 Internal Server Error: Preprocessing or inference failed
pub async fn predict_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    state.metrics.record_request();
    let started = Instant::now();

    match handle_predict(&state, multipart).await {
        Ok(prediction) => {
            state
                .metrics
                .record_success(started.elapsed().as_millis() as u64);
            info!(
                "Prediction: {} ({:.4})",
                prediction.label, prediction.confidence
            );
            Ok(Json(PredictResponse::from(prediction)))
        }
        Err(e) => {
            if e.is_client_error() {
                state.metrics.record_client_error();
            } else {
                state.metrics.record_server_error();
            }
            warn!("Prediction request failed: {}", e);
            Err(e)
        }
    }
}

async fn handle_predict(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Prediction, ApiError> {
    // 1. Pull the upload out of the form
    let data = read_image_field(multipart).await?;
    debug!("Received {} byte upload", data.len());

    // 2. Model must be present
    let classifier = state.classifier.clone().ok_or(ApiError::ModelUnavailable)?;

    // 3. Decode, preprocess and classify off the async runtime
    let preprocessor = state.preprocessor.clone();
    let debug_dir = state.debug_dump_dir.clone();

    tokio::task::spawn_blocking(move || {
        run_pipeline(
            &*classifier,
            &preprocessor,
            debug_dir.as_deref(),
            &data,
        )
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("Prediction task failed: {}", e)))?
}

async fn read_image_field(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Bytes, ApiError> {
    // A body that is not a multipart form cannot carry an image
    let mut multipart = multipart.map_err(|_| ApiError::MissingImage)?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(IMAGE_FIELD) {
            return field.bytes().await.map_err(multipart_error);
        }
    }

    Err(ApiError::MissingImage)
}

/// Only the size limit gets its own status; any other broken form carries no usable image
fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        debug!("Unreadable multipart body: {}", e.body_text());
        ApiError::MissingImage
    }
}

fn run_pipeline(
    classifier: &dyn GestureClassifier,
    preprocessor: &Preprocessor,
    debug_dir: Option<&Path>,
    data: &[u8],
) -> Result<Prediction, ApiError> {
    let (image, info) = decode_image_bytes(data).map_err(|e| ApiError::InvalidImage(e.to_string()))?;
    debug!(
        "Decoded image: {}x{} {:?}",
        info.width, info.height, info.format
    );

    let prepared = preprocessor
        .prepare(&image)
        .map_err(|e| ApiError::InternalError(format!("Preprocessing failed: {}", e)))?;

    if let Some(dir) = debug_dir {
        if let Err(e) = write_debug_images(dir, &image, prepared.thresholded.as_ref()) {
            warn!("Failed to write debug images: {:#}", e);
        }
    }

    classify(classifier, &prepared.tensor).map_err(|e| ApiError::InternalError(e.to_string()))
}
