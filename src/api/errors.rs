// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON body of every failed request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Multipart form lacks an `image` field
    MissingImage,
    /// Upload could not be decoded; the detail is only logged
    InvalidImage(String),
    /// No classifier was loaded at startup
    ModelUnavailable,
    PayloadTooLarge(String),
    InternalError(String),
}

impl ApiError {
    /// Message returned to the client
    pub fn message(&self) -> String {
        match self {
            ApiError::MissingImage => "No image provided".to_string(),
            ApiError::InvalidImage(_) => "Failed to decode image".to_string(),
            ApiError::ModelUnavailable => "Model not loaded".to_string(),
            ApiError::PayloadTooLarge(msg) => msg.clone(),
            ApiError::InternalError(msg) => msg.clone(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.message(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingImage | ApiError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingImage => write!(f, "No image provided"),
            ApiError::InvalidImage(detail) => write!(f, "Failed to decode image: {}", detail),
            ApiError::ModelUnavailable => write!(f, "Model not loaded"),
            ApiError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
