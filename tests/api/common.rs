// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared helpers for driving the router in-process

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response},
    Router,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::Array4;
use sign_gesture_node::{
    api::{create_router, AppState},
    classifier::{GestureClassifier, LabelMap},
    vision::{PreprocessConfig, Preprocessor},
};
use std::io::Cursor;
use std::sync::Arc;

pub const BOUNDARY: &str = "----signgesturetestboundary";
pub const TEST_UPLOAD_LIMIT: usize = 1024 * 1024;

/// Classifier returning fixed scores for every input
pub struct StubClassifier {
    pub scores: Vec<f32>,
    pub labels: LabelMap,
}

impl GestureClassifier for StubClassifier {
    fn predict_scores(&self, input: &Array4<f32>) -> anyhow::Result<Vec<f32>> {
        assert_eq!(input.shape(), &[1, 64, 64, 1]);
        Ok(self.scores.clone())
    }

    fn labels(&self) -> &LabelMap {
        &self.labels
    }
}

/// Classifier whose inference always fails
pub struct BrokenClassifier {
    pub labels: LabelMap,
}

impl GestureClassifier for BrokenClassifier {
    fn predict_scores(&self, _input: &Array4<f32>) -> anyhow::Result<Vec<f32>> {
        anyhow::bail!("session exploded")
    }

    fn labels(&self) -> &LabelMap {
        &self.labels
    }
}

pub fn labels() -> LabelMap {
    LabelMap::from_json_str(r#"{"A": 0, "B": 1, "C": 2}"#).unwrap()
}

pub fn state_with(classifier: Option<Arc<dyn GestureClassifier>>) -> AppState {
    AppState::new(
        classifier,
        Preprocessor::new(PreprocessConfig::default()).unwrap(),
    )
}

pub fn stub_state() -> AppState {
    state_with(Some(Arc::new(StubClassifier {
        scores: vec![0.1, 0.2, 0.7],
        labels: labels(),
    })))
}

pub fn app(state: AppState) -> Router {
    create_router(state, TEST_UPLOAD_LIMIT)
}

/// Dark square on a light background, encoded as PNG
pub fn hand_png() -> Vec<u8> {
    let mut img = RgbImage::from_pixel(120, 90, Rgb([225, 220, 215]));
    for y in 25..70 {
        for x in 40..85 {
            img.put_pixel(x, y, Rgb([70, 50, 40]));
        }
    }
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Pseudo-random RGB pixels, so the PNG stays close to its raw size
pub fn noise_png(width: u32, height: u32) -> Vec<u8> {
    let mut state: u32 = 0x2545_F491;
    let img = RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        };
        Rgb([next(), next(), next()])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

pub fn multipart_body(field: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"upload.png\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, field: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field, data)))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
