// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GET /health and GET /metrics tests

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::util::ServiceExt;

use super::common::*;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_with_model() {
    let response = app(stub_state()).oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"status": "running", "model_loaded": true})
    );
}

#[tokio::test]
async fn test_health_without_model() {
    let response = app(state_with(None)).oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["model_loaded"], false);
}

#[tokio::test]
async fn test_metrics_track_requests() {
    let router = app(stub_state());

    let ok = router
        .clone()
        .oneshot(multipart_request("/predict", "image", &hand_png()))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let bad = router
        .clone()
        .oneshot(multipart_request("/predict", "file", b"x"))
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

    let response = router.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));

    let text = body_text(response).await;
    assert!(text.contains("sign_prediction_requests_total 2"));
    assert!(text.contains("sign_prediction_success_total 1"));
    assert!(text.contains("sign_prediction_client_errors_total 1"));
    assert!(text.contains("sign_prediction_server_errors_total 0"));
}

#[tokio::test]
async fn test_unknown_route() {
    let response = app(stub_state()).oneshot(get("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
