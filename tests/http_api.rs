//! HTTP front-end integration tests.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`, using
//! a stub classifier in place of the ONNX model.

mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use common::{StubClassifier, canvas_with_one, seven_distribution};
use digit_recognizer::core::DEFAULT_MAX_PAYLOAD_SIZE;
use digit_recognizer::pipeline::{DigitPipeline, EntryPoint};
use digit_recognizer::server::{AppState, build_app};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(classifier: Arc<StubClassifier>, max_payload_size: usize) -> Router {
    let pipeline = DigitPipeline::with_defaults(classifier, EntryPoint::Http);
    build_app(Arc::new(AppState::new(pipeline)), max_payload_size)
}

fn post_predict(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_predict_returns_class_confidence_and_distribution() {
    let classifier = Arc::new(StubClassifier::new(seven_distribution()));
    let app = app_with(classifier.clone(), DEFAULT_MAX_PAYLOAD_SIZE);

    let image = canvas_with_one().to_data_url().unwrap();
    let body = json!({ "image": image }).to_string();
    let response = app.oneshot(post_predict(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let value = json_body(response).await;
    assert_eq!(value["class"], 7);
    assert!((value["confidence"].as_f64().unwrap() - 0.82).abs() < 1e-6);
    let predictions = value["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 10);
    assert!(value.get("error").is_none());

    assert_eq!(classifier.calls(), 1);
    assert!(classifier.seen_sums()[0] > 1.0, "stroke lost in normalization");
}

#[tokio::test]
async fn test_missing_separator_is_reported_with_status_200() {
    let classifier = Arc::new(StubClassifier::new(seven_distribution()));
    let app = app_with(classifier.clone(), DEFAULT_MAX_PAYLOAD_SIZE);

    let body = json!({ "image": "iVBORw0KGgoAAAANSUhEUg" }).to_string();
    let response = app.oneshot(post_predict(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let value = json_body(response).await;
    let error = value["error"].as_str().unwrap();
    assert!(error.starts_with("decode failed: "), "unexpected error: {error}");
    assert!(value.get("class").is_none());
    assert_eq!(classifier.calls(), 0);
}

#[tokio::test]
async fn test_non_image_payload_is_reported() {
    let app = app_with(
        Arc::new(StubClassifier::new(seven_distribution())),
        DEFAULT_MAX_PAYLOAD_SIZE,
    );

    // "aGVsbG8=" is base64 for "hello".
    let body = json!({ "image": "data:image/png;base64,aGVsbG8=" }).to_string();
    let response = app.oneshot(post_predict(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let value = json_body(response).await;
    assert!(value["error"].as_str().unwrap().contains("not a supported image"));
}

#[tokio::test]
async fn test_malformed_json_is_reported_with_status_200() {
    let app = app_with(
        Arc::new(StubClassifier::new(seven_distribution())),
        DEFAULT_MAX_PAYLOAD_SIZE,
    );

    for body in ["{not json", r#"{"picture": "data:,"}"#, r#"{"image": 42}"#] {
        let response = app.clone().oneshot(post_predict(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let value = json_body(response).await;
        assert!(
            value["error"].as_str().unwrap().starts_with("decode failed: "),
            "body {body} gave {value}"
        );
    }
}

#[tokio::test]
async fn test_wrong_classifier_output_is_inference_error() {
    let app = app_with(
        Arc::new(StubClassifier::new(vec![0.25; 4])),
        DEFAULT_MAX_PAYLOAD_SIZE,
    );

    let image = canvas_with_one().to_data_url().unwrap();
    let response = app
        .oneshot(post_predict(json!({ "image": image }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let value = json_body(response).await;
    assert!(value["error"].as_str().unwrap().starts_with("inference failed: "));
}

#[tokio::test]
async fn test_blank_image_is_classified_over_http() {
    let classifier = Arc::new(StubClassifier::new(seven_distribution()));
    let app = app_with(classifier.clone(), DEFAULT_MAX_PAYLOAD_SIZE);

    let blank = digit_recognizer::canvas::DrawingCanvas::default()
        .to_data_url()
        .unwrap();
    let response = app
        .oneshot(post_predict(json!({ "image": blank }).to_string()))
        .await
        .unwrap();

    let value = json_body(response).await;
    assert_eq!(value["class"], 7);
    assert_eq!(classifier.calls(), 1);
}

#[tokio::test]
async fn test_oversized_body_is_rejected_by_transport() {
    let app = app_with(Arc::new(StubClassifier::new(seven_distribution())), 64);

    let body = json!({ "image": format!("data:image/png;base64,{}", "A".repeat(1024)) });
    let response = app.oneshot(post_predict(body.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_health_reports_model() {
    let app = app_with(
        Arc::new(StubClassifier::new(seven_distribution())),
        DEFAULT_MAX_PAYLOAD_SIZE,
    );

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "status": "ok", "model": "stub" })
    );
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = app_with(
        Arc::new(StubClassifier::new(seven_distribution())),
        DEFAULT_MAX_PAYLOAD_SIZE,
    );

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/predict")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}
