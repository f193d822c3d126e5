use axum::{body::Body, extract::Request, http::StatusCode};
use serde_json::Value;

use crate::{AppStateTest, read_json};

#[tokio::test]
async fn health_should_be_ok() {
    let test_state = AppStateTest::new(false).await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body: Value = read_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_route_should_be_not_found() {
    let test_state = AppStateTest::new(false).await;

    let request = Request::builder()
        .uri("/api/v1/unknown")
        .body(Body::empty())
        .unwrap();

    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
