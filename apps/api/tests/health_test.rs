//! Integration tests for health check endpoints

mod common;

use axum::{body::Body, http::Request, http::StatusCode, Router};
use tower::ServiceExt;

use muselink_api::routes::health_router;

fn health_app() -> Router {
    Router::new().nest("/health", health_router())
}

#[tokio::test]
async fn test_simple_health_check() {
    let app = health_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = health_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["status"], "alive");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_routes_do_not_require_api_key() {
    // Health endpoints sit outside the keyed /api/v1 surface
    let app = health_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
