//! Common test utilities for API integration tests
//!
//! Provides a test router wired against a mock Spotify server plus
//! request helpers shared by the integration test files.

#![allow(dead_code)]

use axum::body::Body;
use axum::extract::Extension;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use tower::ServiceExt;

use muselink_api::middleware::ApiKeySettings;
use muselink_api::routes::{
    library_router, recommendation_router, LibraryState, RecommendationState,
};
use muselink_api::RecommendationService;
use muselink_shared_config::SpotifyConfig;
use muselink_spotify_client::SpotifyClient;
use muselink_test_utils::MockSpotifyServer;

/// API key the test router accepts
pub const TEST_API_KEY: &str = "test-api-key";

/// Build a Spotify client pointed at the mock server
pub fn spotify_client(server: &MockSpotifyServer) -> SpotifyClient {
    let config = SpotifyConfig::with_urls(server.url(), server.url());
    SpotifyClient::new(&config).expect("test client")
}

/// Build the versioned API router the way main() wires it
pub fn api_app(server: &MockSpotifyServer) -> Router {
    let spotify = spotify_client(server);
    let library_state = LibraryState::new(spotify.clone());
    let recommendation_state =
        RecommendationState::new(RecommendationService::new(spotify));

    let api_routes = Router::new()
        .merge(library_router(library_state))
        .merge(recommendation_router(recommendation_state))
        .layer(Extension(ApiKeySettings::new(TEST_API_KEY)));

    Router::new().nest("/api/v1", api_routes)
}

/// Send a GET request with the test API key
pub async fn get_with_key(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header("X-API-Key", TEST_API_KEY)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a GET request without any API key
pub async fn get_without_key(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Read a response body as JSON
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a JSON error response carries the expected code
pub async fn assert_error_code(response: Response<Body>, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let body = body_json(response).await;
    assert_eq!(body["code"], code);
}
