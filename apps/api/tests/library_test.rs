//! Integration tests for the library endpoints

mod common;

use axum::http::StatusCode;
use muselink_test_utils::{AudioFeaturesFixture, MockSpotifyServer, PlaylistFixture, TrackFixture};
use tower::ServiceExt;

use common::{api_app, assert_error_code, body_json, get_with_key, get_without_key};

#[tokio::test]
async fn test_list_playlists() {
    let server = MockSpotifyServer::start().await;
    server
        .mock_playlists(vec![
            PlaylistFixture::new("p1", "Rock Classics"),
            PlaylistFixture::new("p2", "Jazz Lounge"),
        ])
        .await;
    let app = api_app(&server);

    let response = get_with_key(app, "/api/v1/playlists").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["name"], "Rock Classics");
}

#[tokio::test]
async fn test_list_playlists_requires_api_key() {
    let server = MockSpotifyServer::start().await;
    server.mock_playlists_empty().await;
    let app = api_app(&server);

    let response = get_without_key(app, "/api/v1/playlists").await;

    assert_error_code(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

#[tokio::test]
async fn test_wrong_api_key_is_rejected() {
    let server = MockSpotifyServer::start().await;
    server.mock_playlists_empty().await;
    let app = api_app(&server);

    let response = app
        .oneshot(
            axum::http::Request::builder()
                .uri("/api/v1/playlists")
                .header("X-API-Key", "not-the-key")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_error_code(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

#[tokio::test]
async fn test_playlist_tracks_first_page() {
    let server = MockSpotifyServer::start().await;
    server
        .mock_playlists(vec![PlaylistFixture::new("p1", "Road Trip Mix")])
        .await;

    let tracks: Vec<TrackFixture> = (0..20)
        .map(|i| TrackFixture::new(&format!("t{}", i), &format!("Song {}", i)))
        .collect();
    server.mock_playlist_tracks("p1", tracks).await;

    let app = api_app(&server);
    let response = get_with_key(app, "/api/v1/playlist/tracks?name=road%20trip%20mix").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["playlist"]["name"], "Road Trip Mix");
    assert_eq!(body["page"], 1);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["total_tracks"], 20);
    assert_eq!(body["tracks"].as_array().unwrap().len(), 15);
    assert_eq!(body["tracks"][0]["id"], "t0");
}

#[tokio::test]
async fn test_playlist_tracks_second_page() {
    let server = MockSpotifyServer::start().await;
    server
        .mock_playlists(vec![PlaylistFixture::new("p1", "Road Trip Mix")])
        .await;

    let tracks: Vec<TrackFixture> = (0..20)
        .map(|i| TrackFixture::new(&format!("t{}", i), &format!("Song {}", i)))
        .collect();
    server.mock_playlist_tracks("p1", tracks).await;

    let app = api_app(&server);
    let response = get_with_key(app, "/api/v1/playlist/tracks?name=Road%20Trip%20Mix&page=2").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["page"], 2);
    assert_eq!(body["tracks"].as_array().unwrap().len(), 5);
    assert_eq!(body["tracks"][0]["id"], "t15");
}

#[tokio::test]
async fn test_playlist_tracks_unknown_name() {
    let server = MockSpotifyServer::start().await;
    server
        .mock_playlists(vec![PlaylistFixture::new("p1", "Road Trip Mix")])
        .await;
    let app = api_app(&server);

    let response = get_with_key(app, "/api/v1/playlist/tracks?name=nonexistent").await;

    assert_error_code(response, StatusCode::NOT_FOUND, "PLAYLIST_NOT_FOUND").await;
}

#[tokio::test]
async fn test_playlist_tracks_requires_full_name() {
    let server = MockSpotifyServer::start().await;
    server
        .mock_playlists(vec![PlaylistFixture::new("p1", "Road Trip Mix")])
        .await;
    let app = api_app(&server);

    // A partial name is not enough, only the full name matches
    let response = get_with_key(app, "/api/v1/playlist/tracks?name=road%20trip").await;

    assert_error_code(response, StatusCode::NOT_FOUND, "PLAYLIST_NOT_FOUND").await;
}

#[tokio::test]
async fn test_playlist_tracks_requires_name() {
    let server = MockSpotifyServer::start().await;
    let app = api_app(&server);

    let response = get_with_key(app, "/api/v1/playlist/tracks").await;

    assert_error_code(response, StatusCode::BAD_REQUEST, "MISSING_QUERY_PARAM").await;
}

#[tokio::test]
async fn test_playlist_tracks_rejects_page_zero() {
    let server = MockSpotifyServer::start().await;
    let app = api_app(&server);

    let response = get_with_key(app, "/api/v1/playlist/tracks?name=road&page=0").await;

    assert_error_code(response, StatusCode::BAD_REQUEST, "INVALID_QUERY_PARAM").await;
}

#[tokio::test]
async fn test_track_audio_features() {
    let server = MockSpotifyServer::start().await;
    server
        .mock_track_audio_features(&AudioFeaturesFixture::new("t1", 0.8, 0.6))
        .await;
    let app = api_app(&server);

    let response = get_with_key(app, "/api/v1/tracks/t1/audio-features").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["track_id"], "t1");
    assert_eq!(body["valence"], 0.8);
    assert_eq!(body["energy"], 0.6);
}
