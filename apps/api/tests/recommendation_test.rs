//! Integration tests for the track recommendation endpoint
//!
//! Exercises the full pipeline over HTTP: playlist aggregation, bulk
//! audio-feature resolution, mood matching, and the distinct 404
//! responses for each way a request can come up empty.

mod common;

use axum::http::StatusCode;
use muselink_test_utils::{AudioFeaturesFixture, MockSpotifyServer, PlaylistFixture, TrackFixture};

use common::{api_app, assert_error_code, body_json, get_with_key, get_without_key};

/// Library with one rock playlist holding a happy, a sad, and a calm track
async fn seeded_server() -> MockSpotifyServer {
    let server = MockSpotifyServer::start().await;
    server
        .mock_playlists(vec![
            PlaylistFixture::new("p1", "Rock Classics"),
            PlaylistFixture::new("p2", "Jazz Lounge"),
        ])
        .await;
    server
        .mock_playlist_tracks(
            "p1",
            vec![
                TrackFixture::new("t1", "Sunny Anthem"),
                TrackFixture::new("t2", "Rainy Ballad"),
                TrackFixture::new("t3", "Steady Groove"),
            ],
        )
        .await;
    server
        .mock_audio_features_any(vec![
            AudioFeaturesFixture::new("t1", 0.9, 0.8),
            AudioFeaturesFixture::new("t2", 0.2, 0.2),
            AudioFeaturesFixture::new("t3", 0.5, 0.5),
        ])
        .await;
    server
}

#[tokio::test]
async fn test_happy_recommendation() {
    let server = seeded_server().await;
    let app = api_app(&server);

    let response = get_with_key(app, "/api/v1/track-recommendation?genre=rock&mood=happy").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["track"]["id"], "t1");
    assert_eq!(body["genre"], "rock");
    assert_eq!(body["mood"], "happy");
}

#[tokio::test]
async fn test_sad_recommendation_skips_earlier_tracks() {
    let server = seeded_server().await;
    let app = api_app(&server);

    let response = get_with_key(app, "/api/v1/track-recommendation?genre=rock&mood=sad").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["track"]["id"], "t2");
}

#[tokio::test]
async fn test_genre_match_is_case_insensitive() {
    let server = seeded_server().await;
    let app = api_app(&server);

    let response = get_with_key(app, "/api/v1/track-recommendation?genre=ROCK&mood=happy").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["track"]["id"], "t1");
}

#[tokio::test]
async fn test_unknown_mood_matches_first_track() {
    let server = seeded_server().await;
    let app = api_app(&server);

    let response =
        get_with_key(app, "/api/v1/track-recommendation?genre=rock&mood=nostalgic").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["track"]["id"], "t1");
}

#[tokio::test]
async fn test_calm_recommendation() {
    let server = seeded_server().await;
    let app = api_app(&server);

    // t1 fails the energy ceiling, t2 is the first low-energy track
    let response = get_with_key(app, "/api/v1/track-recommendation?genre=rock&mood=calm").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["track"]["id"], "t2");
}

#[tokio::test]
async fn test_recommendation_is_deterministic() {
    let server = seeded_server().await;

    // Same request against unchanged upstream data returns the same track
    let first = get_with_key(
        api_app(&server),
        "/api/v1/track-recommendation?genre=rock&mood=happy",
    )
    .await;
    let second = get_with_key(
        api_app(&server),
        "/api/v1/track-recommendation?genre=rock&mood=happy",
    )
    .await;

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    let first_body = body_json(first).await;
    let second_body = body_json(second).await;
    assert_eq!(first_body["track"]["id"], second_body["track"]["id"]);
}

#[tokio::test]
async fn test_duplicate_tracks_across_playlists_are_retained() {
    let server = MockSpotifyServer::start().await;
    server
        .mock_playlists_paged(
            vec![PlaylistFixture::new("p1", "Rock Morning")],
            vec![PlaylistFixture::new("p2", "Rock Evening")],
        )
        .await;
    server
        .mock_playlist_tracks(
            "p1",
            vec![
                TrackFixture::new("t1", "Opener"),
                TrackFixture::new("t2", "Closer"),
            ],
        )
        .await;
    server
        .mock_playlist_tracks("p2", vec![TrackFixture::new("t1", "Opener")])
        .await;

    // The feature lookup only answers the exact id sequence with the
    // repeated t1, so a match proves duplicates were kept in order
    server
        .mock_audio_features(
            &["t1", "t2", "t1"],
            vec![
                AudioFeaturesFixture::new("t1", 0.5, 0.5),
                AudioFeaturesFixture::new("t2", 0.2, 0.2),
            ],
        )
        .await;

    let app = api_app(&server);
    let response = get_with_key(app, "/api/v1/track-recommendation?genre=rock&mood=sad").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["track"]["id"], "t2");
}

#[tokio::test]
async fn test_empty_library_returns_no_playlists() {
    let server = MockSpotifyServer::start().await;
    server.mock_playlists_empty().await;
    let app = api_app(&server);

    let response = get_with_key(app, "/api/v1/track-recommendation?genre=rock&mood=happy").await;

    assert_error_code(response, StatusCode::NOT_FOUND, "NO_PLAYLISTS").await;
}

#[tokio::test]
async fn test_playlist_provider_failure_returns_no_playlists() {
    let server = MockSpotifyServer::start().await;
    server.mock_playlists_failure(500).await;
    let app = api_app(&server);

    // A dead provider degrades to an empty library, not a 5xx
    let response = get_with_key(app, "/api/v1/track-recommendation?genre=rock&mood=happy").await;

    assert_error_code(response, StatusCode::NOT_FOUND, "NO_PLAYLISTS").await;
}

#[tokio::test]
async fn test_track_listing_failure_returns_no_tracks() {
    let server = MockSpotifyServer::start().await;
    server
        .mock_playlists(vec![PlaylistFixture::new("p1", "Rock Classics")])
        .await;
    server.mock_playlist_tracks_failure("p1", 500).await;
    let app = api_app(&server);

    let response = get_with_key(app, "/api/v1/track-recommendation?genre=rock&mood=happy").await;

    assert_error_code(response, StatusCode::NOT_FOUND, "NO_TRACKS").await;
}

#[tokio::test]
async fn test_unmatched_genre_returns_no_genre_match() {
    let server = seeded_server().await;
    let app = api_app(&server);

    let response = get_with_key(app, "/api/v1/track-recommendation?genre=metal&mood=happy").await;

    assert_error_code(response, StatusCode::NOT_FOUND, "NO_GENRE_MATCH").await;
}

#[tokio::test]
async fn test_empty_playlists_return_no_tracks() {
    let server = MockSpotifyServer::start().await;
    server
        .mock_playlists(vec![PlaylistFixture::new("p1", "Rock Classics")])
        .await;
    server.mock_playlist_tracks("p1", vec![]).await;
    let app = api_app(&server);

    let response = get_with_key(app, "/api/v1/track-recommendation?genre=rock&mood=happy").await;

    assert_error_code(response, StatusCode::NOT_FOUND, "NO_TRACKS").await;
}

#[tokio::test]
async fn test_mood_miss_returns_no_mood_match() {
    let server = MockSpotifyServer::start().await;
    server
        .mock_playlists(vec![PlaylistFixture::new("p1", "Rock Classics")])
        .await;
    server
        .mock_playlist_tracks("p1", vec![TrackFixture::new("t1", "Mid Tempo")])
        .await;
    server
        .mock_audio_features_any(vec![AudioFeaturesFixture::new("t1", 0.5, 0.5)])
        .await;
    let app = api_app(&server);

    let response = get_with_key(app, "/api/v1/track-recommendation?genre=rock&mood=happy").await;

    assert_error_code(response, StatusCode::NOT_FOUND, "NO_MOOD_MATCH").await;
}

#[tokio::test]
async fn test_recommendation_survives_failed_feature_batch() {
    let server = MockSpotifyServer::start().await;
    server
        .mock_playlists(vec![PlaylistFixture::new("p1", "Rock Classics")])
        .await;

    // 101 tracks force two feature batches; the first one fails
    let tracks: Vec<TrackFixture> = (0..101)
        .map(|i| TrackFixture::new(&format!("t{}", i), &format!("Song {}", i)))
        .collect();
    let ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
    let first_batch: Vec<&str> = ids[..100].iter().map(|s| s.as_str()).collect();
    let second_batch: Vec<&str> = ids[100..].iter().map(|s| s.as_str()).collect();

    server.mock_playlist_tracks("p1", tracks).await;
    server.mock_audio_features_failure(&first_batch, 500).await;
    server
        .mock_audio_features(
            &second_batch,
            vec![AudioFeaturesFixture::new("t100", 0.9, 0.9)],
        )
        .await;

    let app = api_app(&server);
    let response = get_with_key(app, "/api/v1/track-recommendation?genre=rock&mood=happy").await;

    // The only resolved track matches, despite the failed batch
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["track"]["id"], "t100");
}

#[tokio::test]
async fn test_missing_genre_is_bad_request() {
    let server = seeded_server().await;
    let app = api_app(&server);

    let response = get_with_key(app, "/api/v1/track-recommendation?mood=happy").await;

    assert_error_code(response, StatusCode::BAD_REQUEST, "MISSING_QUERY_PARAM").await;
}

#[tokio::test]
async fn test_missing_mood_is_bad_request() {
    let server = seeded_server().await;
    let app = api_app(&server);

    let response = get_with_key(app, "/api/v1/track-recommendation?genre=rock").await;

    assert_error_code(response, StatusCode::BAD_REQUEST, "MISSING_QUERY_PARAM").await;
}

#[tokio::test]
async fn test_requires_api_key() {
    let server = seeded_server().await;
    let app = api_app(&server);

    let response =
        get_without_key(app, "/api/v1/track-recommendation?genre=rock&mood=happy").await;

    assert_error_code(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}
