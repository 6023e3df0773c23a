//! Mock Spotify server for testing provider-facing code
//!
//! Provides a [`MockSpotifyServer`] that simulates the Web API endpoints
//! the workspace consumes (playlists, playlist tracks, tracks, audio
//! features, token grants) without a real Spotify account.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Playlist fixture for provider responses
#[derive(Debug, Clone)]
pub struct PlaylistFixture {
    pub id: String,
    pub name: String,
}

impl PlaylistFixture {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({"id": self.id, "name": self.name})
    }
}

/// Track fixture for provider responses
#[derive(Debug, Clone)]
pub struct TrackFixture {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub duration_ms: u64,
    pub album: String,
}

impl TrackFixture {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            artist: "Test Artist".to_string(),
            duration_ms: 200_000,
            album: "Test Album".to_string(),
        }
    }

    pub fn with_artist(mut self, artist: &str) -> Self {
        self.artist = artist.to_string();
        self
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "name": self.name,
            "artists": [{"name": self.artist}],
            "duration_ms": self.duration_ms,
            "album": {"name": self.album},
        })
    }
}

/// Audio-features fixture; serializes with the ID embedded in the
/// `track_href` resource link, the way the provider reports it
#[derive(Debug, Clone)]
pub struct AudioFeaturesFixture {
    pub track_id: String,
    pub valence: f64,
    pub energy: f64,
}

impl AudioFeaturesFixture {
    pub fn new(track_id: &str, valence: f64, energy: f64) -> Self {
        Self {
            track_id: track_id.to_string(),
            valence,
            energy,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "valence": self.valence,
            "energy": self.energy,
            "track_href": format!("https://api.spotify.com/v1/tracks/{}", self.track_id),
        })
    }
}

/// Mock Spotify server
///
/// Wraps a [`wiremock::MockServer`] with convenience methods for the
/// endpoints the workspace consumes. The token endpoint is mounted by
/// default so clients configured against [`MockSpotifyServer::url`] can
/// authenticate transparently.
///
/// # Example
///
/// ```rust,ignore
/// use muselink_test_utils::{MockSpotifyServer, PlaylistFixture};
///
/// #[tokio::test]
/// async fn test_playlists() {
///     let server = MockSpotifyServer::start().await;
///     server
///         .mock_playlists(vec![PlaylistFixture::new("p1", "Rock Hits")])
///         .await;
///     // Configure your SpotifyClient with server.url()
/// }
/// ```
pub struct MockSpotifyServer {
    server: MockServer,
}

impl MockSpotifyServer {
    /// Start a new mock server with a working token endpoint
    pub async fn start() -> Self {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "mock-access-token",
                "token_type": "Bearer",
                "expires_in": 3600,
            })))
            .mount(&server)
            .await;

        Self { server }
    }

    /// Get the server URL (use for both the API and accounts base URLs)
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Access the underlying wiremock server for custom mocks
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Mount a single-page playlist listing
    pub async fn mock_playlists(&self, playlists: Vec<PlaylistFixture>) {
        let items: Vec<serde_json::Value> = playlists.iter().map(|p| p.to_json()).collect();

        Mock::given(method("GET"))
            .and(path("/me/playlists"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"items": items, "next": null})),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount an empty playlist listing
    pub async fn mock_playlists_empty(&self) {
        self.mock_playlists(Vec::new()).await;
    }

    /// Mount a failing playlist listing, simulating a degraded provider
    pub async fn mock_playlists_failure(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/me/playlists"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Mount a playlist listing split in two pages, with the first page
    /// pointing at the second through a `next` cursor URL
    pub async fn mock_playlists_paged(
        &self,
        first: Vec<PlaylistFixture>,
        second: Vec<PlaylistFixture>,
    ) {
        let first_items: Vec<serde_json::Value> = first.iter().map(|p| p.to_json()).collect();
        let second_items: Vec<serde_json::Value> = second.iter().map(|p| p.to_json()).collect();

        Mock::given(method("GET"))
            .and(path("/me/playlists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": first_items,
                "next": format!("{}/me/playlists/page2", self.server.uri()),
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path("/me/playlists/page2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"items": second_items, "next": null})),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a single-page track listing for one playlist
    pub async fn mock_playlist_tracks(&self, playlist_id: &str, tracks: Vec<TrackFixture>) {
        let items: Vec<serde_json::Value> = tracks
            .iter()
            .map(|t| json!({"track": t.to_json()}))
            .collect();

        Mock::given(method("GET"))
            .and(path(format!("/playlists/{}/tracks", playlist_id)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"items": items, "next": null})),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a failing track listing for one playlist
    pub async fn mock_playlist_tracks_failure(&self, playlist_id: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/playlists/{}/tracks", playlist_id)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Mount a bulk audio-features response for a specific `ids` query
    pub async fn mock_audio_features(
        &self,
        requested_ids: &[&str],
        features: Vec<AudioFeaturesFixture>,
    ) {
        let entries: Vec<serde_json::Value> = features.iter().map(|f| f.to_json()).collect();

        Mock::given(method("GET"))
            .and(path("/audio-features"))
            .and(query_param("ids", requested_ids.join(",")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"audio_features": entries})),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a failing bulk audio-features response for a specific
    /// `ids` query, simulating a degraded provider
    pub async fn mock_audio_features_failure(&self, requested_ids: &[&str], status: u16) {
        Mock::given(method("GET"))
            .and(path("/audio-features"))
            .and(query_param("ids", requested_ids.join(",")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Mount a catch-all bulk audio-features response used when the
    /// exact ids string is not interesting to the test
    pub async fn mock_audio_features_any(&self, features: Vec<AudioFeaturesFixture>) {
        let entries: Vec<serde_json::Value> = features.iter().map(|f| f.to_json()).collect();

        Mock::given(method("GET"))
            .and(path("/audio-features"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"audio_features": entries})),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a single-track audio-features lookup
    pub async fn mock_track_audio_features(&self, features: &AudioFeaturesFixture) {
        Mock::given(method("GET"))
            .and(path(format!("/audio-features/{}", features.track_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(features.to_json()))
            .mount(&self.server)
            .await;
    }
}
