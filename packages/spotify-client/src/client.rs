//! Spotify Web API client implementation

use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use futures_util::stream::{self, Stream, TryStreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use muselink_shared_config::SpotifyConfig;

use crate::error::{SpotifyError, SpotifyResult};
use crate::models::{
    track_id_from_href, AudioFeatures, AudioFeaturesResponse, Page, Playlist, PlaylistItem,
    RawAudioFeatures, RawPlaylist, RawTrack, TokenResponse, Track,
};
use crate::token::TokenCache;

/// Maximum number of track IDs accepted by one bulk audio-features call
pub const AUDIO_FEATURES_BATCH_LIMIT: usize = 100;

/// Page size requested from paginated listings
const PAGE_LIMIT: u32 = 50;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Maximum error body size carried in error variants
const MAX_ERROR_BODY_SIZE: usize = 1000;

/// Maximum accepted length for playlist and track IDs
const MAX_ID_LENGTH: usize = 64;

/// Spotify Web API client
///
/// Holds the HTTP connection pool and a shared [`TokenCache`]; cloning
/// the client shares both.
#[derive(Clone)]
pub struct SpotifyClient {
    http_client: Client,
    config: SpotifyConfig,
    tokens: TokenCache,
}

impl fmt::Debug for SpotifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyClient")
            .field("api_url", &self.config.api_url)
            .field("client_id", &self.config.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

impl SpotifyClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    /// Returns `SpotifyError::MissingCredentials` if the client ID or
    /// secret is empty.
    pub fn new(config: &SpotifyConfig) -> SpotifyResult<Self> {
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            return Err(SpotifyError::MissingCredentials);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent("muselink/1.0")
            .build()?;

        Ok(Self {
            http_client,
            config: config.clone(),
            tokens: TokenCache::new(),
        })
    }

    /// Create a client from `SPOTIFY_*` environment variables
    pub fn from_env() -> SpotifyResult<Self> {
        let config = SpotifyConfig::from_env()
            .map_err(|_| SpotifyError::MissingCredentials)?;
        Self::new(&config)
    }

    /// Replace the token cache (shared caches let several clients reuse
    /// one access token)
    pub fn with_token_cache(mut self, tokens: TokenCache) -> Self {
        self.tokens = tokens;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &SpotifyConfig {
        &self.config
    }

    /// Validate a playlist or track ID before it is spliced into a path
    fn validate_id<'a>(id: &'a str, what: &str) -> SpotifyResult<&'a str> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(SpotifyError::InvalidInput(format!(
                "{} ID cannot be empty",
                what
            )));
        }
        if trimmed.len() > MAX_ID_LENGTH
            || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(SpotifyError::InvalidInput(format!(
                "{} ID is not a valid Spotify ID",
                what
            )));
        }
        Ok(trimmed)
    }

    /// Truncate a response body kept in an error variant
    fn truncate_body(body: String) -> String {
        if body.len() <= MAX_ERROR_BODY_SIZE {
            return body;
        }
        let truncate_at = body
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|i| *i <= MAX_ERROR_BODY_SIZE)
            .last()
            .unwrap_or(0);
        format!("{}... (truncated)", &body[..truncate_at])
    }

    // ========== Token handling ==========

    /// Get a bearer token, refreshing through the accounts service when
    /// the cached one is absent or expired
    ///
    /// Concurrent callers may refresh redundantly; the last successful
    /// refresh wins.
    pub async fn bearer(&self) -> SpotifyResult<String> {
        if let Some(token) = self.tokens.get().await {
            return Ok(token);
        }
        self.refresh_access_token().await
    }

    async fn refresh_access_token(&self) -> SpotifyResult<String> {
        let refresh_token = self
            .config
            .refresh_token
            .as_deref()
            .ok_or(SpotifyError::MissingRefreshToken)?;

        debug!("Refreshing Spotify access token");

        let response = self
            .http_client
            .post(self.config.token_url())
            .header("Authorization", self.basic_auth_header())
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = Self::truncate_body(response.text().await.unwrap_or_default());
            warn!(status, "Spotify token refresh failed");
            return Err(SpotifyError::TokenRefresh { status, body });
        }

        let token: TokenResponse = serde_json::from_str(&response.text().await?)?;
        self.tokens
            .store(token.access_token.clone(), token.expires_in)
            .await;

        debug!(expires_in = token.expires_in, "Spotify access token refreshed");

        Ok(token.access_token)
    }

    /// Exchange a one-time authorization code for tokens
    ///
    /// The raw token response is returned so the caller can surface the
    /// refresh token to the operator.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str) -> SpotifyResult<serde_json::Value> {
        if code.trim().is_empty() {
            return Err(SpotifyError::InvalidInput(
                "authorization code cannot be empty".to_string(),
            ));
        }

        let response = self
            .http_client
            .post(self.config.token_url())
            .header("Authorization", self.basic_auth_header())
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = Self::truncate_body(response.text().await.unwrap_or_default());
            return Err(SpotifyError::TokenRefresh { status, body });
        }

        Ok(serde_json::from_str(&response.text().await?)?)
    }

    /// Build the user-facing authorization URL for the one-time login
    pub fn user_authorize_url(&self, scopes: &str) -> String {
        let mut url = url::Url::parse(&self.config.authorize_url())
            .expect("authorize URL is well-formed");
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("scope", scopes)
            .append_pair("redirect_uri", &self.config.redirect_uri);
        url.to_string()
    }

    fn basic_auth_header(&self) -> String {
        let credentials = format!(
            "{}:{}",
            self.config.client_id, self.config.client_secret
        );
        format!("Basic {}", BASE64.encode(credentials))
    }

    fn map_transport_error(e: reqwest::Error) -> SpotifyError {
        if e.is_timeout() {
            SpotifyError::Timeout
        } else {
            SpotifyError::Http(e)
        }
    }

    // ========== Request plumbing ==========

    /// Perform an authenticated GET and parse the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> SpotifyResult<T> {
        let token = self.bearer().await?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Spotify API rate limited");
            return Err(SpotifyError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = Self::truncate_body(response.text().await.unwrap_or_default());
            return Err(SpotifyError::Api { status, body });
        }

        Ok(serde_json::from_str(&response.text().await?)?)
    }

    /// Lazy sequence of pages, following the provider's `next` cursor
    /// until it signals completion
    fn pages<'a, T>(&'a self, first_url: String) -> impl Stream<Item = SpotifyResult<Page<T>>> + 'a
    where
        T: DeserializeOwned + 'a,
    {
        stream::try_unfold(Some(first_url), move |state| async move {
            let Some(url) = state else {
                return Ok(None);
            };
            let page: Page<T> = self.get_json(&url).await?;
            let next = page.next.clone();
            Ok(Some((page, next)))
        })
    }

    // ========== Library operations ==========

    /// List every playlist of the authenticated user
    ///
    /// Provider-side pagination is followed to exhaustion; there is no
    /// assumption about page count.
    #[instrument(skip(self))]
    pub async fn list_playlists(&self) -> SpotifyResult<Vec<Playlist>> {
        let first = format!(
            "{}?limit={}",
            self.config.api_endpoint("/me/playlists"),
            PAGE_LIMIT
        );

        let mut playlists = Vec::new();
        let mut pages = std::pin::pin!(self.pages::<RawPlaylist>(first));
        while let Some(page) = pages.try_next().await? {
            playlists.extend(page.items.into_iter().map(Playlist::from));
        }

        debug!(count = playlists.len(), "Fetched user playlists");

        Ok(playlists)
    }

    /// List the full, ordered track list of one playlist
    ///
    /// Entries without a track ID (local or removed tracks) are dropped.
    #[instrument(skip(self))]
    pub async fn list_playlist_tracks(&self, playlist_id: &str) -> SpotifyResult<Vec<Track>> {
        let playlist_id = Self::validate_id(playlist_id, "playlist")?;
        let first = format!(
            "{}?limit={}",
            self.config
                .api_endpoint(&format!("/playlists/{}/tracks", playlist_id)),
            PAGE_LIMIT
        );

        let mut tracks = Vec::new();
        let mut pages = std::pin::pin!(self.pages::<PlaylistItem>(first));
        while let Some(page) = pages.try_next().await? {
            tracks.extend(
                page.items
                    .into_iter()
                    .filter_map(|item| item.track)
                    .filter_map(RawTrack::into_track),
            );
        }

        debug!(
            playlist_id = %playlist_id,
            track_count = tracks.len(),
            "Fetched playlist tracks"
        );

        Ok(tracks)
    }

    /// Fetch audio features for a single track
    #[instrument(skip(self))]
    pub async fn get_audio_features(&self, track_id: &str) -> SpotifyResult<AudioFeatures> {
        let track_id = Self::validate_id(track_id, "track")?;
        let url = self
            .config
            .api_endpoint(&format!("/audio-features/{}", track_id));
        let raw: RawAudioFeatures = self.get_json(&url).await?;

        // Fall back to the requested ID if the resource link is unusable
        let resolved_id =
            track_id_from_href(&raw.track_href).unwrap_or_else(|| track_id.to_string());

        Ok(AudioFeatures {
            track_id: resolved_id,
            valence: raw.valence,
            energy: raw.energy,
        })
    }

    /// Bulk audio-features lookup for up to [`AUDIO_FEATURES_BATCH_LIMIT`]
    /// track IDs
    ///
    /// Unknown IDs come back as null entries from the provider and are
    /// omitted from the result; callers must treat absent IDs as
    /// "no data".
    #[instrument(skip(self, track_ids), fields(id_count = track_ids.len()))]
    pub async fn get_audio_features_bulk(
        &self,
        track_ids: &[String],
    ) -> SpotifyResult<Vec<AudioFeatures>> {
        if track_ids.is_empty() {
            return Ok(Vec::new());
        }
        if track_ids.len() > AUDIO_FEATURES_BATCH_LIMIT {
            return Err(SpotifyError::InvalidInput(format!(
                "at most {} track IDs per audio-features call (got {})",
                AUDIO_FEATURES_BATCH_LIMIT,
                track_ids.len()
            )));
        }

        let url = format!(
            "{}?ids={}",
            self.config.api_endpoint("/audio-features"),
            track_ids.join(",")
        );

        let response: AudioFeaturesResponse = self.get_json(&url).await?;
        let features: Vec<AudioFeatures> = response
            .audio_features
            .into_iter()
            .flatten()
            .filter_map(RawAudioFeatures::into_features)
            .collect();

        debug!(
            requested = track_ids.len(),
            resolved = features.len(),
            "Resolved audio features"
        );

        Ok(features)
    }
}
