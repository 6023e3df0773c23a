//! Spotify API configuration types

use crate::{get_env_or_default, get_required_env, ConfigResult};

/// Spotify Web API and accounts service configuration
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    /// OAuth client ID
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// Refresh token obtained from the one-time authorization flow
    pub refresh_token: Option<String>,

    /// Web API base URL
    pub api_url: String,

    /// Accounts service base URL (authorization + token endpoints)
    pub accounts_url: String,

    /// Redirect URI registered for the OAuth flow
    pub redirect_uri: String,
}

impl SpotifyConfig {
    /// Load Spotify configuration from environment variables
    ///
    /// `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET` are required;
    /// `SPOTIFY_REFRESH_TOKEN` is optional until the one-time login has
    /// been completed.
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            client_id: get_required_env("SPOTIFY_CLIENT_ID")?,
            client_secret: get_required_env("SPOTIFY_CLIENT_SECRET")?,
            refresh_token: std::env::var("SPOTIFY_REFRESH_TOKEN")
                .ok()
                .filter(|s| !s.is_empty()),
            api_url: get_env_or_default("SPOTIFY_API_URL", "https://api.spotify.com/v1"),
            accounts_url: get_env_or_default(
                "SPOTIFY_ACCOUNTS_URL",
                "https://accounts.spotify.com",
            ),
            redirect_uri: get_env_or_default(
                "SPOTIFY_REDIRECT_URI",
                "http://localhost:4567/callback",
            ),
        })
    }

    /// Create a configuration with custom base URLs (useful for testing)
    pub fn with_urls(api_url: impl Into<String>, accounts_url: impl Into<String>) -> Self {
        Self {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            refresh_token: Some("test-refresh-token".to_string()),
            api_url: api_url.into(),
            accounts_url: accounts_url.into(),
            redirect_uri: "http://localhost:4567/callback".to_string(),
        }
    }

    /// Get the full URL for the token endpoint
    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_url.trim_end_matches('/'))
    }

    /// Get the full URL for the user authorization endpoint
    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.accounts_url.trim_end_matches('/'))
    }

    /// Build a Web API endpoint URL from a path like `/me/playlists`
    pub fn api_endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: None,
            api_url: "https://api.spotify.com/v1".to_string(),
            accounts_url: "https://accounts.spotify.com".to_string(),
            redirect_uri: "http://localhost:4567/callback".to_string(),
        }
    }
}
