//! Spotify API error types

use thiserror::Error;

/// Spotify API client errors
#[derive(Error, Debug)]
pub enum SpotifyError {
    /// Client ID or secret is missing
    #[error("Spotify client credentials are required")]
    MissingCredentials,

    /// No refresh token available for the token grant
    #[error("SPOTIFY_REFRESH_TOKEN is not set; complete the one-time login first")]
    MissingRefreshToken,

    /// Invalid input provided to a client method
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("failed to parse Spotify response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Spotify returned a non-success status
    #[error("Spotify API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Token refresh against the accounts service failed
    #[error("token refresh failed with status {status}: {body}")]
    TokenRefresh { status: u16, body: String },

    /// Rate limited by Spotify
    #[error("rate limited by Spotify API")]
    RateLimited,

    /// Request timeout
    #[error("request to Spotify timed out")]
    Timeout,
}

impl SpotifyError {
    /// Check if this error is a transient failure
    ///
    /// Transient: timeouts, rate limiting, transport errors, and 5xx
    /// responses. Client errors (4xx other than 429) are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            SpotifyError::Timeout | SpotifyError::RateLimited => true,
            SpotifyError::Http(e) => {
                if e.is_timeout() || e.is_connect() {
                    return true;
                }
                matches!(e.status(), Some(status) if status.is_server_error())
            }
            SpotifyError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type for Spotify operations
pub type SpotifyResult<T> = Result<T, SpotifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_retryable() {
        assert!(SpotifyError::Timeout.is_retryable());
        assert!(SpotifyError::RateLimited.is_retryable());
        assert!(SpotifyError::Api {
            status: 503,
            body: "unavailable".into()
        }
        .is_retryable());
        assert!(!SpotifyError::Api {
            status: 404,
            body: "not found".into()
        }
        .is_retryable());
        assert!(!SpotifyError::MissingRefreshToken.is_retryable());
        assert!(!SpotifyError::InvalidInput("bad".into()).is_retryable());
    }
}
