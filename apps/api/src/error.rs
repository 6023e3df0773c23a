//! Error handling for the Muselink API
//!
//! This module provides a unified error type hierarchy using thiserror,
//! with automatic HTTP status code mapping via Axum's IntoResponse trait.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use muselink_mistral_client::MistralError;
use muselink_spotify_client::SpotifyError;
use serde::Serialize;
use thiserror::Error;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
}

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ========== Authentication ==========
    /// Invalid or missing API key
    #[error("authentication required")]
    Unauthorized,

    // ========== Validation Errors ==========
    /// Missing required query parameter
    #[error("missing required query parameter: {0}")]
    MissingQueryParam(&'static str),

    /// Invalid query parameter
    #[error("invalid query parameter '{name}': {reason}")]
    InvalidQueryParam { name: &'static str, reason: String },

    /// Request validation failed
    #[error("validation error: {0}")]
    ValidationError(String),

    // ========== Resource Errors ==========
    /// No playlist matched the requested name
    #[error("playlist not found: {0}")]
    PlaylistNotFound(String),

    /// The library has no playlists at all
    #[error("no playlists found in library")]
    NoPlaylists,

    /// No playlist name contains the requested genre
    #[error("no playlists match genre: {0}")]
    NoGenreMatch(String),

    /// The matching playlists contain no tracks
    #[error("no tracks found in playlists for genre: {0}")]
    NoTracks(String),

    /// No track satisfied the mood thresholds
    #[error("no {genre} track matches mood: {mood}")]
    NoMoodMatch { genre: String, mood: String },

    // ========== External Service Errors ==========
    /// Spotify API error
    #[error("Spotify error: {0}")]
    Spotify(#[from] SpotifyError),

    /// Mistral AI service error
    #[error("AI service error: {0}")]
    Mistral(#[from] MistralError),

    // ========== Internal Errors ==========
    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 401 Unauthorized
            Self::Unauthorized => StatusCode::UNAUTHORIZED,

            // 400 Bad Request
            Self::MissingQueryParam(_)
            | Self::InvalidQueryParam { .. }
            | Self::ValidationError(_) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            Self::PlaylistNotFound(_)
            | Self::NoPlaylists
            | Self::NoGenreMatch(_)
            | Self::NoTracks(_)
            | Self::NoMoodMatch { .. } => StatusCode::NOT_FOUND,

            // 502 Bad Gateway (external service errors)
            Self::Spotify(_) | Self::Mistral(_) => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            Self::Configuration(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::MissingQueryParam(_) => "MISSING_QUERY_PARAM",
            Self::InvalidQueryParam { .. } => "INVALID_QUERY_PARAM",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::PlaylistNotFound(_) => "PLAYLIST_NOT_FOUND",
            Self::NoPlaylists => "NO_PLAYLISTS",
            Self::NoGenreMatch(_) => "NO_GENRE_MATCH",
            Self::NoTracks(_) => "NO_TRACKS",
            Self::NoMoodMatch { .. } => "NO_MOOD_MATCH",
            Self::Spotify(_) => "SPOTIFY_ERROR",
            Self::Mistral(_) => "AI_SERVICE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Authorization error"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let body = ErrorResponse {
            code: self.error_code(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::NoPlaylists.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::MissingQueryParam("genre").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NoMoodMatch {
                genre: "rock".to_string(),
                mood: "happy".to_string(),
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::Unauthorized.error_code(), "UNAUTHORIZED");
        assert_eq!(
            ApiError::NoGenreMatch("jazz".to_string()).error_code(),
            "NO_GENRE_MATCH"
        );
        assert_eq!(
            ApiError::PlaylistNotFound("Chill".to_string()).error_code(),
            "PLAYLIST_NOT_FOUND"
        );
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::NoTracks("rock".to_string());
        assert_eq!(err.to_string(), "no tracks found in playlists for genre: rock");

        let err = ApiError::NoMoodMatch {
            genre: "rock".to_string(),
            mood: "sad".to_string(),
        };
        assert_eq!(err.to_string(), "no rock track matches mood: sad");
    }
}
