//! Mistral API error types

use thiserror::Error;

/// Mistral API client errors
#[derive(Error, Debug)]
pub enum MistralError {
    /// API key is missing
    #[error("API key is required for Mistral API access")]
    MissingApiKey,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("failed to parse Mistral response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Mistral returned a non-success status
    #[error("Mistral API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The completion carried no choices
    #[error("Mistral returned an empty completion")]
    EmptyResponse,

    /// Rate limited by Mistral
    #[error("rate limited by Mistral API")]
    RateLimited,

    /// Request timeout
    #[error("request to Mistral timed out")]
    Timeout,

    /// All retry attempts were exhausted
    #[error("retries exhausted after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

impl MistralError {
    /// Check if this error is a transient failure worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            MistralError::Timeout | MistralError::RateLimited => true,
            MistralError::Http(e) => {
                if e.is_timeout() || e.is_connect() {
                    return true;
                }
                matches!(e.status(), Some(status) if status.is_server_error())
            }
            MistralError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type for Mistral operations
pub type MistralResult<T> = Result<T, MistralError>;
