//! Mistral AI configuration types

use crate::{get_env_or_default, get_required_env, parse_env, ConfigResult};

/// Mistral AI service configuration
#[derive(Debug, Clone)]
pub struct MistralConfig {
    /// API key for the Mistral platform
    pub api_key: String,

    /// Mistral API base URL
    pub url: String,

    /// Chat model (e.g. voxtral-small-2507)
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl MistralConfig {
    /// Load Mistral configuration from environment variables
    ///
    /// `MISTRAL_API_KEY` is required.
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            api_key: get_required_env("MISTRAL_API_KEY")?,
            url: get_env_or_default("MISTRAL_URL", "https://api.mistral.ai"),
            model: get_env_or_default("MISTRAL_MODEL", "voxtral-small-2507"),
            timeout_secs: parse_env("MISTRAL_TIMEOUT", 60)?,
        })
    }

    /// Create a configuration with a custom URL (useful for testing)
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            api_key: "test-api-key".to_string(),
            url: url.into(),
            model: "voxtral-small-2507".to_string(),
            timeout_secs: 60,
        }
    }

    /// Get the full URL for the chat completions endpoint
    pub fn chat_url(&self) -> String {
        format!("{}/v1/chat/completions", self.url.trim_end_matches('/'))
    }
}
