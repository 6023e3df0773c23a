//! API server configuration

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use muselink_shared_config::{Environment, MistralConfig, SpotifyConfig};

/// Minimum required length for API_KEY to be considered secure
const MIN_API_KEY_LENGTH: usize = 16;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port (default: 4567)
    pub port: u16,

    /// Deployment environment
    pub environment: Environment,

    /// Shared secret clients must present in the `X-API-Key` header
    pub api_key: String,

    /// Spotify credentials and endpoints
    pub spotify: SpotifyConfig,

    /// Mistral credentials and endpoints
    pub mistral: MistralConfig,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production mode, `API_KEY` must be set and at least 16
    /// characters long. In development a default key is used with a
    /// warning so the server can start without setup.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        )
        .unwrap_or_default();

        let api_key = Self::load_api_key(environment.is_production())?;

        let spotify = SpotifyConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load Spotify config: {}", e))?;
        let mistral = MistralConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load Mistral config: {}", e))?;

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "4567".to_string())
                .parse()
                .context("Invalid PORT value")?,

            environment,

            api_key,

            spotify,

            mistral,

            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
        })
    }

    /// Load and validate API_KEY
    ///
    /// In production:
    /// - API_KEY must be explicitly set
    /// - Must be at least MIN_API_KEY_LENGTH characters
    ///
    /// In development: uses a default value with a warning
    fn load_api_key(is_production: bool) -> Result<String> {
        match env::var("API_KEY") {
            Ok(key) if !key.is_empty() => {
                if is_production && key.len() < MIN_API_KEY_LENGTH {
                    bail!(
                        "API_KEY must be at least {} characters in production (got {})",
                        MIN_API_KEY_LENGTH,
                        key.len()
                    );
                }
                Ok(key)
            }
            _ if is_production => {
                bail!(
                    "API_KEY environment variable is required in production. \
                     Please set a secure key of at least {} characters.",
                    MIN_API_KEY_LENGTH
                );
            }
            _ => {
                tracing::warn!(
                    "API_KEY not set, using insecure default. \
                     This is only acceptable in development mode."
                );
                Ok("development-api-key".to_string())
            }
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}
