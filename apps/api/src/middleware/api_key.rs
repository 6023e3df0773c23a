//! API key extractor for Axum handlers
//!
//! Protected handlers take a [`RequireApiKey`] argument, which checks the
//! `X-API-Key` request header against the configured key and rejects the
//! request with 401 before the handler body runs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::middleware::RequireApiKey;
//!
//! async fn protected_handler(_auth: RequireApiKey) -> impl IntoResponse {
//!     "only reachable with a valid key"
//! }
//! ```

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{ApiError, ErrorResponse};

/// Header clients present their key in
pub const API_KEY_HEADER: &str = "x-api-key";

/// Configured API key, shared with handlers through request extensions
#[derive(Clone)]
pub struct ApiKeySettings {
    key: Arc<String>,
}

impl ApiKeySettings {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Arc::new(key.into()),
        }
    }

    fn matches(&self, candidate: &str) -> bool {
        self.key.as_str() == candidate
    }
}

impl std::fmt::Debug for ApiKeySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeySettings")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Extractor that requires a valid `X-API-Key` header
#[derive(Debug, Clone, Copy)]
pub struct RequireApiKey;

/// API key rejection types
#[derive(Debug)]
pub enum ApiKeyRejection {
    /// Missing X-API-Key header
    MissingKey,
    /// Presented key does not match the configured one
    InvalidKey,
    /// ApiKeySettings extension not installed
    MissingSettings,
}

impl IntoResponse for ApiKeyRejection {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiKeyRejection::MissingKey => {
                tracing::debug!("Request rejected: missing API key");
                (StatusCode::UNAUTHORIZED, ApiError::Unauthorized)
            }
            ApiKeyRejection::InvalidKey => {
                tracing::warn!("Request rejected: invalid API key");
                (StatusCode::UNAUTHORIZED, ApiError::Unauthorized)
            }
            ApiKeyRejection::MissingSettings => {
                tracing::error!("Request rejected: API key settings not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::Internal("API key settings not configured".to_string()),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: error.error_code(),
            message: error.to_string(),
        });

        (status, body).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireApiKey
where
    S: Send + Sync,
{
    type Rejection = ApiKeyRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let settings = parts
            .extensions
            .get::<ApiKeySettings>()
            .ok_or(ApiKeyRejection::MissingSettings)?;

        let presented = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiKeyRejection::MissingKey)?;

        if settings.matches(presented) {
            Ok(RequireApiKey)
        } else {
            Err(ApiKeyRejection::InvalidKey)
        }
    }
}
