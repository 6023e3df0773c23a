//! Shared access-token cache for the Spotify Web API
//!
//! The cache is the only state shared between concurrent requests. A
//! refresh is at-least-once safe: two requests that both find the token
//! expired will both refresh, and the last successful write wins.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Seconds subtracted from the provider-reported lifetime so a token is
/// never used right at its expiry boundary.
const EXPIRY_MARGIN_SECS: u64 = 300;

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Process-wide access-token cache with an expiry timestamp
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<RwLock<Option<CachedToken>>>,
}

impl TokenCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached token if it has not reached its safety margin
    pub async fn get(&self) -> Option<String> {
        let guard = self.inner.read().await;
        guard
            .as_ref()
            .filter(|cached| cached.expires_at > Instant::now())
            .map(|cached| cached.token.clone())
    }

    /// Store a freshly issued token with its provider-reported lifetime
    pub async fn store(&self, token: impl Into<String>, expires_in_secs: u64) {
        let lifetime = expires_in_secs.saturating_sub(EXPIRY_MARGIN_SECS);
        let cached = CachedToken {
            token: token.into(),
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        };
        let mut guard = self.inner.write().await;
        *guard = Some(cached);
    }
}
