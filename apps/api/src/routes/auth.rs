//! Spotify OAuth route handlers
//!
//! Provides the one-time authorization flow used to obtain a refresh
//! token for the configured account:
//! - `GET /login` - Redirect the browser to Spotify's consent page
//! - `GET /callback` - Exchange the authorization code for tokens
//!
//! The callback relays Spotify's token response so the operator can copy
//! the refresh token into their environment.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
    routing::get,
    Json, Router,
};
use muselink_spotify_client::SpotifyClient;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};

/// Scopes requested during authorization
const OAUTH_SCOPES: &str = "user-read-private user-read-email playlist-read-private";

/// Shared application state for auth handlers
#[derive(Clone)]
pub struct AuthState {
    pub spotify: SpotifyClient,
}

impl AuthState {
    pub fn new(spotify: SpotifyClient) -> Self {
        Self { spotify }
    }
}

/// Create the OAuth router
pub fn auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .with_state(state)
}

/// Callback query parameters from Spotify
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    /// Authorization code on success
    pub code: Option<String>,
    /// Error identifier when the user denied consent
    pub error: Option<String>,
}

/// Redirect to Spotify's authorization page
async fn login(State(state): State<AuthState>) -> Redirect {
    let url = state.spotify.user_authorize_url(OAUTH_SCOPES);
    tracing::debug!("Redirecting to Spotify authorization");
    Redirect::temporary(&url)
}

/// Exchange the authorization code and relay Spotify's token response
async fn callback(
    State(state): State<AuthState>,
    Query(params): Query<CallbackParams>,
) -> ApiResult<impl IntoResponse> {
    if let Some(error) = params.error {
        return Err(ApiError::ValidationError(format!(
            "authorization denied: {}",
            error
        )));
    }

    let code = params
        .code
        .ok_or(ApiError::MissingQueryParam("code"))?;

    let tokens = state.spotify.exchange_code(&code).await?;
    tracing::info!("Authorization code exchanged successfully");

    Ok(Json(tokens))
}
