use axum::{
    extract::Extension,
    http::{header, Method},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod middleware;
mod routes;
mod services;

pub use error::{ApiError, ApiResult, ErrorResponse};

use middleware::ApiKeySettings;
use muselink_mistral_client::MistralClient;
use muselink_spotify_client::{SpotifyClient, TokenCache};
use routes::{
    auth_router, fact_router, health_router, library_router, recommendation_router, AuthState,
    FactState, LibraryState, RecommendationState,
};
use services::{FactService, RecommendationService};

/// Build the CORS layer based on configuration.
///
/// In production mode:
/// - If `CORS_ORIGINS` is set, only those origins are allowed
/// - If `CORS_ORIGINS` is not set, CORS requests are rejected (no origins allowed)
///
/// In development mode:
/// - If `CORS_ORIGINS` is set, those origins are used
/// - If `CORS_ORIGINS` is not set, permissive CORS is used for convenience
fn build_cors_layer(config: &config::Config) -> CorsLayer {
    let is_production = config.is_production();

    match &config.cors_allowed_origins {
        Some(origins) if !origins.is_empty() => {
            // Parse configured origins
            let allowed_origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!("Invalid CORS origin '{}', skipping", origin);
                        None
                    })
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::error!("No valid CORS origins configured, CORS requests will be rejected");
                CorsLayer::new()
            } else {
                tracing::info!(
                    "CORS configured with {} allowed origin(s): {:?}",
                    allowed_origins.len(),
                    origins
                );
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([
                        header::AUTHORIZATION,
                        header::CONTENT_TYPE,
                        header::ACCEPT,
                        header::ORIGIN,
                        header::HeaderName::from_static("x-api-key"),
                    ])
                    .allow_credentials(true)
                    .max_age(std::time::Duration::from_secs(3600))
            }
        }
        _ if is_production => {
            // Production without configured origins: strict CORS (no origins allowed)
            tracing::warn!(
                "CORS_ORIGINS not configured in production mode. \
                 CORS requests will be rejected. Set CORS_ORIGINS to allow cross-origin requests."
            );
            CorsLayer::new()
        }
        _ => {
            // Development without configured origins: permissive for convenience
            tracing::warn!(
                "Using permissive CORS in development mode. \
                 Set CORS_ORIGINS for production-like behavior."
            );
            CorsLayer::permissive()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "muselink_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting Muselink API server on port {}", config.port);

    // Spotify client with a shared token cache so concurrent handlers
    // reuse one access token
    let spotify = SpotifyClient::new(&config.spotify)?.with_token_cache(TokenCache::new());
    tracing::info!("Spotify client initialized");

    let mistral = MistralClient::new(&config.mistral)?;
    tracing::info!("Mistral client initialized");

    // Build service and route state
    let recommendation_service = RecommendationService::new(spotify.clone());
    let fact_service = FactService::new(spotify.clone(), mistral);

    let auth_state = AuthState::new(spotify.clone());
    let library_state = LibraryState::new(spotify);
    let recommendation_state = RecommendationState::new(recommendation_service);
    let fact_state = FactState::new(fact_service);

    // API routes require the X-API-Key header
    let api_routes = Router::new()
        .merge(library_router(library_state))
        .merge(recommendation_router(recommendation_state))
        .merge(fact_router(fact_state))
        .layer(Extension(ApiKeySettings::new(config.api_key.clone())));

    // Build the CORS layer from configuration
    let cors_layer = build_cors_layer(&config);

    // Build the router
    let app = Router::new()
        .route("/", get(root))
        // Nested health routes: /health, /health/live
        .nest("/health", health_router())
        // OAuth routes: /login, /callback
        .merge(auth_router(auth_state))
        // Versioned API routes: /api/v1/...
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn root() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "running" }))
}
