//! Track recommendation HTTP route handler
//!
//! - `GET /track-recommendation?genre=&mood=` - First library track
//!   matching a genre and mood

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use muselink_spotify_client::Track;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::middleware::RequireApiKey;
use crate::services::{NoMatchReason, RecommendationOutcome, RecommendationService};

/// Shared application state for recommendation handlers
#[derive(Clone)]
pub struct RecommendationState {
    pub service: RecommendationService,
}

impl RecommendationState {
    pub fn new(service: RecommendationService) -> Self {
        Self { service }
    }
}

/// Create the recommendation router
pub fn recommendation_router(state: RecommendationState) -> Router {
    Router::new()
        .route("/track-recommendation", get(track_recommendation))
        .with_state(state)
}

/// Query parameters for the recommendation endpoint
#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    pub genre: Option<String>,
    pub mood: Option<String>,
}

/// Recommendation response body
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub track: Track,
    pub genre: String,
    pub mood: String,
}

/// Recommend the first library track matching a genre and mood
async fn track_recommendation(
    _auth: RequireApiKey,
    State(state): State<RecommendationState>,
    Query(params): Query<RecommendationParams>,
) -> ApiResult<Json<RecommendationResponse>> {
    let genre = params
        .genre
        .filter(|g| !g.trim().is_empty())
        .ok_or(ApiError::MissingQueryParam("genre"))?;
    let mood = params
        .mood
        .filter(|m| !m.trim().is_empty())
        .ok_or(ApiError::MissingQueryParam("mood"))?;

    match state.service.recommend(&genre, &mood).await {
        RecommendationOutcome::Match(track) => Ok(Json(RecommendationResponse {
            track,
            genre,
            mood,
        })),
        RecommendationOutcome::NoMatch(reason) => Err(match reason {
            NoMatchReason::NoPlaylists => ApiError::NoPlaylists,
            NoMatchReason::NoGenreMatch => ApiError::NoGenreMatch(genre),
            NoMatchReason::NoTracks => ApiError::NoTracks(genre),
            NoMatchReason::NoMoodMatch => ApiError::NoMoodMatch { genre, mood },
        }),
    }
}
