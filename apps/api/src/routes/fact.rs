//! Random fact HTTP route handler
//!
//! - `GET /random-fact` - A music fact about a random library track

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::error::ApiResult;
use crate::middleware::RequireApiKey;
use crate::services::FactService;

/// Shared application state for fact handlers
#[derive(Clone)]
pub struct FactState {
    pub service: FactService,
}

impl FactState {
    pub fn new(service: FactService) -> Self {
        Self { service }
    }
}

/// Create the fact router
pub fn fact_router(state: FactState) -> Router {
    Router::new()
        .route("/random-fact", get(random_fact))
        .with_state(state)
}

/// Random fact response body
#[derive(Debug, Serialize)]
pub struct FactResponse {
    pub fact: String,
}

/// Serve a music fact about a random library track
async fn random_fact(
    _auth: RequireApiKey,
    State(state): State<FactState>,
) -> ApiResult<Json<FactResponse>> {
    let fact = state.service.random_fact().await?;
    Ok(Json(FactResponse { fact }))
}
