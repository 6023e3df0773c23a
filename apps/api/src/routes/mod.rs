//! HTTP route handlers for the Muselink API
//!
//! This module contains all REST endpoint handlers including:
//! - Spotify OAuth endpoints
//! - Library browsing endpoints
//! - Track recommendation endpoint
//! - Health check endpoints

pub mod auth;
pub mod fact;
pub mod health;
pub mod library;
pub mod recommendation;

pub use auth::{auth_router, AuthState};
pub use fact::{fact_router, FactState};
pub use health::health_router;
pub use library::{library_router, LibraryState};
pub use recommendation::{recommendation_router, RecommendationState};
