//! Spotify Web API client for muselink
//!
//! This crate provides the provider-facing half of the service:
//! - Paginated playlist and track listing, followed to exhaustion
//! - Single-track and audio-feature lookup
//! - Bulk audio-feature lookup (capped per call by the provider)
//! - Access-token caching with refresh-token grants
//!
//! # Example
//!
//! ```rust,no_run
//! use muselink_spotify_client::SpotifyClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SpotifyClient::from_env()?;
//!
//! for playlist in client.list_playlists().await? {
//!     println!("{}: {}", playlist.id, playlist.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! - `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`: OAuth credentials (required)
//! - `SPOTIFY_REFRESH_TOKEN`: token from the one-time login

mod client;
mod error;
mod models;
mod token;

pub use client::{SpotifyClient, AUDIO_FEATURES_BATCH_LIMIT};
pub use error::{SpotifyError, SpotifyResult};
pub use models::{Album, Artist, AudioFeatures, Playlist, Track};
pub use token::TokenCache;
