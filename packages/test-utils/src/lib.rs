//! Shared test utilities for the muselink workspace
//!
//! Provides a mock Spotify server plus JSON fixture builders so tests
//! across the workspace can simulate provider responses consistently.

mod spotify;

pub use spotify::{
    AudioFeaturesFixture, MockSpotifyServer, PlaylistFixture, TrackFixture,
};
