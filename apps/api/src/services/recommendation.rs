//! Track recommendation pipeline
//!
//! Resolves a (genre, mood) request against the user's library:
//!
//! 1. List every playlist and keep those whose name contains the genre
//!    (case-insensitive substring).
//! 2. Collect the tracks of the matching playlists in encounter order.
//! 3. Resolve audio features for all collected tracks in bulk batches.
//! 4. Return the first track whose features satisfy the mood thresholds.
//!
//! Each stage that comes up empty produces a distinct no-match reason so
//! callers can tell an empty library from a genre or mood miss. Provider
//! failures are swallowed at the failing call and treated as empty data,
//! so the gates still produce a typed reason instead of a transport error.

use std::collections::HashMap;

use muselink_spotify_client::{
    AudioFeatures, Playlist, SpotifyClient, Track, AUDIO_FEATURES_BATCH_LIMIT,
};
use tracing::instrument;

use crate::services::mood::MoodThresholds;

/// Why a recommendation request produced no track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMatchReason {
    /// The library has no playlists at all
    NoPlaylists,
    /// No playlist name contains the genre
    NoGenreMatch,
    /// The matching playlists contain no tracks
    NoTracks,
    /// No track's features satisfy the mood thresholds
    NoMoodMatch,
}

/// Result of a recommendation request
#[derive(Debug, Clone)]
pub enum RecommendationOutcome {
    /// The first track (in encounter order) matching the mood
    Match(Track),
    /// No track matched, with the stage that came up empty
    NoMatch(NoMatchReason),
}

/// Audio features resolved for a set of tracks
///
/// Batches that fail are skipped rather than aborting the whole request;
/// their tracks simply have no features and cannot match any mood with
/// configured bounds.
#[derive(Debug, Default)]
pub struct FeatureResolution {
    /// Features keyed by track ID
    pub features: HashMap<String, AudioFeatures>,
    /// Indices of batches that failed to resolve
    pub failed_batches: Vec<usize>,
}

/// Recommendation service backed by the Spotify library
#[derive(Clone)]
pub struct RecommendationService {
    spotify: SpotifyClient,
}

impl RecommendationService {
    pub fn new(spotify: SpotifyClient) -> Self {
        Self { spotify }
    }

    /// Filter playlists whose name contains the genre, case-insensitively
    pub fn filter_by_genre<'a>(playlists: &'a [Playlist], genre: &str) -> Vec<&'a Playlist> {
        let needle = genre.to_lowercase();
        playlists
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Resolve audio features for the given track IDs in bulk batches
    ///
    /// IDs are chunked to the provider's batch limit and requested
    /// sequentially. A failed batch is logged and skipped; the remaining
    /// batches still resolve.
    pub async fn resolve_features(&self, track_ids: &[String]) -> FeatureResolution {
        let mut resolution = FeatureResolution::default();

        for (index, batch) in track_ids.chunks(AUDIO_FEATURES_BATCH_LIMIT).enumerate() {
            match self.spotify.get_audio_features_bulk(batch).await {
                Ok(features) => {
                    for entry in features {
                        resolution.features.insert(entry.track_id.clone(), entry);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        batch = index,
                        batch_size = batch.len(),
                        error = %e,
                        "Audio features batch failed, skipping"
                    );
                    resolution.failed_batches.push(index);
                }
            }
        }

        resolution
    }

    /// Recommend the first library track matching a genre and mood
    ///
    /// Provider failures never escape this method: a failed playlist or
    /// track listing counts as empty data and resolves through the gates
    /// below, the same way failed feature batches do.
    #[instrument(skip(self))]
    pub async fn recommend(&self, genre: &str, mood: &str) -> RecommendationOutcome {
        let playlists = match self.spotify.list_playlists().await {
            Ok(playlists) => playlists,
            Err(e) => {
                tracing::warn!(error = %e, "Playlist listing failed, treating library as empty");
                Vec::new()
            }
        };
        if playlists.is_empty() {
            return RecommendationOutcome::NoMatch(NoMatchReason::NoPlaylists);
        }

        let matching = Self::filter_by_genre(&playlists, genre);
        if matching.is_empty() {
            tracing::debug!(genre, total = playlists.len(), "No playlists match genre");
            return RecommendationOutcome::NoMatch(NoMatchReason::NoGenreMatch);
        }

        // Tracks in playlist order, then track order within each playlist.
        // Duplicates across playlists are kept so the scan below sees the
        // same order a listener browsing the playlists would.
        let mut tracks: Vec<Track> = Vec::new();
        for playlist in &matching {
            match self.spotify.list_playlist_tracks(&playlist.id).await {
                Ok(playlist_tracks) => {
                    tracing::debug!(
                        playlist = %playlist.name,
                        count = playlist_tracks.len(),
                        "Collected playlist tracks"
                    );
                    tracks.extend(playlist_tracks);
                }
                Err(e) => {
                    tracing::warn!(
                        playlist = %playlist.name,
                        error = %e,
                        "Track listing failed, treating playlist as empty"
                    );
                }
            }
        }

        if tracks.is_empty() {
            return RecommendationOutcome::NoMatch(NoMatchReason::NoTracks);
        }

        let track_ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
        let resolution = self.resolve_features(&track_ids).await;

        if !resolution.failed_batches.is_empty() {
            tracing::warn!(
                failed_batches = ?resolution.failed_batches,
                resolved = resolution.features.len(),
                total = track_ids.len(),
                "Recommendation proceeding with partial audio features"
            );
        }

        let thresholds = MoodThresholds::for_mood(mood);
        for track in &tracks {
            if let Some(features) = resolution.features.get(&track.id) {
                if thresholds.matches(features) {
                    tracing::info!(
                        track = %track.name,
                        genre,
                        mood,
                        "Recommendation found"
                    );
                    return RecommendationOutcome::Match(track.clone());
                }
            }
        }

        RecommendationOutcome::NoMatch(NoMatchReason::NoMoodMatch)
    }
}
