//! Random music fact generation
//!
//! Picks a random track from the user's library and asks the AI for an
//! interesting fact about it. Falls back to canned trivia when the
//! library is empty or the AI is unavailable, so the endpoint always
//! returns something.

use muselink_mistral_client::{ChatMessage, MistralClient};
use muselink_spotify_client::{SpotifyClient, Track};
use rand::seq::SliceRandom;
use tracing::instrument;

use crate::error::ApiResult;

/// Trivia served when no track can be selected or the AI fails
const FALLBACK_FACTS: &[&str] = &[
    "The longest officially released song is 'The Rise and Fall of Bossanova' by PC III, clocking in at 13 hours, 23 minutes and 32 seconds.",
    "The world's largest playable guitar is 13 meters long and weighs over 900 kilograms.",
    "A single violin is made from over 70 individual pieces of wood.",
    "The harmonica is the world's best-selling music instrument.",
    "Monaco's military orchestra is larger than its army.",
];

/// Random fact service combining the library and the AI client
#[derive(Clone)]
pub struct FactService {
    spotify: SpotifyClient,
    mistral: MistralClient,
}

impl FactService {
    pub fn new(spotify: SpotifyClient, mistral: MistralClient) -> Self {
        Self { spotify, mistral }
    }

    /// Generate a random music fact
    ///
    /// Tries, in order: an AI-generated fact about a random library
    /// track, a templated fact about that track if the AI fails, and
    /// finally canned trivia if no track could be selected.
    #[instrument(skip(self))]
    pub async fn random_fact(&self) -> ApiResult<String> {
        let track = match self.pick_random_track().await {
            Ok(Some(track)) => track,
            Ok(None) => {
                tracing::debug!("Library empty, serving canned trivia");
                return Ok(Self::canned_fact());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Track selection failed, serving canned trivia");
                return Ok(Self::canned_fact());
            }
        };

        let prompt = format!(
            "Tell me one short interesting fact about the song '{}' by {}. \
             Reply with just the fact, no preamble.",
            track.name,
            track.artist_names()
        );

        match self.mistral.chat(vec![ChatMessage::user(prompt)]).await {
            Ok(reply) => {
                let content = reply.content_or_empty().trim().to_string();
                if content.is_empty() {
                    Ok(Self::track_fallback(&track))
                } else {
                    Ok(content)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "AI fact generation failed, using fallback");
                Ok(Self::track_fallback(&track))
            }
        }
    }

    /// Pick a random track from a random playlist, if the library has one
    async fn pick_random_track(&self) -> ApiResult<Option<Track>> {
        let playlists = self.spotify.list_playlists().await?;
        let playlist = match playlists.choose(&mut rand::thread_rng()) {
            Some(p) => p.clone(),
            None => return Ok(None),
        };

        let tracks = self.spotify.list_playlist_tracks(&playlist.id).await?;
        Ok(tracks.choose(&mut rand::thread_rng()).cloned())
    }

    fn track_fallback(track: &Track) -> String {
        let seconds = track.duration_ms / 1000;
        format!(
            "'{}' by {} appears on the album '{}' and runs {}:{:02}.",
            track.name,
            track.artist_names(),
            track.album.name,
            seconds / 60,
            seconds % 60
        )
    }

    fn canned_fact() -> String {
        FALLBACK_FACTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(FALLBACK_FACTS[0])
            .to_string()
    }
}
