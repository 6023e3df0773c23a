//! Spotify Web API response models

use serde::{Deserialize, Serialize};
use url::Url;

/// A playlist owned or followed by the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Playlist {
    /// Spotify playlist ID
    pub id: String,
    /// Playlist display name
    pub name: String,
}

/// A track artist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artist {
    /// Artist name
    pub name: String,
}

/// An album reference carried on a track
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Album {
    /// Album name
    pub name: String,
}

/// A track as returned by playlist listings and track lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    /// Spotify track ID
    pub id: String,
    /// Track title
    pub name: String,
    /// Artists in provider order
    pub artists: Vec<Artist>,
    /// Track length in milliseconds
    pub duration_ms: u64,
    /// Album the track appears on
    pub album: Album,
}

impl Track {
    /// All artist names joined for display, in provider order
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Audio features for a single track
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioFeatures {
    /// Spotify track ID this feature vector belongs to
    pub track_id: String,
    /// Musical positiveness, 0.0 - 1.0
    pub valence: f64,
    /// Perceived intensity, 0.0 - 1.0
    pub energy: f64,
}

// Internal response types for deserialization

/// One page of a paginated listing, with the provider-supplied cursor
/// to the next page (absent on the last page).
#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlaylist {
    pub id: String,
    pub name: String,
}

impl From<RawPlaylist> for Playlist {
    fn from(raw: RawPlaylist) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
        }
    }
}

/// Playlist track entry; `track` is null for removed or local items
#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItem {
    pub track: Option<RawTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTrack {
    // Local tracks carry no Spotify ID
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub duration_ms: u64,
    pub album: Option<Album>,
}

impl RawTrack {
    /// Convert to the public track type; None when the provider sent
    /// an entry without an ID.
    pub(crate) fn into_track(self) -> Option<Track> {
        Some(Track {
            id: self.id?,
            name: self.name,
            artists: self.artists,
            duration_ms: self.duration_ms,
            album: self.album.unwrap_or(Album {
                name: String::new(),
            }),
        })
    }
}

/// Bulk audio-features envelope; unknown IDs come back as null entries
#[derive(Debug, Deserialize)]
pub(crate) struct AudioFeaturesResponse {
    #[serde(default = "Vec::new")]
    pub audio_features: Vec<Option<RawAudioFeatures>>,
}

/// Raw feature record. The track ID is not a plain field here: the
/// provider embeds it in the self-referential `track_href` link, and it
/// must be recovered from that link's trailing path segment.
#[derive(Debug, Deserialize)]
pub(crate) struct RawAudioFeatures {
    pub valence: f64,
    pub energy: f64,
    pub track_href: String,
}

impl RawAudioFeatures {
    /// Convert to the public type; None when the resource link does not
    /// yield a track ID.
    pub(crate) fn into_features(self) -> Option<AudioFeatures> {
        let track_id = track_id_from_href(&self.track_href)?;
        Some(AudioFeatures {
            track_id,
            valence: self.valence,
            energy: self.energy,
        })
    }
}

/// Extract a track ID from a self-referential resource link such as
/// `https://api.spotify.com/v1/tracks/6rqhFgbbKwnb9MLmUQDhG6`.
///
/// This is the only place the link-embedded-ID format is interpreted;
/// everything downstream sees plain track IDs.
pub(crate) fn track_id_from_href(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    let id = url
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()?;
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}
