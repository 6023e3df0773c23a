//! Library HTTP route handlers
//!
//! Read-only views over the connected Spotify account:
//! - `GET /playlists` - All playlists in the library
//! - `GET /playlist/tracks?name=&page=` - Paginated tracks of one playlist
//! - `GET /tracks/:id/audio-features` - Audio features for one track

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use muselink_spotify_client::{AudioFeatures, Playlist, SpotifyClient, Track};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::middleware::RequireApiKey;

/// Tracks returned per page of a playlist listing
const TRACKS_PER_PAGE: usize = 15;

/// Shared application state for library handlers
#[derive(Clone)]
pub struct LibraryState {
    pub spotify: SpotifyClient,
}

impl LibraryState {
    pub fn new(spotify: SpotifyClient) -> Self {
        Self { spotify }
    }
}

/// Create the library router
pub fn library_router(state: LibraryState) -> Router {
    Router::new()
        .route("/playlists", get(list_playlists))
        .route("/playlist/tracks", get(playlist_tracks))
        .route("/tracks/:id/audio-features", get(track_audio_features))
        .with_state(state)
}

// ========== Request/Response Types ==========

/// Query parameters for the playlist tracks endpoint
#[derive(Debug, Deserialize)]
pub struct PlaylistTracksParams {
    /// Playlist name to look up (full name, case-insensitive)
    pub name: Option<String>,
    /// Page number, 1-based (default: 1)
    pub page: Option<usize>,
}

/// One page of a playlist's tracks
#[derive(Debug, Serialize)]
pub struct PlaylistTracksResponse {
    pub playlist: Playlist,
    pub page: usize,
    pub total_pages: usize,
    pub total_tracks: usize,
    pub tracks: Vec<Track>,
}

// ========== Handlers ==========

/// List all playlists in the library
async fn list_playlists(
    _auth: RequireApiKey,
    State(state): State<LibraryState>,
) -> ApiResult<Json<Vec<Playlist>>> {
    let playlists = state.spotify.list_playlists().await?;
    Ok(Json(playlists))
}

/// List one page of a playlist's tracks, selected by name
///
/// The playlist is the first one whose full name equals the requested
/// name case-insensitively. The full track list is fetched from Spotify
/// and paginated locally at 15 tracks per page.
async fn playlist_tracks(
    _auth: RequireApiKey,
    State(state): State<LibraryState>,
    Query(params): Query<PlaylistTracksParams>,
) -> ApiResult<Json<PlaylistTracksResponse>> {
    let name = params
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or(ApiError::MissingQueryParam("name"))?;

    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(ApiError::InvalidQueryParam {
            name: "page",
            reason: "page numbers start at 1".to_string(),
        });
    }

    let playlists = state.spotify.list_playlists().await?;
    let needle = name.to_lowercase();
    let playlist = playlists
        .into_iter()
        .find(|p| p.name.to_lowercase() == needle)
        .ok_or_else(|| ApiError::PlaylistNotFound(name.clone()))?;

    let tracks = state.spotify.list_playlist_tracks(&playlist.id).await?;
    let total_tracks = tracks.len();
    let total_pages = total_tracks.div_ceil(TRACKS_PER_PAGE).max(1);

    let start = (page - 1).saturating_mul(TRACKS_PER_PAGE);
    let page_tracks: Vec<Track> = tracks.into_iter().skip(start).take(TRACKS_PER_PAGE).collect();

    Ok(Json(PlaylistTracksResponse {
        playlist,
        page,
        total_pages,
        total_tracks,
        tracks: page_tracks,
    }))
}

/// Get audio features for a single track
async fn track_audio_features(
    _auth: RequireApiKey,
    State(state): State<LibraryState>,
    Path(track_id): Path<String>,
) -> ApiResult<Json<AudioFeatures>> {
    let features = state.spotify.get_audio_features(&track_id).await?;
    Ok(Json(features))
}
