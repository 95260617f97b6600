//! Track source contract consumed by the playback engine.

use crate::error::Result;
use crate::types::{PlaylistPage, Track};
use async_trait::async_trait;

/// Anything that can supply streaming tracks.
///
/// `SpotifyClient` is the production implementation; tests substitute
/// in-memory fakes.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TrackSource {
    /// Search tracks by free text (or `genre:` style filters).
    async fn search_tracks(&self, query: &str) -> Result<Vec<Track>>;

    /// Fetch a playlist with its track items.
    async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistPage>;
}
