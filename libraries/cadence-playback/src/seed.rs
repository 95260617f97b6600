//! Initial playlist resolution from a track source

use crate::error::{PlaybackError, Result};
use crate::types::{EngineConfig, PlaylistSeed};
use cadence_core::Song;
use cadence_spotify::TrackSource;
use tracing::{debug, info};

/// Fetch the songs described by `config.seed`
///
/// Tracks rejected by the playable policy are dropped. Returns
/// `EmptySource` when nothing survives so the caller can fall back to the
/// local catalog.
pub async fn fetch_songs<S>(source: &S, config: &EngineConfig) -> Result<Vec<Song>>
where
    S: TrackSource + ?Sized,
{
    let tracks = match &config.seed {
        PlaylistSeed::Search { query } => {
            debug!(query = %query, "Seeding playlist from search");
            source.search_tracks(query).await?
        }
        PlaylistSeed::Playlist { id } => {
            debug!(playlist = %id, "Seeding playlist from streaming playlist");
            let page = source.get_playlist(id).await?;
            page.tracks()
        }
        PlaylistSeed::Catalog => return Err(PlaybackError::EmptySource),
    };

    let songs = config.playable_policy.songs_from(&tracks);
    info!(
        fetched = tracks.len(),
        playable = songs.len(),
        "Track source results"
    );

    if songs.is_empty() {
        return Err(PlaybackError::EmptySource);
    }
    Ok(songs)
}
