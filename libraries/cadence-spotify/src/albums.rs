//! Album digest for the landing view.
//!
//! Collapses several genre searches into unique albums and splits them into
//! three shelves of six.

use crate::source::TrackSource;
use crate::types::Track;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};

const SHELF_SIZE: usize = 6;

/// Genre queries used to fill the digest.
pub const DEFAULT_GENRES: &[&str] = &["genre:pop", "genre:rock", "genre:electronic", "genre:latin"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub image: String,
    pub release_date: Option<String>,
    pub total_tracks: Option<u32>,
    pub album_type: Option<String>,
}

/// Albums split into shelves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlbumDigest {
    pub featured: Vec<AlbumSummary>,
    pub new_releases: Vec<AlbumSummary>,
    pub popular: Vec<AlbumSummary>,
}

impl AlbumDigest {
    pub fn is_empty(&self) -> bool {
        self.featured.is_empty() && self.new_releases.is_empty() && self.popular.is_empty()
    }

    /// Split unique albums into consecutive shelves of six.
    pub fn from_albums(albums: Vec<AlbumSummary>) -> Self {
        let shelf = |n: usize| {
            albums
                .iter()
                .skip(n * SHELF_SIZE)
                .take(SHELF_SIZE)
                .cloned()
                .collect::<Vec<_>>()
        };

        Self {
            featured: shelf(0),
            new_releases: shelf(1),
            popular: shelf(2),
        }
    }
}

/// Unique albums across `tracks`, first occurrence wins.
///
/// Albums without an id or without any cover image are skipped.
pub fn unique_albums(tracks: &[Track]) -> Vec<AlbumSummary> {
    let mut seen = HashSet::new();
    let mut albums = Vec::new();

    for track in tracks {
        let Some(id) = track.album.id.as_deref() else {
            continue;
        };
        let Some(image) = track.artwork_url() else {
            continue;
        };
        if !seen.insert(id.to_string()) {
            continue;
        }

        albums.push(AlbumSummary {
            id: id.to_string(),
            name: track.album.name.clone().unwrap_or_default(),
            artist: track.primary_artist().unwrap_or("Unknown Artist").to_string(),
            image: image.to_string(),
            release_date: track.album.release_date.clone(),
            total_tracks: track.album.total_tracks,
            album_type: track.album.album_type.clone(),
        });
    }

    albums
}

/// Run each genre query and build the digest.
///
/// A failing query is logged and skipped; the remaining results still count.
pub async fn featured_albums<S>(source: &S, genres: &[&str]) -> AlbumDigest
where
    S: TrackSource + ?Sized,
{
    let mut tracks = Vec::new();
    for genre in genres {
        match source.search_tracks(genre).await {
            Ok(found) => tracks.extend(found),
            Err(e) => warn!(query = %genre, error = %e, "Genre search failed"),
        }
    }

    let digest = AlbumDigest::from_albums(unique_albums(&tracks));
    info!(
        featured = digest.featured.len(),
        new_releases = digest.new_releases.len(),
        popular = digest.popular.len(),
        "Album digest built"
    );
    digest
}
