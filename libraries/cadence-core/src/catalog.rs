//! Built-in local song catalog
//!
//! Used whenever the streaming source is unreachable or yields nothing
//! playable. Entries keep the record shape of the bundled media folder
//! (`song_name`, `artist_name`, `song_url`, `caratula`).

use crate::error::{CoreError, Result};
use crate::song::Song;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One record of a local catalog file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub song_name: String,
    pub artist_name: String,
    pub song_url: String,
    /// Cover art path
    #[serde(default)]
    pub caratula: String,
}

impl From<CatalogEntry> for Song {
    fn from(entry: CatalogEntry) -> Self {
        Song::new(entry.song_name, entry.artist_name, entry.song_url).with_artwork(entry.caratula)
    }
}

const BUILT_IN: &[(&str, &str, &str, &str)] = &[
    (
        "Cuando Calienta El Sol",
        "Luis Miguel",
        "./media/Luis Miguel — Cuando Calienta el Sol [Letra].mp3",
        "./media/Luismi.jpg",
    ),
    (
        "Thrift Shop",
        "Macklemore & Ryan Lewis",
        "./media/MACKLEMORE & RYAN LEWIS - THRIFT SHOP FEAT. WANZ (OFFICIAL VIDEO).mp3",
        "./media/thrift.jpg",
    ),
    (
        "Calle Ocho",
        "Pitbull",
        "./media/I Know You Want Me (Calle Ocho).mp3",
        "./media/Pitbull_i_know_you_want_me_cover.jpg",
    ),
    (
        "I Gotta Feeling",
        "Black Eyed Peas",
        "./media/Black Eyed Peas - I Gotta Feeling (Audio).mp3",
        "./media/gotta.jpg",
    ),
];

/// The built-in catalog, in playlist order
pub fn default_catalog() -> Vec<Song> {
    BUILT_IN
        .iter()
        .map(|(name, artist, url, art)| Song::new(*name, *artist, *url).with_artwork(*art))
        .collect()
}

/// Parse a catalog from a JSON array of entries
///
/// Every entry needs a name and a URL; an empty array is rejected so the
/// fallback playlist can never be empty.
pub fn from_json(json: &str) -> Result<Vec<Song>> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
    if entries.is_empty() {
        return Err(CoreError::EmptyCatalog);
    }

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            if entry.song_name.trim().is_empty() {
                return Err(CoreError::invalid_entry(index, "missing song_name"));
            }
            if entry.song_url.trim().is_empty() {
                return Err(CoreError::invalid_entry(index, "missing song_url"));
            }
            Ok(Song::from(entry))
        })
        .collect()
}

/// Read a catalog file from disk
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Song>> {
    let json = std::fs::read_to_string(path)?;
    from_json(&json)
}
