//! JS-facing song shape

use cadence_core::Song;
use serde::{Deserialize, Serialize};

/// Song as exchanged with JavaScript (camelCase fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasmSong {
    #[serde(default)]
    pub id: Option<String>,
    pub song_name: String,
    pub artist_name: String,
    #[serde(default)]
    pub song_url: String,
    #[serde(default)]
    pub artwork_url: String,
}

impl From<WasmSong> for Song {
    fn from(song: WasmSong) -> Self {
        let built = Song::new(song.song_name, song.artist_name, song.song_url)
            .with_artwork(song.artwork_url);
        match song.id {
            Some(id) => built.with_id(id),
            None => built,
        }
    }
}

impl From<&Song> for WasmSong {
    fn from(song: &Song) -> Self {
        Self {
            id: song.id().map(str::to_string),
            song_name: song.name().to_string(),
            artist_name: song.artist_name().to_string(),
            song_url: song.source_url().to_string(),
            artwork_url: song.artwork_url().to_string(),
        }
    }
}
