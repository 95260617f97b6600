//! Song domain type
//!
//! A `Song` is the only shape the playback engine understands. Local catalog
//! entries and streaming tracks are both converted into it at the boundary.

use serde::{Deserialize, Serialize};

/// Normalized playable unit
///
/// Immutable once built: fields are read through accessors and the only way
/// to change a song is to build a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Stable identifier from a streaming source (local songs have none)
    id: Option<String>,

    /// Song title
    name: String,

    /// Display artist
    artist_name: String,

    /// Media URL; empty when the song cannot be played
    source_url: String,

    /// Cover art URL
    artwork_url: String,
}

impl Song {
    /// Create a song without a stable id or artwork
    pub fn new(
        name: impl Into<String>,
        artist_name: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            artist_name: artist_name.into(),
            source_url: source_url.into(),
            artwork_url: String::new(),
        }
    }

    /// Attach a stable external identifier
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.id = if id.is_empty() { None } else { Some(id) };
        self
    }

    /// Attach cover art
    #[must_use]
    pub fn with_artwork(mut self, artwork_url: impl Into<String>) -> Self {
        self.artwork_url = artwork_url.into();
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn artist_name(&self) -> &str {
        &self.artist_name
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn artwork_url(&self) -> &str {
        &self.artwork_url
    }

    /// Whether there is anything to attach to the output
    pub fn is_playable(&self) -> bool {
        !self.source_url.trim().is_empty()
    }

    /// Identity key used for matching
    pub fn identity(&self) -> SongIdentity<'_> {
        match &self.id {
            Some(id) => SongIdentity::Id(id),
            None => SongIdentity::NameArtist {
                name: &self.name,
                artist: &self.artist_name,
            },
        }
    }

    /// Whether two songs refer to the same track
    ///
    /// Ids decide when both sides carry one. Otherwise name and artist are
    /// compared case-insensitively.
    pub fn is_same_track(&self, other: &Song) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.same_name_and_artist(other),
        }
    }

    /// Case-insensitive `(name, artist)` comparison
    pub fn same_name_and_artist(&self, other: &Song) -> bool {
        eq_ignore_case(&self.name, &other.name) && eq_ignore_case(&self.artist_name, &other.artist_name)
    }
}

/// Identity key of a song
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongIdentity<'a> {
    /// Stable external identifier
    Id(&'a str),

    /// Fallback identity for songs without an id
    NameArtist { name: &'a str, artist: &'a str },
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

impl std::fmt::Display for Song {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.artist_name, self.name)
    }
}
