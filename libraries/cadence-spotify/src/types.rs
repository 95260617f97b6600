//! Types for streaming API payloads and client configuration.

use cadence_core::Song;
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

/// Configuration for the streaming API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyConfig {
    /// API base URL (e.g., "https://api.spotify.com/v1")
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Maximum number of tracks kept from a search
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// Optional ISO 3166-1 market filter
    #[serde(default)]
    pub market: Option<String>,
}

impl SpotifyConfig {
    /// Create a config pointing at a different API host (mock servers, proxies).
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            api_base_url: url.into(),
            ..Self::default()
        }
    }
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            search_limit: default_search_limit(),
            market: None,
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_search_limit() -> u32 {
    10
}

// =============================================================================
// Track Payloads
// =============================================================================

/// Streaming track as returned by search and playlist endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    /// 30 second preview; absent for many tracks
    #[serde(default)]
    pub preview_url: Option<String>,
    pub album: Album,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub total_tracks: Option<u32>,
    #[serde(default)]
    pub album_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

impl Track {
    /// First credited artist, if any.
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(|a| a.name.as_str())
    }

    /// Largest cover (the API lists images widest first).
    pub fn artwork_url(&self) -> Option<&str> {
        self.album.images.first().map(|i| i.url.as_str())
    }

    /// Whether the track carries a non-empty preview URL.
    pub fn has_preview(&self) -> bool {
        self.preview_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    /// Normalize into a `Song`, keeping the stable id.
    ///
    /// Tracks without a preview produce a song with an empty source URL,
    /// which the engine refuses to attach.
    pub fn to_song(&self) -> Song {
        let source_url = if self.has_preview() {
            self.preview_url.clone().unwrap_or_default()
        } else {
            String::new()
        };

        Song::new(
            self.name.clone(),
            self.primary_artist().unwrap_or("Unknown Artist"),
            source_url,
        )
        .with_id(self.id.clone())
        .with_artwork(self.artwork_url().unwrap_or_default())
    }
}

/// Which streaming tracks become playlist songs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayablePolicy {
    /// Drop tracks without a preview URL
    #[default]
    RequirePreview,

    /// Keep every track; unplayable ones carry an empty source URL
    KeepAll,
}

impl PlayablePolicy {
    /// Convert one track, or `None` when the policy excludes it.
    pub fn song_from(self, track: &Track) -> Option<Song> {
        match self {
            Self::RequirePreview if !track.has_preview() => None,
            _ => Some(track.to_song()),
        }
    }

    /// Convert a batch, preserving order.
    pub fn songs_from(self, tracks: &[Track]) -> Vec<Song> {
        tracks.iter().filter_map(|t| self.song_from(t)).collect()
    }
}

// =============================================================================
// Response Envelopes
// =============================================================================

/// Response from the search endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub tracks: SearchTracks,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchTracks {
    #[serde(default)]
    pub items: Vec<Track>,
}

/// Playlist with its first page of tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistPage {
    pub name: String,
    pub tracks: PlaylistTracks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistTracks {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
}

/// Playlist entry; `track` is null for removed items.
///
/// Entries whose track cannot be decoded (local files carry a null id)
/// read as `None` instead of failing the whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default, deserialize_with = "skippable_track")]
    pub track: Option<Track>,
}

fn skippable_track<'de, D>(deserializer: D) -> Result<Option<Track>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Track(Track),
        Other(IgnoredAny),
    }

    Ok(match Entry::deserialize(deserializer)? {
        Entry::Track(track) => Some(track),
        Entry::Other(_) => None,
    })
}

impl PlaylistPage {
    /// Tracks of the page, skipping null entries.
    pub fn tracks(&self) -> Vec<Track> {
        self.tracks
            .items
            .iter()
            .filter_map(|item| item.track.clone())
            .collect()
    }
}
