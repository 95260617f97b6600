//! Core types for playback management

use cadence_core::Song;
use cadence_spotify::PlayablePolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifies one `load_song` call
///
/// Every load bumps the id; output events carry the id of the load that
/// produced them so late events from a replaced song can be told apart.
pub type LoadId = u64;

/// Player status for the song currently loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// Nothing loaded yet
    Idle,

    /// Source attached, waiting for the output to become ready
    Loading,

    /// Output can start playback
    Ready,

    /// Output reported playback started
    Playing,

    /// Output reported playback paused (or a play request was refused)
    Paused,

    /// The current song failed to load
    Error,
}

impl PlayerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Error => "error",
        }
    }
}

/// Where the initial playlist comes from when a track source is available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaylistSeed {
    /// Results of a search query
    Search { query: String },

    /// Items of a streaming playlist
    Playlist { id: String },

    /// Ignore the source and use the catalog
    Catalog,
}

impl Default for PlaylistSeed {
    fn default() -> Self {
        Self::Search {
            query: "genre:pop".to_string(),
        }
    }
}

/// Configuration for the playback engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Delay between end-of-track and advancing (default: 100ms)
    #[serde(default = "default_end_of_track_delay_ms")]
    pub end_of_track_delay_ms: u64,

    /// Which streaming tracks become songs (default: require a preview)
    #[serde(default)]
    pub playable_policy: PlayablePolicy,

    /// Initial playlist source (default: "genre:pop" search)
    #[serde(default)]
    pub seed: PlaylistSeed,
}

impl EngineConfig {
    pub fn end_of_track_delay(&self) -> Duration {
        Duration::from_millis(self.end_of_track_delay_ms)
    }
}

fn default_end_of_track_delay_ms() -> u64 {
    100
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            end_of_track_delay_ms: default_end_of_track_delay_ms(),
            playable_policy: PlayablePolicy::default(),
            seed: PlaylistSeed::default(),
        }
    }
}

/// Read-only view of the derived playback state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub current_song: Option<Song>,
    pub current_index: usize,
    pub is_playing: bool,
    /// 0-100
    pub progress: f64,
    /// Seconds; 0 while unknown
    pub duration: f64,
    /// Seconds
    pub current_time: f64,
    pub status: PlayerStatus,
    pub playlist_len: usize,
}

/// Output-facing internals, for debugging a misbehaving output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub load_id: LoadId,
    pub loaded_url: Option<String>,
    pub status: PlayerStatus,
    pub ready: bool,
    pub pending_play: bool,
    /// Engine clock time at which a scheduled advance fires
    pub pending_advance_due: Option<Duration>,
    pub events_attached: bool,
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.end_of_track_delay(), Duration::from_millis(100));
        assert_eq!(config.playable_policy, PlayablePolicy::RequirePreview);
        assert_eq!(
            config.seed,
            PlaylistSeed::Search {
                query: "genre:pop".to_string()
            }
        );
    }

    #[test]
    fn status_names() {
        assert_eq!(PlayerStatus::Idle.as_str(), "idle");
        assert_eq!(PlayerStatus::Playing.as_str(), "playing");
        assert_eq!(PlayerStatus::Error.as_str(), "error");
    }
}
