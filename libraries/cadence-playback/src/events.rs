//! Playback Events
//!
//! Event-based communication for UI synchronization.
//! Events are emitted at key points:
//! - Status changes (loading/ready/playing/paused/error)
//! - Song changes (every load)
//! - Position updates (coalesced: only the latest survives until drained)
//! - Playlist edits
//! - Recoverable errors

use crate::error::PlaybackError;
use crate::types::PlayerStatus;
use cadence_core::Song;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Player status changed
    StatusChanged { status: PlayerStatus },

    /// A new song was loaded
    SongChanged {
        song: Song,
        previous: Option<Song>,
    },

    /// Playing flag changed (always caused by an output event)
    PlayingChanged { is_playing: bool },

    /// Duration became known
    DurationChanged { duration_secs: f64 },

    /// Position update
    Progress {
        current_time_secs: f64,
        progress_percent: f64,
    },

    /// Song reached its end
    SongFinished { song: Song },

    /// Playlist edited or replaced
    PlaylistChanged { length: usize },

    /// Recoverable error
    Error { kind: ErrorKind, message: String },
}

/// Category of a reported error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Load,
    PlayRejected,
    Other,
}

impl From<&PlaybackError> for ErrorKind {
    fn from(err: &PlaybackError) -> Self {
        match err {
            PlaybackError::Load(_) => ErrorKind::Load,
            PlaybackError::PlayRejected(_) => ErrorKind::PlayRejected,
            _ => ErrorKind::Other,
        }
    }
}

impl PlaybackEvent {
    pub(crate) fn error(err: &PlaybackError) -> Self {
        Self::Error {
            kind: err.into(),
            message: err.to_string(),
        }
    }
}

/// Pending events waiting to be drained by the UI
///
/// Progress events overwrite each other: a burst of position updates
/// between two drains leaves a single event.
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    events: Vec<PlaybackEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: PlaybackEvent) {
        if matches!(event, PlaybackEvent::Progress { .. }) {
            if let Some(last @ PlaybackEvent::Progress { .. }) = self.events.last_mut() {
                *last = event;
                return;
            }
        }
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
