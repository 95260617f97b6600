//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// None of these are fatal: the engine stays usable after every one of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The output could not attach or decode the current song
    #[error("Failed to load media: {0}")]
    Load(String),

    /// The host refused a play request (autoplay policy, no user gesture)
    #[error("Play request rejected: {0}")]
    PlayRejected(String),

    /// The streaming source yielded nothing playable
    #[error("Track source returned no playable songs")]
    EmptySource,

    /// The streaming source failed
    #[error("Track source error: {0}")]
    Source(String),

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Removing the song would leave the playlist empty
    #[error("Cannot remove the last song of the playlist")]
    LastSong,
}

impl From<cadence_spotify::SourceError> for PlaybackError {
    fn from(err: cadence_spotify::SourceError) -> Self {
        Self::Source(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
