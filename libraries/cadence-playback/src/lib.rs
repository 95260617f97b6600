//! Cadence - Playback Engine
//!
//! Platform-agnostic playback orchestration for Cadence.
//!
//! This crate provides:
//! - A playlist with wrap-around navigation
//! - A single injected audio output driven by load/play/pause/seek requests
//! - Output-event driven state (`is_playing` is never set optimistically)
//! - Load tagging so late events from a replaced song are ignored
//! - Debounced auto-advance at end of track
//! - Fallback to a built-in catalog when the track source fails
//!
//! # Architecture
//!
//! The engine owns no clock and no thread. The host:
//! - implements [`AudioOutput`] for its platform
//! - calls [`PlaybackEngine::process_events`] and [`PlaybackEngine::tick`]
//!   from its main loop
//! - drains [`PlaybackEvent`]s to update its UI
//!
//! The `wasm` feature ships a browser output over `HtmlAudioElement`.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::Song;
//! use cadence_playback::{
//!     AudioOutput, EngineConfig, OutputEventSink, PlaybackEngine, LoadId, Result,
//! };
//!
//! struct SilentOutput;
//!
//! impl AudioOutput for SilentOutput {
//!     fn attach_events(&mut self, _events: OutputEventSink) {}
//!     fn unload(&mut self) {}
//!     fn load(&mut self, _load: LoadId, _url: &str) -> Result<()> { Ok(()) }
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, _position_secs: f64) -> Result<()> { Ok(()) }
//! }
//!
//! let mut engine = PlaybackEngine::new(SilentOutput, EngineConfig::default());
//! engine.initialize_with(vec![
//!     Song::new("First", "Artist", "https://example.com/1.mp3"),
//!     Song::new("Second", "Artist", "https://example.com/2.mp3"),
//! ]);
//!
//! engine.next_song();
//! assert_eq!(engine.current_index(), 1);
//! assert!(!engine.is_playing()); // only a PlayStarted event flips this
//! ```

mod engine;
mod error;
mod events;
mod output;
mod playlist;
pub mod seed;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::{ErrorKind, PlaybackEvent};
pub use output::{AudioOutput, OutputEvent, OutputEventSink, TaggedOutputEvent};
pub use playlist::Playlist;
pub use types::{
    Diagnostics, EngineConfig, LoadId, PlaybackSnapshot, PlayerStatus, PlaylistSeed,
};
