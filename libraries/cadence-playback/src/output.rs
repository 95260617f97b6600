//! Platform-agnostic audio output trait
//!
//! Abstracts the single media element the engine drives. The browser binding
//! wraps an `HtmlAudioElement`; tests use a recording fake.

use crate::error::Result;
use crate::types::LoadId;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Events reported by the output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputEvent {
    /// Duration became known
    MetadataLoaded { duration_secs: f64 },

    /// Enough data buffered to start playback
    Ready,

    /// Playback position moved
    TimeUpdate {
        current_time_secs: f64,
        duration_secs: f64,
    },

    /// Reached the end of the media
    Ended,

    /// The media failed to load or decode
    Error { message: String },

    /// Playback actually started
    PlayStarted,

    /// Playback actually paused
    Paused,

    /// A play request was refused after being accepted for processing
    PlayRejected { message: String },
}

/// Output event tagged with the load that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedOutputEvent {
    pub load: LoadId,
    pub event: OutputEvent,
}

/// Sending half of the output event channel
///
/// Handed to the output once, when the engine initializes.
#[derive(Debug, Clone)]
pub struct OutputEventSink {
    tx: UnboundedSender<TaggedOutputEvent>,
}

impl OutputEventSink {
    /// Queue an event for the engine
    ///
    /// Events sent after the engine is dropped are discarded.
    pub fn emit(&self, load: LoadId, event: OutputEvent) {
        if self.tx.send(TaggedOutputEvent { load, event }).is_err() {
            debug!(load, "Engine gone, dropping output event");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Create the output event channel
pub(crate) fn event_channel() -> (OutputEventSink, UnboundedReceiver<TaggedOutputEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (OutputEventSink { tx }, rx)
}

/// Platform-agnostic media output
///
/// Requests are fire-and-forget: outcomes arrive later as `OutputEvent`s
/// tagged with the `LoadId` passed to `load`. Implementors must never report
/// `PlayStarted` unless playback really started.
pub trait AudioOutput {
    /// Receive the event channel
    ///
    /// Called exactly once per engine.
    fn attach_events(&mut self, events: OutputEventSink);

    /// Stop playback and detach the current source
    ///
    /// After this returns the output must not emit further events for the
    /// previous load.
    fn unload(&mut self);

    /// Attach a new source and begin loading it
    fn load(&mut self, load: LoadId, url: &str) -> Result<()>;

    /// Request playback
    ///
    /// # Returns
    /// * `Ok(())` - Request accepted (it may still be refused later with `PlayRejected`)
    /// * `Err(PlaybackError::PlayRejected)` - Refused immediately
    fn play(&mut self) -> Result<()>;

    /// Request pause
    fn pause(&mut self);

    /// Move the playback position
    fn seek(&mut self, position_secs: f64) -> Result<()>;
}

impl<T: AudioOutput + ?Sized> AudioOutput for Box<T> {
    fn attach_events(&mut self, events: OutputEventSink) {
        (**self).attach_events(events);
    }

    fn unload(&mut self) {
        (**self).unload();
    }

    fn load(&mut self, load: LoadId, url: &str) -> Result<()> {
        (**self).load(load, url)
    }

    fn play(&mut self) -> Result<()> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn seek(&mut self, position_secs: f64) -> Result<()> {
        (**self).seek(position_secs)
    }
}
