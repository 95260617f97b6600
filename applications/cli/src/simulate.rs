//! Virtual-clock audio output for dry runs
//!
//! Nothing is decoded: every source "plays" for a fixed duration and the
//! position only moves when `advance` is called.

use cadence_playback::{AudioOutput, LoadId, OutputEvent, OutputEventSink, PlaybackError, Result};
use std::time::Duration;
use tracing::debug;

#[derive(Debug)]
pub struct SimulatedOutput {
    sink: Option<OutputEventSink>,
    load: Option<LoadId>,
    track_length: Duration,
    position: Duration,
    playing: bool,
    /// URL prefixes that fail to load, e.g. local files on a remote host
    unreachable_prefixes: Vec<String>,
}

impl SimulatedOutput {
    pub fn new(track_length: Duration) -> Self {
        Self {
            sink: None,
            load: None,
            track_length,
            position: Duration::ZERO,
            playing: false,
            unreachable_prefixes: Vec::new(),
        }
    }

    /// Sources starting with `prefix` report a media error
    #[must_use]
    pub fn failing_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.unreachable_prefixes.push(prefix.into());
        self
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    /// Move the virtual clock forward while playing
    pub fn advance(&mut self, elapsed: Duration) {
        let Some(load) = self.load else {
            return;
        };
        if !self.playing {
            return;
        }

        self.position = (self.position + elapsed).min(self.track_length);
        self.emit(load, self.time_update());

        if self.position >= self.track_length {
            self.playing = false;
            self.emit(load, OutputEvent::Paused);
            self.emit(load, OutputEvent::Ended);
        }
    }

    fn time_update(&self) -> OutputEvent {
        OutputEvent::TimeUpdate {
            current_time_secs: self.position.as_secs_f64(),
            duration_secs: self.track_length.as_secs_f64(),
        }
    }

    fn emit(&self, load: LoadId, event: OutputEvent) {
        if let Some(ref sink) = self.sink {
            sink.emit(load, event);
        }
    }
}

impl AudioOutput for SimulatedOutput {
    fn attach_events(&mut self, events: OutputEventSink) {
        self.sink = Some(events);
    }

    fn unload(&mut self) {
        self.load = None;
        self.playing = false;
        self.position = Duration::ZERO;
    }

    fn load(&mut self, load: LoadId, url: &str) -> Result<()> {
        debug!(load, url, "Simulated load");
        self.load = Some(load);

        if self
            .unreachable_prefixes
            .iter()
            .any(|prefix| url.starts_with(prefix.as_str()))
        {
            self.emit(
                load,
                OutputEvent::Error {
                    message: format!("cannot open {}", url),
                },
            );
            return Ok(());
        }

        self.emit(
            load,
            OutputEvent::MetadataLoaded {
                duration_secs: self.track_length.as_secs_f64(),
            },
        );
        self.emit(load, OutputEvent::Ready);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let Some(load) = self.load else {
            return Err(PlaybackError::PlayRejected("no source loaded".into()));
        };
        self.playing = true;
        self.emit(load, OutputEvent::PlayStarted);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(load) = self.load {
            self.playing = false;
            self.emit(load, OutputEvent::Paused);
        }
    }

    fn seek(&mut self, position_secs: f64) -> Result<()> {
        let Some(load) = self.load else {
            return Ok(());
        };
        self.position = Duration::from_secs_f64(position_secs.max(0.0)).min(self.track_length);
        self.emit(load, self.time_update());
        Ok(())
    }
}
