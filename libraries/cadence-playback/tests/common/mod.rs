//! Shared test infrastructure: a scriptable audio output and track sources

#![allow(dead_code)]

use async_trait::async_trait;
use cadence_core::Song;
use cadence_playback::{
    AudioOutput, LoadId, OutputEvent, OutputEventSink, PlaybackError, Result,
};
use cadence_spotify::{
    Album, Artist, Image, PlaylistItem, PlaylistPage, PlaylistTracks, SourceError, Track,
    TrackSource,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize tracing once for the whole test binary
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("cadence_playback=debug")
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Fake Output
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Attach,
    Unload,
    Load(LoadId, String),
    Play,
    Pause,
    Seek(f64),
}

#[derive(Default)]
struct FakeState {
    calls: Vec<Call>,
    sink: Option<OutputEventSink>,
    active: Option<LoadId>,
    /// Emit metadata + readiness as soon as a source is attached
    auto_ready: bool,
    /// Emit PlayStarted/Paused in response to requests
    auto_respond: bool,
    duration_secs: f64,
    reject_play: bool,
    /// Play requests are refused asynchronously instead of immediately
    reject_async: bool,
}

/// Audio output double
///
/// Cloning yields a handle to the same state, so a test keeps one clone
/// while the engine owns the other.
#[derive(Clone, Default)]
pub struct FakeOutput {
    state: Rc<RefCell<FakeState>>,
}

impl FakeOutput {
    /// Output that only records requests; the test emits every event
    pub fn manual() -> Self {
        Self::default()
    }

    /// Output that behaves like a well-connected browser
    pub fn browser_like(duration_secs: f64) -> Self {
        let output = Self::default();
        {
            let mut state = output.state.borrow_mut();
            state.auto_ready = true;
            state.auto_respond = true;
            state.duration_secs = duration_secs;
        }
        output
    }

    pub fn rejecting_play(self) -> Self {
        self.state.borrow_mut().reject_play = true;
        self
    }

    pub fn rejecting_play_async(self) -> Self {
        self.state.borrow_mut().reject_async = true;
        self
    }

    pub fn set_reject_play(&self, reject: bool) {
        self.state.borrow_mut().reject_play = reject;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.state.borrow().calls.iter().filter(|c| *c == call).count()
    }

    pub fn loads(&self) -> Vec<String> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Load(_, url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn active_load(&self) -> Option<LoadId> {
        self.state.borrow().active
    }

    /// Emit an event for the currently attached load
    pub fn emit(&self, event: OutputEvent) {
        let load = self.active_load().expect("no source attached");
        self.emit_for(load, event);
    }

    /// Emit an event tagged with an arbitrary load (e.g. a stale one)
    pub fn emit_for(&self, load: LoadId, event: OutputEvent) {
        let state = self.state.borrow();
        state
            .sink
            .as_ref()
            .expect("events not attached")
            .emit(load, event);
    }

    /// Playback reached `secs`
    pub fn time_update(&self, secs: f64) {
        let duration = self.state.borrow().duration_secs;
        self.emit(OutputEvent::TimeUpdate {
            current_time_secs: secs,
            duration_secs: duration,
        });
    }
}

impl AudioOutput for FakeOutput {
    fn attach_events(&mut self, events: OutputEventSink) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Attach);
        state.sink = Some(events);
    }

    fn unload(&mut self) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Unload);
        state.active = None;
    }

    fn load(&mut self, load: LoadId, url: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Load(load, url.to_string()));
        state.active = Some(load);

        if state.auto_ready {
            if let Some(sink) = &state.sink {
                sink.emit(
                    load,
                    OutputEvent::MetadataLoaded {
                        duration_secs: state.duration_secs,
                    },
                );
                sink.emit(load, OutputEvent::Ready);
            }
        }
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Play);

        if state.reject_play {
            return Err(PlaybackError::PlayRejected("NotAllowedError".into()));
        }
        if let (Some(load), Some(sink)) = (state.active, &state.sink) {
            if state.reject_async {
                sink.emit(
                    load,
                    OutputEvent::PlayRejected {
                        message: "NotAllowedError".into(),
                    },
                );
            } else if state.auto_respond {
                sink.emit(load, OutputEvent::PlayStarted);
            }
        }
        Ok(())
    }

    fn pause(&mut self) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Pause);
        if state.auto_respond {
            if let (Some(load), Some(sink)) = (state.active, &state.sink) {
                sink.emit(load, OutputEvent::Paused);
            }
        }
    }

    fn seek(&mut self, position_secs: f64) -> Result<()> {
        self.state.borrow_mut().calls.push(Call::Seek(position_secs));
        Ok(())
    }
}

// ============================================================================
// Songs and Tracks
// ============================================================================

pub fn song(name: &str) -> Song {
    Song::new(name, "Artist", format!("https://cdn.example/{}.mp3", name))
}

pub fn songs(names: &[&str]) -> Vec<Song> {
    names.iter().map(|n| song(n)).collect()
}

pub fn track(id: &str, name: &str, preview: Option<&str>) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        artists: vec![Artist {
            name: "Streamer".to_string(),
        }],
        preview_url: preview.map(str::to_string),
        album: Album {
            id: Some(format!("album-{}", id)),
            name: Some("Album".to_string()),
            images: vec![Image {
                url: format!("https://img.example/{}.jpg", id),
            }],
            ..Album::default()
        },
        duration_ms: Some(30_000),
    }
}

// ============================================================================
// Fake Track Source
// ============================================================================

/// In-memory track source
pub enum FakeSource {
    Tracks(Vec<Track>),
    Failing,
}

#[async_trait]
impl TrackSource for FakeSource {
    async fn search_tracks(&self, _query: &str) -> cadence_spotify::Result<Vec<Track>> {
        match self {
            Self::Tracks(tracks) => Ok(tracks.clone()),
            Self::Failing => Err(SourceError::Unreachable("connection refused".into())),
        }
    }

    async fn get_playlist(&self, _playlist_id: &str) -> cadence_spotify::Result<PlaylistPage> {
        match self {
            Self::Tracks(tracks) => {
                let mut items: Vec<PlaylistItem> = tracks
                    .iter()
                    .cloned()
                    .map(|t| PlaylistItem { track: Some(t) })
                    .collect();
                items.push(PlaylistItem { track: None });
                Ok(PlaylistPage {
                    name: "Mix".to_string(),
                    tracks: PlaylistTracks { items },
                })
            }
            Self::Failing => Err(SourceError::AuthRequired),
        }
    }
}
