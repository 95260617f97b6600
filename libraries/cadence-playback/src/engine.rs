//! Playback engine - core orchestration
//!
//! Owns the single audio output, the playlist and the derived playback
//! state. Every derived value changes only in reaction to an output event;
//! user operations merely issue requests to the output.

use crate::{
    error::{PlaybackError, Result},
    events::{EventQueue, PlaybackEvent},
    output::{event_channel, AudioOutput, OutputEvent, OutputEventSink, TaggedOutputEvent},
    playlist::Playlist,
    seed,
    types::{Diagnostics, EngineConfig, LoadId, PlaybackSnapshot, PlayerStatus},
};
use cadence_core::{catalog, Song};
use cadence_spotify::TrackSource;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

/// Advance scheduled by an end-of-track event
#[derive(Debug, Clone, Copy)]
struct PendingAdvance {
    load: LoadId,
    due: Duration,
}

/// Central playback management
///
/// Single authority over what song is current, whether it plays and how far
/// through it is. The engine is single-threaded: the host feeds it output
/// events (`process_events`) and clock ticks (`tick`) from the same thread
/// that calls the control operations.
pub struct PlaybackEngine<O: AudioOutput> {
    output: O,
    config: EngineConfig,
    catalog: Vec<Song>,

    // Event channel from the output
    event_sink: Option<OutputEventSink>,
    event_rx: UnboundedReceiver<TaggedOutputEvent>,

    // Playlist and position
    playlist: Playlist,
    current_index: usize,
    current_song: Option<Song>,

    // Derived state (output-driven)
    status: PlayerStatus,
    is_playing: bool,
    progress: f64,
    duration: f64,
    current_time: f64,

    // Load bookkeeping
    load_id: LoadId,
    loaded_url: Option<String>,
    ready: bool,
    pending_play: bool,
    pending_advance: Option<PendingAdvance>,
    now: Duration,
    last_error: Option<PlaybackError>,

    // Event queue for UI synchronization
    pending_events: EventQueue,
}

impl<O: AudioOutput> PlaybackEngine<O> {
    /// Create a new engine around `output`
    ///
    /// The playlist stays empty until `initialize` or `initialize_with`.
    pub fn new(output: O, config: EngineConfig) -> Self {
        let (sink, rx) = event_channel();

        Self {
            output,
            config,
            catalog: catalog::default_catalog(),
            event_sink: Some(sink),
            event_rx: rx,
            playlist: Playlist::default(),
            current_index: 0,
            current_song: None,
            status: PlayerStatus::Idle,
            is_playing: false,
            progress: 0.0,
            duration: 0.0,
            current_time: 0.0,
            load_id: 0,
            loaded_url: None,
            ready: false,
            pending_play: false,
            pending_advance: None,
            now: Duration::ZERO,
            last_error: None,
            pending_events: EventQueue::default(),
        }
    }

    /// Replace the fallback catalog
    ///
    /// An empty list is ignored so the fallback can never be empty.
    #[must_use]
    pub fn with_catalog(mut self, songs: Vec<Song>) -> Self {
        if songs.is_empty() {
            warn!("Ignoring empty fallback catalog");
        } else {
            self.catalog = songs;
        }
        self
    }

    // ===== Initialization =====

    /// Populate the playlist from `source`, falling back to the catalog
    ///
    /// Errors, empty results and songs filtered out by the playable policy
    /// all end in the catalog. The first song is loaded without playing.
    pub async fn initialize<S>(&mut self, source: Option<&S>)
    where
        S: TrackSource + ?Sized,
    {
        let songs = match source {
            Some(source) => match seed::fetch_songs(source, &self.config).await {
                Ok(songs) => songs,
                Err(e) => {
                    warn!(error = %e, "Track source unavailable, using local catalog");
                    Vec::new()
                }
            },
            None => {
                debug!("No track source configured, using local catalog");
                Vec::new()
            }
        };

        self.initialize_with(songs);
    }

    /// Populate the playlist from already fetched songs
    ///
    /// Same contract as `initialize`: an empty list means the catalog.
    pub fn initialize_with(&mut self, songs: Vec<Song>) {
        if let Some(sink) = self.event_sink.take() {
            self.output.attach_events(sink);
            debug!("Output events attached");
        }

        let songs = if songs.is_empty() {
            self.catalog.clone()
        } else {
            songs
        };

        info!(songs = songs.len(), "Playlist initialized");
        self.playlist = Playlist::new(songs);
        self.current_index = 0;
        self.pending_events.push(PlaybackEvent::PlaylistChanged {
            length: self.playlist.len(),
        });

        if let Some(first) = self.playlist.get(0).cloned() {
            self.load_song(first, false);
        }
    }

    // ===== Playback Control =====

    /// Load a song into the output
    ///
    /// The previous source is stopped and detached before the new one is
    /// attached. With `auto_play` the play request waits for this load's
    /// readiness event.
    pub fn load_song(&mut self, song: Song, auto_play: bool) {
        self.output.unload();

        self.load_id += 1;
        self.loaded_url = None;
        self.ready = false;
        self.pending_play = false;
        self.pending_advance = None;
        self.last_error = None;
        self.reset_position();
        self.set_playing(false);

        info!(load = self.load_id, song = %song, auto_play, "Loading song");
        let previous = self.current_song.replace(song.clone());
        self.pending_events.push(PlaybackEvent::SongChanged {
            song: song.clone(),
            previous,
        });

        if !song.is_playable() {
            self.fail_load(PlaybackError::Load(format!("'{}' has no playable source", song.name())));
            return;
        }

        self.set_status(PlayerStatus::Loading);
        match self.output.load(self.load_id, song.source_url()) {
            Ok(()) => {
                self.loaded_url = Some(song.source_url().to_string());
                self.pending_play = auto_play;
            }
            Err(e) => self.fail_load(e),
        }
    }

    /// Play `song`, positioning the playlist on it when it is part of it
    ///
    /// Songs not in the playlist are played ad hoc; the position is kept.
    pub fn select_song(&mut self, song: Song) {
        match self.playlist.position_of(&song) {
            Some(index) => self.current_index = index,
            None => debug!(song = %song, "Selected song is not in the playlist"),
        }
        self.load_song(song, true);
    }

    /// Toggle between play and pause requests
    ///
    /// `is_playing` is left alone; it follows the output's events.
    pub fn play_pause(&mut self) {
        let Some(song) = self.current_song.clone() else {
            warn!("play_pause with nothing loaded");
            return;
        };

        if self.is_playing {
            debug!("Requesting pause");
            self.output.pause();
            return;
        }

        match self.status {
            PlayerStatus::Error => {
                debug!(song = %song, "Retrying failed song");
                self.load_song(song, true);
            }
            PlayerStatus::Loading => {
                // Readiness still pending: toggle the buffered request
                self.pending_play = !self.pending_play;
                debug!(pending_play = self.pending_play, "Play request buffered until ready");
            }
            _ => self.request_play(),
        }
    }

    /// Advance to the next song, wrapping at the end
    pub fn next_song(&mut self) {
        match self.playlist.next_index(self.current_index) {
            Some(index) => self.play_index(index),
            None => warn!("next_song on an empty playlist"),
        }
    }

    /// Go back to the previous song, wrapping at the start
    pub fn previous_song(&mut self) {
        match self.playlist.previous_index(self.current_index) {
            Some(index) => self.play_index(index),
            None => warn!("previous_song on an empty playlist"),
        }
    }

    /// Seek to `percentage` (0-100) of the current song
    ///
    /// Does nothing while the duration is unknown.
    pub fn set_progress(&mut self, percentage: f64) {
        if !percentage.is_finite() {
            debug!(percentage, "Ignoring non-finite seek");
            return;
        }
        if !has_duration(self.duration) {
            debug!("Seek ignored, duration unknown");
            return;
        }

        let position = percentage.clamp(0.0, 100.0) / 100.0 * self.duration;
        if let Err(e) = self.output.seek(position) {
            warn!(error = %e, position, "Seek failed");
        }
    }

    // ===== Playlist Management =====

    /// Append a song; position and current song are unchanged
    pub fn add_to_playlist(&mut self, song: Song) {
        debug!(song = %song, "Adding to playlist");
        self.playlist.push(song);
        self.pending_events.push(PlaybackEvent::PlaylistChanged {
            length: self.playlist.len(),
        });
    }

    /// Remove the song at `index`
    ///
    /// The position keeps its numeric value, wrapping to the start when it
    /// falls off the end. The loaded song keeps playing.
    pub fn remove_from_playlist(&mut self, index: usize) -> Result<Song> {
        if index >= self.playlist.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }
        if self.playlist.len() == 1 {
            return Err(PlaybackError::LastSong);
        }

        let removed = self
            .playlist
            .remove(index)
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;

        if self.current_index >= self.playlist.len() {
            self.current_index %= self.playlist.len();
        }

        debug!(index, song = %removed, position = self.current_index, "Removed from playlist");
        self.pending_events.push(PlaybackEvent::PlaylistChanged {
            length: self.playlist.len(),
        });
        Ok(removed)
    }

    /// Play a song picked outside the playlist (e.g. a search result)
    ///
    /// Appends it unless the playlist already holds it, then selects it.
    pub fn play_track(&mut self, song: Song) {
        if self.playlist.position_of(&song).is_none() {
            self.add_to_playlist(song.clone());
        }
        self.select_song(song);
    }

    // ===== Output Events =====

    /// Apply every output event queued since the last call, in order
    ///
    /// Returns the number of events consumed (stale ones included).
    pub fn process_events(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_output_event(event);
            count += 1;
        }
        count
    }

    /// Apply one output event
    ///
    /// Events from a load other than the current one are dropped.
    pub fn handle_output_event(&mut self, tagged: TaggedOutputEvent) {
        if tagged.load != self.load_id {
            debug!(
                event_load = tagged.load,
                current_load = self.load_id,
                event = ?tagged.event,
                "Dropping stale output event"
            );
            return;
        }

        match tagged.event {
            OutputEvent::MetadataLoaded { duration_secs } => {
                self.set_duration(duration_secs);
                self.progress = 0.0;
            }
            OutputEvent::Ready => self.on_ready(),
            OutputEvent::TimeUpdate {
                current_time_secs,
                duration_secs,
            } => self.on_time_update(current_time_secs, duration_secs),
            OutputEvent::Ended => self.on_ended(),
            OutputEvent::Error { message } => self.fail_load(PlaybackError::Load(message)),
            OutputEvent::PlayStarted => {
                self.set_playing(true);
                self.set_status(PlayerStatus::Playing);
            }
            OutputEvent::Paused => {
                self.set_playing(false);
                if self.status == PlayerStatus::Playing {
                    self.set_status(PlayerStatus::Paused);
                }
            }
            OutputEvent::PlayRejected { message } => {
                self.reject_play(PlaybackError::PlayRejected(message));
            }
        }
    }

    /// Move the engine clock without firing timers
    ///
    /// Hosts that drain output events less often than they happen call this
    /// first, so an end-of-track delay is measured from `now` and not from
    /// the previous tick.
    pub fn set_clock(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance the engine clock and fire a due end-of-track advance
    ///
    /// `now` is any monotonic time base chosen by the host.
    pub fn tick(&mut self, now: Duration) {
        self.set_clock(now);

        if let Some(pending) = self.pending_advance {
            if pending.load != self.load_id {
                self.pending_advance = None;
            } else if now >= pending.due {
                self.pending_advance = None;
                debug!(load = pending.load, "End-of-track delay elapsed");
                self.next_song();
            }
        }
    }

    fn on_ready(&mut self) {
        if self.ready {
            return;
        }
        self.ready = true;
        if self.status == PlayerStatus::Loading {
            self.set_status(PlayerStatus::Ready);
        }

        if self.pending_play {
            self.pending_play = false;
            self.request_play();
        }
    }

    fn on_time_update(&mut self, current_time: f64, duration: f64) {
        if has_duration(duration) && !has_duration(self.duration) {
            self.set_duration(duration);
        }

        self.current_time = if current_time.is_finite() {
            current_time.max(0.0)
        } else {
            0.0
        };

        let total = if has_duration(duration) {
            duration
        } else {
            self.duration
        };
        if has_duration(total) {
            self.progress = (self.current_time / total * 100.0).clamp(0.0, 100.0);
        }

        self.pending_events.push(PlaybackEvent::Progress {
            current_time_secs: self.current_time,
            progress_percent: self.progress,
        });
    }

    fn on_ended(&mut self) {
        self.set_playing(false);
        self.progress = 100.0;
        if has_duration(self.duration) {
            self.current_time = self.duration;
        }
        if self.status == PlayerStatus::Playing {
            self.set_status(PlayerStatus::Paused);
        }
        if let Some(song) = self.current_song.clone() {
            info!(song = %song, "Song finished");
            self.pending_events.push(PlaybackEvent::SongFinished { song });
        }

        let delay = self.config.end_of_track_delay();
        if delay.is_zero() {
            self.next_song();
        } else {
            self.pending_advance = Some(PendingAdvance {
                load: self.load_id,
                due: self.now + delay,
            });
        }
    }

    // ===== State Queries =====

    pub fn current_song(&self) -> Option<&Song> {
        self.current_song.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Progress through the current song, 0-100
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Duration in seconds; 0 while unknown
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Position in seconds
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Songs used when no track source delivers any
    pub fn catalog(&self) -> &[Song] {
        &self.catalog
    }

    pub fn playlist(&self) -> &[Song] {
        self.playlist.songs()
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Last recoverable error of the current load
    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    /// Whether `song` is the one currently loaded
    pub fn is_current(&self, song: &Song) -> bool {
        self.current_song
            .as_ref()
            .is_some_and(|current| current.is_same_track(song))
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_song: self.current_song.clone(),
            current_index: self.current_index,
            is_playing: self.is_playing,
            progress: self.progress,
            duration: self.duration,
            current_time: self.current_time,
            status: self.status,
            playlist_len: self.playlist.len(),
        }
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            load_id: self.load_id,
            loaded_url: self.loaded_url.clone(),
            status: self.status,
            ready: self.ready,
            pending_play: self.pending_play,
            pending_advance_due: self.pending_advance.map(|p| p.due),
            events_attached: self.event_sink.is_none(),
            last_error: self.last_error.as_ref().map(ToString::to_string),
        }
    }

    /// Access the output (e.g. to inspect a test double)
    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// The UI should call this after `process_events` to synchronize with
    /// playback state.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.pending_events.drain()
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    fn play_index(&mut self, index: usize) {
        let Some(song) = self.playlist.get(index).cloned() else {
            return;
        };
        self.current_index = index;
        self.load_song(song, true);
    }

    fn request_play(&mut self) {
        debug!(load = self.load_id, "Requesting play");
        if let Err(e) = self.output.play() {
            let err = match e {
                PlaybackError::PlayRejected(_) => e,
                other => PlaybackError::PlayRejected(other.to_string()),
            };
            self.reject_play(err);
        }
    }

    fn reject_play(&mut self, err: PlaybackError) {
        warn!(error = %err, "Play request rejected");
        self.set_playing(false);
        if !matches!(self.status, PlayerStatus::Error | PlayerStatus::Loading) {
            self.set_status(PlayerStatus::Paused);
        }
        self.report(err);
    }

    fn fail_load(&mut self, err: PlaybackError) {
        warn!(load = self.load_id, error = %err, "Load failed");
        self.pending_play = false;
        self.set_playing(false);
        self.set_status(PlayerStatus::Error);
        self.report(err);
    }

    fn report(&mut self, err: PlaybackError) {
        self.pending_events.push(PlaybackEvent::error(&err));
        self.last_error = Some(err);
    }

    fn reset_position(&mut self) {
        self.progress = 0.0;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.pending_events.push(PlaybackEvent::Progress {
            current_time_secs: 0.0,
            progress_percent: 0.0,
        });
    }

    fn set_duration(&mut self, duration: f64) {
        let duration = if has_duration(duration) { duration } else { 0.0 };
        if duration != self.duration {
            self.duration = duration;
            self.pending_events.push(PlaybackEvent::DurationChanged {
                duration_secs: duration,
            });
        }
    }

    fn set_playing(&mut self, is_playing: bool) {
        if self.is_playing != is_playing {
            self.is_playing = is_playing;
            self.pending_events
                .push(PlaybackEvent::PlayingChanged { is_playing });
        }
    }

    fn set_status(&mut self, status: PlayerStatus) {
        if self.status != status {
            debug!(from = ?self.status, to = ?status, "Status changed");
            self.status = status;
            self.pending_events
                .push(PlaybackEvent::StatusChanged { status });
        }
    }
}

fn has_duration(duration: f64) -> bool {
    duration.is_finite() && duration > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Unload,
        Load(LoadId, String),
        Play,
        Pause,
        Seek(f64),
    }

    /// Output that records calls and never emits on its own
    #[derive(Default)]
    struct RecordingOutput {
        calls: Rc<RefCell<Vec<Call>>>,
        sink: Option<OutputEventSink>,
        attach_count: usize,
        reject_play: bool,
    }

    impl AudioOutput for RecordingOutput {
        fn attach_events(&mut self, events: OutputEventSink) {
            self.attach_count += 1;
            self.sink = Some(events);
        }

        fn unload(&mut self) {
            self.calls.borrow_mut().push(Call::Unload);
        }

        fn load(&mut self, load: LoadId, url: &str) -> Result<()> {
            self.calls.borrow_mut().push(Call::Load(load, url.to_string()));
            Ok(())
        }

        fn play(&mut self) -> Result<()> {
            self.calls.borrow_mut().push(Call::Play);
            if self.reject_play {
                Err(PlaybackError::PlayRejected("NotAllowedError".into()))
            } else {
                Ok(())
            }
        }

        fn pause(&mut self) {
            self.calls.borrow_mut().push(Call::Pause);
        }

        fn seek(&mut self, position_secs: f64) -> Result<()> {
            self.calls.borrow_mut().push(Call::Seek(position_secs));
            Ok(())
        }
    }

    fn songs(names: &[&str]) -> Vec<Song> {
        names
            .iter()
            .map(|n| Song::new(*n, "Artist", format!("{}.mp3", n)))
            .collect()
    }

    fn engine(names: &[&str]) -> PlaybackEngine<RecordingOutput> {
        let config = EngineConfig {
            end_of_track_delay_ms: 0,
            ..EngineConfig::default()
        };
        let mut engine = PlaybackEngine::new(RecordingOutput::default(), config);
        engine.initialize_with(songs(names));
        engine
    }

    fn emit(engine: &mut PlaybackEngine<RecordingOutput>, event: OutputEvent) {
        let load = engine.diagnostics().load_id;
        engine.handle_output_event(TaggedOutputEvent { load, event });
    }

    #[test]
    fn initialize_loads_first_song_without_playing() {
        let engine = engine(&["a", "b"]);
        let calls = engine.output().calls.borrow().clone();

        assert_eq!(calls, vec![Call::Unload, Call::Load(1, "a.mp3".into())]);
        assert_eq!(engine.current_song().map(Song::name), Some("a"));
        assert_eq!(engine.status(), PlayerStatus::Loading);
        assert!(!engine.diagnostics().pending_play);
    }

    #[test]
    fn events_attach_once() {
        let mut engine = engine(&["a"]);
        engine.initialize_with(songs(&["b"]));
        assert_eq!(engine.output().attach_count, 1);
        assert!(engine.diagnostics().events_attached);
    }

    #[test]
    fn empty_songs_fall_back_to_catalog() {
        let engine = engine(&[]);
        assert_eq!(engine.playlist(), catalog::default_catalog().as_slice());
    }

    #[test]
    fn custom_catalog_is_exposed_and_used() {
        let custom = songs(&["local"]);
        let mut engine = engine(&["a"]).with_catalog(custom.clone());
        assert_eq!(engine.catalog(), custom.as_slice());

        engine.initialize_with(Vec::new());
        assert_eq!(engine.playlist(), custom.as_slice());
    }

    #[test]
    fn empty_custom_catalog_keeps_default() {
        let engine = engine(&["a"]).with_catalog(Vec::new());
        assert_eq!(engine.catalog(), catalog::default_catalog().as_slice());
    }

    #[test]
    fn unload_precedes_every_load() {
        let mut engine = engine(&["a", "b"]);
        engine.next_song();

        let calls = engine.output().calls.borrow().clone();
        assert_eq!(calls[2], Call::Unload);
        assert_eq!(calls[3], Call::Load(2, "b.mp3".into()));
    }

    #[test]
    fn auto_play_waits_for_ready_and_fires_once() {
        let mut engine = engine(&["a", "b"]);
        engine.next_song();
        assert!(!engine.output().calls.borrow().contains(&Call::Play));

        emit(&mut engine, OutputEvent::Ready);
        emit(&mut engine, OutputEvent::Ready);

        let plays = engine
            .output()
            .calls
            .borrow()
            .iter()
            .filter(|c| **c == Call::Play)
            .count();
        assert_eq!(plays, 1);
        assert!(!engine.is_playing());

        emit(&mut engine, OutputEvent::PlayStarted);
        assert!(engine.is_playing());
        assert_eq!(engine.status(), PlayerStatus::Playing);
    }

    #[test]
    fn stale_events_are_dropped() {
        let mut engine = engine(&["a", "b"]);
        let first_load = engine.diagnostics().load_id;
        engine.next_song();

        engine.handle_output_event(TaggedOutputEvent {
            load: first_load,
            event: OutputEvent::Ended,
        });
        engine.handle_output_event(TaggedOutputEvent {
            load: first_load,
            event: OutputEvent::Error {
                message: "decode".into(),
            },
        });

        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.status(), PlayerStatus::Loading);
        assert!(engine.last_error().is_none());
    }

    #[test]
    fn play_pause_does_not_flip_is_playing() {
        let mut engine = engine(&["a"]);
        emit(&mut engine, OutputEvent::Ready);

        engine.play_pause();
        assert!(!engine.is_playing());
        assert_eq!(engine.output().calls.borrow().last(), Some(&Call::Play));

        emit(&mut engine, OutputEvent::PlayStarted);
        engine.play_pause();
        assert!(engine.is_playing());
        assert_eq!(engine.output().calls.borrow().last(), Some(&Call::Pause));

        emit(&mut engine, OutputEvent::Paused);
        assert!(!engine.is_playing());
        assert_eq!(engine.status(), PlayerStatus::Paused);
    }

    #[test]
    fn rejected_play_reports_error() {
        let mut engine = engine(&["a"]);
        engine.output_mut().reject_play = true;
        emit(&mut engine, OutputEvent::Ready);
        engine.drain_events();

        engine.play_pause();

        assert!(!engine.is_playing());
        assert_eq!(engine.status(), PlayerStatus::Paused);
        assert!(matches!(
            engine.last_error(),
            Some(PlaybackError::PlayRejected(_))
        ));
        assert!(engine.drain_events().iter().any(|e| matches!(
            e,
            PlaybackEvent::Error {
                kind: crate::events::ErrorKind::PlayRejected,
                ..
            }
        )));
    }

    #[test]
    fn play_pause_while_loading_is_buffered() {
        let mut engine = engine(&["a"]);
        engine.play_pause();
        assert!(engine.diagnostics().pending_play);
        assert!(!engine.output().calls.borrow().contains(&Call::Play));

        emit(&mut engine, OutputEvent::Ready);
        assert_eq!(engine.output().calls.borrow().last(), Some(&Call::Play));
    }

    #[test]
    fn play_pause_retries_after_load_error() {
        let mut engine = engine(&["a"]);
        emit(
            &mut engine,
            OutputEvent::Error {
                message: "404".into(),
            },
        );
        assert_eq!(engine.status(), PlayerStatus::Error);

        engine.play_pause();
        assert_eq!(engine.status(), PlayerStatus::Loading);
        assert!(engine.diagnostics().pending_play);
        assert_eq!(engine.diagnostics().load_id, 2);
    }

    #[test]
    fn unplayable_song_is_never_attached() {
        let mut engine = engine(&["a"]);
        engine.select_song(Song::new("Silent", "Nobody", ""));

        assert_eq!(engine.status(), PlayerStatus::Error);
        assert!(matches!(engine.last_error(), Some(PlaybackError::Load(_))));
        assert_eq!(engine.output().calls.borrow().last(), Some(&Call::Unload));
        assert_eq!(engine.diagnostics().loaded_url, None);
    }

    #[test]
    fn set_progress_seeks_within_duration() {
        let mut engine = engine(&["a"]);
        engine.set_progress(50.0);
        assert!(!engine
            .output()
            .calls
            .borrow()
            .iter()
            .any(|c| matches!(c, Call::Seek(_))));

        emit(
            &mut engine,
            OutputEvent::MetadataLoaded {
                duration_secs: 200.0,
            },
        );
        engine.set_progress(25.0);
        engine.set_progress(150.0);

        let calls = engine.output().calls.borrow().clone();
        assert!(calls.contains(&Call::Seek(50.0)));
        assert_eq!(calls.last(), Some(&Call::Seek(200.0)));
        assert_eq!(engine.current_time(), 0.0);
    }

    #[test]
    fn time_update_drives_progress() {
        let mut engine = engine(&["a"]);
        emit(
            &mut engine,
            OutputEvent::MetadataLoaded {
                duration_secs: 120.0,
            },
        );
        emit(
            &mut engine,
            OutputEvent::TimeUpdate {
                current_time_secs: 30.0,
                duration_secs: 120.0,
            },
        );

        assert_eq!(engine.current_time(), 30.0);
        assert!((engine.progress() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn delayed_advance_fires_on_tick() {
        let mut engine = PlaybackEngine::new(RecordingOutput::default(), EngineConfig::default());
        engine.initialize_with(songs(&["a", "b"]));
        engine.tick(Duration::from_millis(1_000));

        emit(&mut engine, OutputEvent::Ended);
        assert_eq!(engine.current_index(), 0);

        engine.tick(Duration::from_millis(1_050));
        assert_eq!(engine.current_index(), 0);

        engine.tick(Duration::from_millis(1_100));
        assert_eq!(engine.current_index(), 1);
        assert!(engine.diagnostics().pending_advance_due.is_none());
    }

    #[test]
    fn user_navigation_cancels_pending_advance() {
        let mut engine = PlaybackEngine::new(RecordingOutput::default(), EngineConfig::default());
        engine.initialize_with(songs(&["a", "b", "c"]));

        emit(&mut engine, OutputEvent::Ended);
        engine.previous_song();
        assert_eq!(engine.current_index(), 2);

        engine.tick(Duration::from_secs(5));
        assert_eq!(engine.current_index(), 2);
    }

    #[test]
    fn remove_rejects_last_song_and_bad_index() {
        let mut engine = engine(&["a"]);
        assert_eq!(engine.remove_from_playlist(3), Err(PlaybackError::IndexOutOfBounds(3)));
        assert_eq!(engine.remove_from_playlist(0), Err(PlaybackError::LastSong));
        assert_eq!(engine.playlist().len(), 1);
    }

    #[test]
    fn play_track_appends_only_unknown_songs() {
        let mut engine = engine(&["a", "b"]);

        engine.play_track(Song::new("B", "artist", "b.mp3"));
        assert_eq!(engine.playlist().len(), 2);
        assert_eq!(engine.current_index(), 1);

        engine.play_track(Song::new("c", "Artist", "c.mp3").with_id("sp-c"));
        assert_eq!(engine.playlist().len(), 3);
        assert_eq!(engine.current_index(), 2);
        assert!(engine.is_current(&Song::new("x", "y", "").with_id("sp-c")));
    }
}
