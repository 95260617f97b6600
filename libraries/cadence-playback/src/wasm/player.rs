//! WASM-compatible PlaybackEngine wrapper

use super::output::WebAudioOutput;
use super::types::WasmSong;
use crate::{EngineConfig, PlaybackEngine, PlaybackError};
use cadence_core::Song;
use cadence_spotify::Track;
use js_sys::Function;
use std::time::Duration;
use wasm_bindgen::prelude::*;

/// Browser music player
///
/// JavaScript must call `tick` regularly (e.g. from `requestAnimationFrame`)
/// so media events reach the engine and callbacks fire.
#[wasm_bindgen]
pub struct WasmPlayer {
    inner: PlaybackEngine<WebAudioOutput>,
    on_event: Option<Function>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player; `config` is an optional engine config object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let config: EngineConfig = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        let output = WebAudioOutput::new().map_err(to_js)?;

        Ok(Self {
            inner: PlaybackEngine::new(output, config),
            on_event: None,
        })
    }

    // ===== Initialization =====

    /// Start from the built-in catalog
    #[wasm_bindgen(js_name = initializeCatalog)]
    pub fn initialize_catalog(&mut self) {
        self.inner.initialize_with(Vec::new());
        self.flush();
    }

    /// Start from streaming API tracks (raw search result items)
    ///
    /// Falls back to the catalog when none is playable.
    #[wasm_bindgen(js_name = initializeWithTracks)]
    pub fn initialize_with_tracks(&mut self, tracks: JsValue) -> Result<(), JsValue> {
        let tracks: Vec<Track> = serde_wasm_bindgen::from_value(tracks)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse tracks: {}", e)))?;

        let songs = self.inner.config().playable_policy.songs_from(&tracks);
        self.inner.initialize_with(songs);
        self.flush();
        Ok(())
    }

    // ===== Playback Control =====

    #[wasm_bindgen(js_name = playPause)]
    pub fn play_pause(&mut self) {
        self.inner.play_pause();
        self.flush();
    }

    #[wasm_bindgen(js_name = nextSong)]
    pub fn next_song(&mut self) {
        self.inner.next_song();
        self.flush();
    }

    #[wasm_bindgen(js_name = previousSong)]
    pub fn previous_song(&mut self) {
        self.inner.previous_song();
        self.flush();
    }

    #[wasm_bindgen(js_name = selectSong)]
    pub fn select_song(&mut self, song: JsValue) -> Result<(), JsValue> {
        let song = parse_song(song)?;
        self.inner.select_song(song);
        self.flush();
        Ok(())
    }

    /// Play a search result, adding it to the playlist if needed
    #[wasm_bindgen(js_name = playTrack)]
    pub fn play_track(&mut self, song: JsValue) -> Result<(), JsValue> {
        let song = parse_song(song)?;
        self.inner.play_track(song);
        self.flush();
        Ok(())
    }

    /// Seek by percentage (0-100)
    #[wasm_bindgen(js_name = setProgress)]
    pub fn set_progress(&mut self, percentage: f64) {
        self.inner.set_progress(percentage);
        self.flush();
    }

    // ===== Playlist Management =====

    #[wasm_bindgen(js_name = addToPlaylist)]
    pub fn add_to_playlist(&mut self, song: JsValue) -> Result<(), JsValue> {
        let song = parse_song(song)?;
        self.inner.add_to_playlist(song);
        self.flush();
        Ok(())
    }

    #[wasm_bindgen(js_name = removeFromPlaylist)]
    pub fn remove_from_playlist(&mut self, index: usize) -> Result<JsValue, JsValue> {
        let removed = self.inner.remove_from_playlist(index).map_err(to_js)?;
        self.flush();
        to_value(&WasmSong::from(&removed))
    }

    // ===== State Queries =====

    #[wasm_bindgen(js_name = currentSong)]
    pub fn current_song(&self) -> JsValue {
        self.inner
            .current_song()
            .map(|song| to_value(&WasmSong::from(song)).unwrap_or(JsValue::NULL))
            .unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = currentIndex)]
    pub fn current_index(&self) -> usize {
        self.inner.current_index()
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.inner.is_playing()
    }

    pub fn progress(&self) -> f64 {
        self.inner.progress()
    }

    pub fn duration(&self) -> f64 {
        self.inner.duration()
    }

    #[wasm_bindgen(js_name = currentTime)]
    pub fn current_time(&self) -> f64 {
        self.inner.current_time()
    }

    pub fn status(&self) -> String {
        self.inner.status().as_str().to_string()
    }

    pub fn playlist(&self) -> JsValue {
        let songs: Vec<WasmSong> = self.inner.playlist().iter().map(WasmSong::from).collect();
        to_value(&songs).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = isCurrent)]
    pub fn is_current(&self, song: JsValue) -> bool {
        parse_song(song)
            .map(|song| self.inner.is_current(&song))
            .unwrap_or(false)
    }

    pub fn diagnostics(&self) -> JsValue {
        to_value(&self.inner.diagnostics()).unwrap_or(JsValue::NULL)
    }

    // ===== Events =====

    /// Register the event callback; receives one event object per call
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.on_event = Some(callback);
    }

    /// Apply queued media events and fire due timers
    ///
    /// `now_ms` is any monotonic clock, such as `performance.now()`.
    pub fn tick(&mut self, now_ms: f64) {
        let now = clock_from_ms(now_ms);
        self.inner.set_clock(now);
        self.inner.process_events();
        self.inner.tick(now);
        self.flush();
    }

    fn flush(&mut self) {
        let events = self.inner.drain_events();
        let Some(ref cb) = self.on_event else {
            return;
        };
        for event in events {
            if let Ok(js_event) = serde_wasm_bindgen::to_value(&event) {
                cb.call1(&JsValue::NULL, &js_event).ok();
            }
        }
    }
}

fn parse_song(value: JsValue) -> Result<Song, JsValue> {
    serde_wasm_bindgen::from_value::<WasmSong>(value)
        .map(Song::from)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse song: {}", e)))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn to_js(err: PlaybackError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// `performance.now()` milliseconds as an engine clock value
///
/// Negative, non-finite and out-of-range inputs read as zero.
fn clock_from_ms(now_ms: f64) -> Duration {
    if now_ms.is_finite() && now_ms > 0.0 {
        Duration::try_from_secs_f64(now_ms / 1000.0).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}
