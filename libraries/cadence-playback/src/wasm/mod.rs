//! WASM bindings for cadence-playback
//!
//! Drives a browser `HtmlAudioElement` through the platform-agnostic engine
//! and exposes a JavaScript-friendly player.

pub mod output;
pub mod player;
pub mod types;

pub use output::WebAudioOutput;
pub use player::WasmPlayer;
pub use types::WasmSong;
