//! Cadence Core
//!
//! Platform-agnostic song model shared by every Cadence crate.
//!
//! The core crate defines:
//! - **Song**: the normalized playable unit every other crate works with
//! - **Identity**: id-first, name+artist fallback matching between songs
//! - **Catalog**: the built-in local songs used when no streaming source is reachable
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{catalog, Song};
//!
//! let songs = catalog::default_catalog();
//! assert!(!songs.is_empty());
//!
//! let probe = Song::new("thrift shop", "MACKLEMORE & RYAN LEWIS", "");
//! assert!(songs.iter().any(|s| s.is_same_track(&probe)));
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod format;
pub mod song;

pub use catalog::CatalogEntry;
pub use error::{CoreError, Result};
pub use song::{Song, SongIdentity};
