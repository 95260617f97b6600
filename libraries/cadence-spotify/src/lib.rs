//! Cadence Spotify Source
//!
//! Streaming track source for the Cadence playback engine.
//!
//! # Features
//!
//! - **Search**: free-text track search, trimmed to a configurable limit
//! - **Playlists**: fetch a playlist and its track items
//! - **Normalization**: strict `Track` payloads converted to `cadence_core::Song`
//! - **Album digest**: unique albums across several searches
//!
//! Authentication is not performed here. The client asks an
//! `AccessTokenProvider` for a valid token before every request.
//!
//! # Example
//!
//! ```ignore
//! use cadence_spotify::{SpotifyClient, SpotifyConfig, StaticToken, TrackSource, PlayablePolicy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SpotifyClient::new(SpotifyConfig::default(), StaticToken::new("BQD..."))?;
//!
//!     let tracks = client.search_tracks("genre:latin").await?;
//!     let songs = PlayablePolicy::RequirePreview.songs_from(&tracks);
//!     println!("{} playable of {}", songs.len(), tracks.len());
//!
//!     Ok(())
//! }
//! ```

pub mod albums;
mod auth;
mod client;
mod error;
mod source;
mod types;

pub use albums::{featured_albums, AlbumDigest, AlbumSummary};
pub use auth::{AccessToken, AccessTokenProvider, StaticToken};
pub use client::SpotifyClient;
pub use error::{Result, SourceError};
pub use source::TrackSource;
pub use types::{
    Album, Artist, Image, PlayablePolicy, PlaylistItem, PlaylistPage, PlaylistTracks,
    SpotifyConfig, Track,
};
