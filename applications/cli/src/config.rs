/// Application configuration
use crate::error::{CliError, Result};
use cadence_core::Song;
use cadence_playback::EngineConfig;
use cadence_spotify::{SpotifyConfig, StaticToken};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_spotify")]
    pub spotify: SpotifySettings,

    #[serde(default)]
    pub engine: EngineConfig,

    /// JSON catalog replacing the built-in fallback songs
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifySettings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer token; empty means the streaming API is not used
    #[serde(default)]
    pub access_token: String,

    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    #[serde(default)]
    pub market: Option<String>,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `cadence.toml` in the working
    /// directory is used if present. `CADENCE_` variables override both, with
    /// `__` between section and key (e.g. `CADENCE_SPOTIFY__ACCESS_TOKEN`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.spotify.api_base_url.trim().is_empty() {
            return Err(CliError::Config(
                "spotify.api_base_url must not be empty".to_string(),
            ));
        }

        if !(1..=50).contains(&self.spotify.search_limit) {
            return Err(CliError::Config(format!(
                "spotify.search_limit must be between 1 and 50, got {}",
                self.spotify.search_limit
            )));
        }

        if let Some(ref path) = self.catalog_path {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "Catalog not found at {:?}",
                    path
                )));
            }
        }

        Ok(())
    }

    /// Whether a token is configured for the streaming API
    pub fn has_token(&self) -> bool {
        !self.spotify.access_token.trim().is_empty()
    }

    pub fn spotify_config(&self) -> SpotifyConfig {
        SpotifyConfig {
            api_base_url: self.spotify.api_base_url.clone(),
            search_limit: self.spotify.search_limit,
            market: self.spotify.market.clone(),
        }
    }

    pub fn token(&self) -> StaticToken {
        StaticToken::new(self.spotify.access_token.clone())
    }

    /// Fallback songs: the configured catalog file, if any
    pub fn catalog(&self) -> Result<Option<Vec<Song>>> {
        match self.catalog_path {
            Some(ref path) => Ok(Some(cadence_core::catalog::load(path)?)),
            None => Ok(None),
        }
    }
}

// Default values
fn default_spotify() -> SpotifySettings {
    SpotifySettings {
        api_base_url: default_api_base_url(),
        access_token: String::new(),
        search_limit: default_search_limit(),
        market: None,
    }
}

fn default_api_base_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_search_limit() -> u32 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            spotify: default_spotify(),
            engine: EngineConfig::default(),
            catalog_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_playback::PlaylistSeed;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.has_token());
        assert_eq!(config.engine.end_of_track_delay_ms, 100);
    }

    #[test]
    fn loads_sections_from_file() {
        let file = write_config(
            r#"
[spotify]
access_token = "abc"
search_limit = 5
market = "ES"

[engine]
end_of_track_delay_ms = 250

[engine.seed]
kind = "playlist"
id = "37i9dQZF1DXcBWIGoYBM5M"
"#,
        );

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert!(config.has_token());
        assert_eq!(config.spotify.search_limit, 5);
        assert_eq!(config.spotify.market.as_deref(), Some("ES"));
        assert_eq!(config.spotify.api_base_url, "https://api.spotify.com/v1");
        assert_eq!(config.engine.end_of_track_delay_ms, 250);
        assert_eq!(
            config.engine.seed,
            PlaylistSeed::Playlist {
                id: "37i9dQZF1DXcBWIGoYBM5M".to_string()
            }
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/cadence.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn rejects_out_of_range_search_limit() {
        let mut config = AppConfig::default();
        config.spotify.search_limit = 0;
        assert!(config.validate().is_err());

        config.spotify.search_limit = 51;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_missing_catalog_file() {
        let config = AppConfig {
            catalog_path: Some(PathBuf::from("/nonexistent/catalog.json")),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(CliError::Config(_))));
    }

    #[test]
    fn custom_catalog_is_loaded() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        file.write_all(
            br#"[{"song_name": "Local", "artist_name": "Me", "song_url": "file:///local.mp3"}]"#,
        )
        .unwrap();

        let config = AppConfig {
            catalog_path: Some(file.path().to_path_buf()),
            ..AppConfig::default()
        };

        let songs = config.catalog().unwrap().unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].name(), "Local");
    }
}
