//! Streaming API client.

use crate::auth::AccessTokenProvider;
use crate::error::{Result, SourceError};
use crate::source::TrackSource;
use crate::types::{PlaylistPage, SearchResponse, SpotifyConfig, Track};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

/// Client for the Spotify Web API search and playlist endpoints.
///
/// # Example
///
/// ```ignore
/// use cadence_spotify::{SpotifyClient, SpotifyConfig, StaticToken, TrackSource};
///
/// let client = SpotifyClient::new(SpotifyConfig::default(), StaticToken::new(token))?;
/// let page = client.get_playlist("37i9dQZF1DXcBWIGoYBM5M").await?;
/// println!("{} has {} items", page.name, page.tracks.items.len());
/// ```
pub struct SpotifyClient<P> {
    http: Client,
    base_url: String,
    search_limit: u32,
    market: Option<String>,
    tokens: P,
}

impl<P: AccessTokenProvider> SpotifyClient<P> {
    /// Create a new client with the given configuration and token provider.
    pub fn new(config: SpotifyConfig, tokens: P) -> Result<Self> {
        if config.api_base_url.is_empty() {
            return Err(SourceError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.api_base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(SourceError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        Url::parse(&base_url).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;

        if config.search_limit == 0 {
            return Err(SourceError::InvalidUrl(
                "search limit must be at least 1".into(),
            ));
        }

        Ok(Self {
            http: build_http_client()?,
            base_url,
            search_limit: config.search_limit,
            market: config.market,
            tokens,
        })
    }

    /// Get the normalized API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        let token = self.tokens.valid_access_token().await?;
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Requesting {}", what);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token.as_str())
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    SourceError::Unreachable(e.to_string())
                } else {
                    SourceError::Request(e)
                }
            })?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| SourceError::ParseError(format!("Failed to parse {}: {}", what, e)))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http_client() -> Result<Client> {
    use std::time::Duration;

    Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("Cadence/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(SourceError::Request)
}

#[cfg(target_arch = "wasm32")]
fn build_http_client() -> Result<Client> {
    Client::builder().build().map_err(SourceError::Request)
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => {
            warn!("Streaming API rejected the access token");
            Err(SourceError::AuthRequired)
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(1);
            warn!(retry_after_secs, "Streaming API rate limit hit");
            Err(SourceError::RateLimited { retry_after_secs })
        }
        _ => {
            let message = response.text().await.unwrap_or_default();
            Err(SourceError::ApiError {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<P> TrackSource for SpotifyClient<P>
where
    P: AccessTokenProvider + Send + Sync,
{
    async fn search_tracks(&self, query: &str) -> Result<Vec<Track>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut params = vec![
            ("q", query.to_string()),
            ("type", "track".to_string()),
            ("limit", self.search_limit.to_string()),
        ];
        if let Some(market) = &self.market {
            params.push(("market", market.clone()));
        }

        let response: SearchResponse = self.get_json("/search", &params, "search results").await?;
        let mut tracks = response.tracks.items;
        tracks.truncate(self.search_limit as usize);

        info!(query = %query, count = tracks.len(), "Search completed");
        Ok(tracks)
    }

    async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistPage> {
        let mut params = Vec::new();
        if let Some(market) = &self.market {
            params.push(("market", market.clone()));
        }

        let path = format!("/playlists/{}", playlist_id.trim());
        let page: PlaylistPage = self.get_json(&path, &params, "playlist").await?;

        info!(
            playlist = %page.name,
            items = page.tracks.items.len(),
            "Playlist fetched"
        );
        Ok(page)
    }
}
