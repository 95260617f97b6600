//! Error types for the streaming source.

use thiserror::Error;

/// Errors that can occur when talking to the streaming API.
#[derive(Error, Debug)]
pub enum SourceError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// No usable access token
    #[error("Authentication required")]
    AuthRequired,

    /// Invalid API base URL
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse API response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// API is unreachable
    #[error("API unreachable: {0}")]
    Unreachable(String),

    /// Rate limited by the API
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
}

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
