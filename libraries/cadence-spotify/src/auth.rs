//! Access token supply.

use crate::error::{Result, SourceError};
use async_trait::async_trait;

/// Bearer token for the streaming API.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Supplies a currently valid access token.
///
/// Implementors own refresh; the client only asks before each request.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AccessTokenProvider {
    async fn valid_access_token(&self) -> Result<AccessToken>;
}

/// Pre-issued token that never refreshes.
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: Option<AccessToken>,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.trim().is_empty()).then(|| AccessToken::new(token)),
        }
    }

    /// Provider without a token; every request fails with `AuthRequired`.
    pub fn none() -> Self {
        Self { token: None }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AccessTokenProvider for StaticToken {
    async fn valid_access_token(&self) -> Result<AccessToken> {
        self.token.clone().ok_or(SourceError::AuthRequired)
    }
}
