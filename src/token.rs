//! Custom access tokens for the `custom` authentication policy.

use async_trait::async_trait;
use serde::Deserialize;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no custom token provider configured")]
    Unavailable,
    #[error("custom token provider failure :: {0}")]
    Provider(String),
}

/// Bearer token issued by an external service, exchanged for a session.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
pub trait CustomTokenProvider: Send + Sync {
    async fn acquire_custom_access_token(&self) -> Result<AccessToken, Error>;
}

/// Provider used when none is configured, every request fails with
/// [`Error::Unavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCustomTokenProvider;

#[async_trait]
impl CustomTokenProvider for NoCustomTokenProvider {
    async fn acquire_custom_access_token(&self) -> Result<AccessToken, Error> {
        Err(Error::Unavailable)
    }
}
