//! # Settings Module
//!
//! Typed access to application settings. The gateway only needs one of them,
//! the backend connection configuration stored under the `firebase` key, but
//! resolvers are key-based so the same backend can serve other consumers.
//!
//! Resolvers return raw [`serde_json::Value`] documents; [`get_setting`] turns
//! them into typed records.

mod model;
pub use model::*;

mod resolvers;
pub use resolvers::*;

use async_trait::async_trait;
use log::trace;
use serde::de::DeserializeOwned;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("setting `{0}` not found")]
    NotFound(String),
    #[error("malformed setting `{key}` :: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value for `{field}`: {msg}")]
    InvalidValue { field: String, msg: String },
    #[error("unable to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Source of raw settings documents.
#[async_trait]
pub trait SettingsResolver: Send + Sync {
    /// Returns the settings document stored under `key`.
    async fn get_setting(&self, key: &str) -> Result<serde_json::Value, Error>;
}

/// Resolves `key` and deserializes it into `T`.
pub async fn get_setting<T>(resolver: &dyn SettingsResolver, key: &str) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    let value = resolver.get_setting(key).await?;
    trace!("resolved setting `{}`", key);

    serde_json::from_value(value).map_err(|source| Error::Malformed {
        key: key.to_owned(),
        source,
    })
}

/// Resolves and validates the backend connection configuration.
pub async fn firebase_settings(resolver: &dyn SettingsResolver) -> Result<FirebaseSettings, Error> {
    let settings: FirebaseSettings =
        get_setting(resolver, crate::params::SETTINGS_KEY_FIREBASE).await?;
    settings.validate()?;
    Ok(settings)
}
