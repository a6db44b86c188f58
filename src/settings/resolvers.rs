use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, trace};

use super::{Error, SettingsResolver};
use crate::params;

/// Variable lookup used by [`EnvSettingsResolver`].
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads settings from environment variables.
///
/// The document for `key` is looked up as JSON in `<prefix><KEY>`; if that
/// variable is not set, `<prefix><KEY>_FILE` may point at a JSON file.
#[derive(Clone)]
pub struct EnvSettingsResolver {
    prefix: String,
    lookup: EnvLookup,
}

impl Default for EnvSettingsResolver {
    fn default() -> Self {
        Self::new(params::configurables().settings_prefix.clone())
    }
}

impl EnvSettingsResolver {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_lookup(prefix, |name| std::env::var(name).ok())
    }

    /// Resolves variables through `lookup` instead of the process environment.
    pub fn with_lookup(
        prefix: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            lookup: Arc::new(lookup),
        }
    }

    fn var_name(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key.to_uppercase())
    }
}

impl std::fmt::Debug for EnvSettingsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSettingsResolver")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SettingsResolver for EnvSettingsResolver {
    async fn get_setting(&self, key: &str) -> Result<serde_json::Value, Error> {
        let var = self.var_name(key);

        if let Some(raw) = (self.lookup)(&var) {
            trace!("reading setting `{}` from `{}`", key, var);
            return serde_json::from_str(&raw).map_err(|source| Error::Malformed {
                key: key.to_owned(),
                source,
            });
        }

        let file_var = format!("{var}_FILE");
        match (self.lookup)(&file_var) {
            Some(path) => read_json_file(key, PathBuf::from(path)).await,
            None => Err(Error::NotFound(key.to_owned())),
        }
    }
}

/// Reads settings from `<dir>/<key>.json` files.
#[derive(Debug, Clone)]
pub struct FileSettingsResolver {
    dir: PathBuf,
}

impl FileSettingsResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl SettingsResolver for FileSettingsResolver {
    async fn get_setting(&self, key: &str) -> Result<serde_json::Value, Error> {
        read_json_file(key, self.dir.join(format!("{key}.json"))).await
    }
}

/// In-memory settings, mostly useful for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSettingsResolver {
    values: HashMap<String, serde_json::Value>,
}

impl StaticSettingsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }
}

#[async_trait]
impl SettingsResolver for StaticSettingsResolver {
    async fn get_setting(&self, key: &str) -> Result<serde_json::Value, Error> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| Error::NotFound(key.to_owned()))
    }
}

async fn read_json_file(key: &str, path: PathBuf) -> Result<serde_json::Value, Error> {
    debug!("reading setting `{}` from {}", key, path.display());

    let raw = tokio::fs::read(&path).await.map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound(key.to_owned()),
        _ => Error::Io {
            path: path.display().to_string(),
            source,
        },
    })?;

    serde_json::from_slice(&raw).map_err(|source| Error::Malformed {
        key: key.to_owned(),
        source,
    })
}
