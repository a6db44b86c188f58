use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Error;
use crate::params;

/// Connection configuration for the backend platform.
///
/// Mirrors the JSON document stored under the `firebase` settings key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseSettings {
    #[serde(flatten)]
    pub connection: ConnectionParams,

    /// Database path prefix, also used as the unique app identifier.
    #[serde(default = "default_database_root_key")]
    pub database_root_key: String,

    /// Storage path prefix, [`None`] means the bucket root.
    #[serde(default)]
    pub storage_base_path: Option<String>,

    /// Authentication policy, [`None`] means anonymous sign-in.
    #[serde(default)]
    pub auth: Option<AuthSettings>,
}

fn default_database_root_key() -> String {
    params::DEFAULT_DATABASE_ROOT_KEY.to_owned()
}

impl FirebaseSettings {
    /// Checks constraints serde cannot express.
    pub fn validate(&self) -> Result<(), Error> {
        if self.database_root_key.trim().is_empty() {
            return Err(Error::InvalidValue {
                field: "databaseRootKey".to_owned(),
                msg: "must not be empty".to_owned(),
            });
        }
        Ok(())
    }
}

/// Platform connection parameters, forwarded untouched to
/// [`crate::platform::Platform::connect`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionParams {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub auth_domain: Option<String>,
    #[serde(default, rename = "databaseURL")]
    pub database_url: Option<url::Url>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub storage_bucket: Option<String>,
    #[serde(default)]
    pub messaging_sender_id: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub measurement_id: Option<String>,

    /// Any other parameter the platform understands.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Authentication policy.
///
/// Several branches may be populated at once; they are evaluated in the fixed
/// order defined by [`crate::auth::PRECEDENCE`] and only the first match is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthSettings {
    #[serde(default)]
    pub github: Option<OAuthSettings>,
    #[serde(default)]
    pub google: Option<OAuthSettings>,
    #[serde(default)]
    pub basic: Option<BasicSettings>,
    #[serde(default)]
    pub custom: bool,
    /// Opaque service-account document, never interpreted here.
    #[serde(default)]
    pub service_account: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OAuthSettings {
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
}

#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct BasicSettings {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BasicSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicSettings")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
