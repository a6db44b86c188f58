//! # Connection Module
//!
//! Lazily establishes the single backend connection of a gateway context.
//! The first [`ConnectionSingleton::get_connection`] call resolves the
//! settings, connects to the platform and authenticates; every other call
//! joins or reuses that outcome. A failure is permanent for the context since
//! the platform does not allow reconnecting under the same identifier.

use std::sync::Arc;

use log::{debug, info};

use crate::auth::{self, Authenticator};
use crate::platform::{self, AuthClient, Connection, Platform, Reference};
use crate::settings::{self, FirebaseSettings, SettingsResolver};
use crate::utils::SingleFlight;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("configuration error :: {0}")]
    Settings(#[from] settings::Error),
    #[error("connection error :: {0}")]
    Platform(#[from] platform::Error),
    #[error("authentication error :: {0}")]
    Authentication(#[from] Arc<auth::Error>),
}

/// The backend connection together with the settings it was built from.
#[derive(Clone)]
pub struct ConnectionHandle {
    connection: Arc<dyn Connection>,
    settings: Arc<FirebaseSettings>,
}

impl ConnectionHandle {
    pub fn new(connection: Arc<dyn Connection>, settings: Arc<FirebaseSettings>) -> Self {
        Self {
            connection,
            settings,
        }
    }

    /// Identifier the connection was created with (the database root key).
    pub fn app_id(&self) -> &str {
        self.connection.app_id()
    }

    pub fn settings(&self) -> &FirebaseSettings {
        &self.settings
    }

    pub fn auth(&self) -> Arc<dyn AuthClient> {
        self.connection.auth()
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    /// Database reference at `path`.
    pub fn database(&self, path: &str) -> Reference {
        self.connection.database(path)
    }

    /// Storage reference at `path`.
    pub fn storage(&self, path: &str) -> Reference {
        self.connection.storage(path)
    }

    /// True when both handles share the same underlying connection.
    pub fn same_connection(&self, other: &ConnectionHandle) -> bool {
        Arc::ptr_eq(&self.connection, &other.connection)
    }
}

impl std::fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("app_id", &self.app_id())
            .finish()
    }
}

pub struct ConnectionSingleton {
    resolver: Arc<dyn SettingsResolver>,
    platform: Arc<dyn Platform>,
    authenticator: Arc<Authenticator>,
    flight: SingleFlight<ConnectionHandle, Error>,
}

impl ConnectionSingleton {
    pub fn new(
        resolver: Arc<dyn SettingsResolver>,
        platform: Arc<dyn Platform>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            resolver,
            platform,
            authenticator,
            flight: SingleFlight::new(),
        }
    }

    /// Returns the connection, creating and authenticating it on first use.
    pub async fn get_connection(&self) -> Result<ConnectionHandle, Arc<Error>> {
        let resolver = self.resolver.clone();
        let platform = self.platform.clone();
        let authenticator = self.authenticator.clone();

        self.flight
            .run(move || async move { establish(resolver, platform, authenticator).await })
            .await
    }

    /// True once a connection attempt was started.
    pub fn is_started(&self) -> bool {
        self.flight.is_started()
    }

    /// Settled outcome, if any, without starting or driving the connection.
    pub fn peek(&self) -> Option<Result<ConnectionHandle, Arc<Error>>> {
        self.flight.peek()
    }
}

async fn establish(
    resolver: Arc<dyn SettingsResolver>,
    platform: Arc<dyn Platform>,
    authenticator: Arc<Authenticator>,
) -> Result<ConnectionHandle, Error> {
    let settings = Arc::new(settings::firebase_settings(resolver.as_ref()).await?);

    info!("connecting app `{}`", settings.database_root_key);
    let connection = platform.connect(&settings.database_root_key, &settings.connection)?;
    let handle = ConnectionHandle::new(connection, settings.clone());

    authenticator
        .authenticate(handle.auth(), settings.auth.clone())
        .await?;
    debug!("app `{}` connected and authenticated", handle.app_id());

    Ok(handle)
}
