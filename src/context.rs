//! Process-scoped gateway context.
//!
//! A [`Gateway`] owns the memoized connection and authentication outcomes of
//! one process. Build one at startup and share it (it is cheap to clone);
//! tests build a fresh one per case.

use std::sync::Arc;

use tokio::sync::watch;

use crate::auth::{Authenticator, SessionState};
use crate::connection::{self, ConnectionHandle, ConnectionSingleton};
use crate::facades::{FacadeError, FacadeReference};
use crate::platform::{Platform, Reference, User};
use crate::settings::{EnvSettingsResolver, SettingsResolver};
use crate::token::{CustomTokenProvider, NoCustomTokenProvider};
use crate::trace::{LogTracer, SessionTracer};

#[derive(Clone)]
pub struct Gateway {
    connection: Arc<ConnectionSingleton>,
    authenticator: Arc<Authenticator>,
    references: FacadeReference,
}

impl Gateway {
    pub fn builder(platform: Arc<dyn Platform>) -> GatewayBuilder {
        GatewayBuilder::new(platform)
    }

    /// Backend connection, established and authenticated on first use.
    pub async fn connection(&self) -> Result<ConnectionHandle, Arc<connection::Error>> {
        self.connection.get_connection().await
    }

    pub async fn database_reference(&self) -> Result<Reference, FacadeError> {
        self.references.get_database_reference().await
    }

    pub async fn storage_reference(&self) -> Result<Reference, FacadeError> {
        self.references.get_storage_reference().await
    }

    /// Current session state snapshot.
    pub fn session(&self) -> SessionState {
        self.authenticator.session()
    }

    /// Receiver notified on every session state change.
    pub fn subscribe_session(&self) -> watch::Receiver<SessionState> {
        self.authenticator.subscribe()
    }

    pub fn current_user(&self) -> Option<User> {
        self.authenticator.current_user()
    }

    pub fn authenticator(&self) -> &Arc<Authenticator> {
        &self.authenticator
    }
}

pub struct GatewayBuilder {
    platform: Arc<dyn Platform>,
    settings: Option<Arc<dyn SettingsResolver>>,
    tokens: Option<Arc<dyn CustomTokenProvider>>,
    tracer: Option<Arc<dyn SessionTracer>>,
}

impl GatewayBuilder {
    fn new(platform: Arc<dyn Platform>) -> Self {
        Self {
            platform,
            settings: None,
            tokens: None,
            tracer: None,
        }
    }

    /// Settings source, defaults to [`EnvSettingsResolver`].
    pub fn settings(mut self, resolver: Arc<dyn SettingsResolver>) -> Self {
        self.settings = Some(resolver);
        self
    }

    /// Custom token issuer, defaults to [`NoCustomTokenProvider`].
    pub fn token_provider(mut self, tokens: Arc<dyn CustomTokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Telemetry sink, defaults to [`LogTracer`].
    pub fn tracer(mut self, tracer: Arc<dyn SessionTracer>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn build(self) -> Gateway {
        let settings = self
            .settings
            .unwrap_or_else(|| Arc::new(EnvSettingsResolver::default()));
        let tokens = self
            .tokens
            .unwrap_or_else(|| Arc::new(NoCustomTokenProvider));
        let tracer = self.tracer.unwrap_or_else(|| Arc::new(LogTracer::new()));

        let authenticator = Arc::new(Authenticator::new(tokens, tracer));
        let connection = Arc::new(ConnectionSingleton::new(
            settings,
            self.platform,
            authenticator.clone(),
        ));

        Gateway {
            references: FacadeReference::new(connection.clone()),
            connection,
            authenticator,
        }
    }
}
