//! # Platform Module
//!
//! Boundary with the managed backend platform. Nothing here talks to the
//! network: the traits describe the entry points the gateway relies on and
//! concrete platform bindings implement them.
//!
//! * [`Platform`] builds the single [`Connection`] for an app identifier.
//! * [`Connection`] exposes the auth client and derives database/storage
//!   [`Reference`]s.
//! * [`AuthClient`] covers the live auth-state subscription, the redirect
//!   result query and the per-strategy sign-in entry points.

mod reference;
pub use reference::*;

mod user;
pub use user::*;

#[cfg(test)]
pub(crate) mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::settings::ConnectionParams;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("an app named `{0}` already exists")]
    DuplicateApp(String),
    #[error("invalid connection parameters :: {0}")]
    InvalidParameters(String),
    #[error("sign-in failed ({provider}) :: {msg}")]
    SignIn { provider: String, msg: String },
    #[error("redirect failed :: {0}")]
    Redirect(String),
    #[error("network error :: {0}")]
    Network(String),
}

/// Live stream of auth-state notifications, one item per change.
///
/// `None` means no user is bound to the session.
pub type AuthStateStream = BoxStream<'static, Option<User>>;

pub trait Platform: Send + Sync {
    /// Creates the connection identified by `app_id`.
    ///
    /// Creating two connections with the same identifier is an error.
    fn connect(
        &self,
        app_id: &str,
        params: &ConnectionParams,
    ) -> Result<Arc<dyn Connection>, Error>;
}

pub trait Connection: Send + Sync {
    fn app_id(&self) -> &str;

    fn auth(&self) -> Arc<dyn AuthClient>;

    /// Database reference at `path`.
    fn database(&self, path: &str) -> Reference {
        Reference::new(ReferenceKind::Database, self.app_id(), path)
    }

    /// Storage reference at `path`.
    fn storage(&self, path: &str) -> Reference {
        Reference::new(ReferenceKind::Storage, self.app_id(), path)
    }
}

#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Subscribes to auth-state changes.
    ///
    /// The platform emits the current state as the first item, then one
    /// item per change for as long as the stream is alive.
    fn on_auth_state_changed(&self) -> AuthStateStream;

    /// Credential produced by a redirect sign-in completed before the
    /// current process started, if any.
    async fn redirect_result(&self) -> Result<Option<UserCredential>, Error>;

    async fn sign_in_anonymously(&self) -> Result<UserCredential, Error>;

    /// Starts a redirect sign-in. On a real platform the current process is
    /// torn down by the navigation and the flow resumes on the next start.
    async fn sign_in_with_redirect(&self, provider: &OAuthProvider) -> Result<(), Error>;

    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserCredential, Error>;

    async fn sign_in_with_custom_token(&self, token: &str) -> Result<UserCredential, Error>;
}
