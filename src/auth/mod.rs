//! # Authentication Module
//!
//! The [`Authenticator`] resolves who the current user is, once per gateway
//! context:
//!
//! 1. it subscribes to the platform auth-state notifications;
//! 2. if the first notification carries a user (a restored session) the user
//!    is bound and traced;
//! 3. otherwise exactly one sign-in strategy, chosen through
//!    [`strategy::PRECEDENCE`], is dispatched.
//!
//! Completion means *dispatched*, not *signed in*: redirect strategies leave
//! the current process and are closed on the next start by the redirect
//! result query. Notifications after the first one are not handled.

mod label;
pub use label::*;

pub mod strategy;
pub use strategy::{PRECEDENCE, SignInStrategy};

use std::sync::{Arc, Mutex, PoisonError};

use futures::StreamExt;
use log::{debug, error, info, trace, warn};
use tokio::sync::watch;

use crate::platform::{self, AuthClient, AuthStateStream, OAuthProvider, User, UserCredential};
use crate::settings::AuthSettings;
use crate::token::CustomTokenProvider;
use crate::trace::SessionTracer;
use crate::utils::SingleFlight;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("auth state listener closed before the first notification")]
    ListenerClosed,
    #[error("sign-in error :: {0}")]
    SignIn(#[from] platform::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Authentication has not produced an outcome yet.
    #[default]
    Unresolved,
    /// No session was restored, a sign-in strategy is being dispatched.
    SigningIn,
    /// A user is bound to the session.
    Authenticated,
    /// A sign-in strategy was dispatched without binding a user (e.g. a
    /// redirect left the process, or the custom token exchange failed).
    Dispatched,
}

/// Authentication state of the current context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub current_user: Option<User>,
    pub label: Option<String>,
    pub phase: SessionPhase,
}

impl SessionState {
    /// True once a user is bound or a sign-in attempt was dispatched.
    pub fn is_resolved(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Authenticated | SessionPhase::Dispatched
        )
    }
}

pub struct Authenticator {
    tokens: Arc<dyn CustomTokenProvider>,
    tracer: Arc<dyn SessionTracer>,
    session: watch::Sender<SessionState>,
    flight: SingleFlight<(), Error>,
    // Kept alive for the lifetime of the context, never polled again
    listener: Mutex<Option<AuthStateStream>>,
}

impl Authenticator {
    pub fn new(tokens: Arc<dyn CustomTokenProvider>, tracer: Arc<dyn SessionTracer>) -> Self {
        Self {
            tokens,
            tracer,
            session: watch::Sender::new(SessionState::default()),
            flight: SingleFlight::new(),
            listener: Mutex::new(None),
        }
    }

    /// Runs authentication once; every call, concurrent or later, observes the
    /// outcome of the first one. Arguments of later calls are ignored.
    pub async fn authenticate(
        self: &Arc<Self>,
        client: Arc<dyn AuthClient>,
        policy: Option<AuthSettings>,
    ) -> Result<(), Arc<Error>> {
        let this = self.clone();
        self.flight
            .run(move || async move { this.resolve(client, policy).await })
            .await
    }

    /// Snapshot of the current session state.
    pub fn session(&self) -> SessionState {
        self.session.borrow().clone()
    }

    /// Receiver notified on every session state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.session.subscribe()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.borrow().current_user.clone()
    }

    /// True once [`Authenticator::authenticate`] completed successfully.
    pub fn is_complete(&self) -> bool {
        matches!(self.flight.peek(), Some(Ok(())))
    }

    /// Queries the platform for a redirect sign-in completed before this
    /// process started.
    pub async fn detect_prior_redirect(
        &self,
        client: &dyn AuthClient,
    ) -> Result<Option<UserCredential>, Error> {
        let credential = client.redirect_result().await?;
        if let Some(credential) = &credential {
            debug!(
                "found pending redirect credential (provider: {})",
                credential.provider_id.as_deref().unwrap_or("unknown")
            );
        }
        Ok(credential)
    }

    /// Navigates away to `provider`; the flow completes in a later process.
    pub async fn dispatch_redirect(
        &self,
        client: &dyn AuthClient,
        provider: &OAuthProvider,
    ) -> Result<(), Error> {
        info!("redirecting to `{}` for sign-in", provider.provider_id());
        client.sign_in_with_redirect(provider).await?;
        Ok(())
    }

    async fn resolve(
        &self,
        client: Arc<dyn AuthClient>,
        policy: Option<AuthSettings>,
    ) -> Result<(), Error> {
        let mut listener = client.on_auth_state_changed();
        let first = listener.next().await.ok_or(Error::ListenerClosed)?;
        *self.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(listener);

        match first {
            Some(user) => {
                trace!("restored session for user `{}`", user.uid);
                self.bind(user, true).await;
            }
            None => {
                self.session.send_modify(|s| s.phase = SessionPhase::SigningIn);
                self.sign_in(client.as_ref(), policy.as_ref()).await?;
            }
        }

        Ok(())
    }

    async fn sign_in(
        &self,
        client: &dyn AuthClient,
        policy: Option<&AuthSettings>,
    ) -> Result<(), Error> {
        let Some(strategy) = strategy::select(policy) else {
            debug!("no sign-in strategy matches the configured auth policy");
            self.session.send_modify(|s| s.phase = SessionPhase::Dispatched);
            return Ok(());
        };

        debug!("dispatching `{}` sign-in", strategy.name());

        let credential = match strategy {
            SignInStrategy::Anonymous => {
                let credential = client.sign_in_anonymously().await?;
                self.trace_session(None).await;
                Some(credential)
            }
            SignInStrategy::Redirect(provider) => {
                match self.detect_prior_redirect(client).await? {
                    Some(credential) => Some(credential),
                    None => {
                        self.dispatch_redirect(client, &provider).await?;
                        None
                    }
                }
            }
            SignInStrategy::Basic { email, password } => {
                Some(client.sign_in_with_email_and_password(&email, &password).await?)
            }
            SignInStrategy::CustomToken => self.sign_in_with_custom_token(client).await,
        };

        match credential {
            Some(credential) => self.bind(credential.user, false).await,
            None => self.session.send_modify(|s| s.phase = SessionPhase::Dispatched),
        }

        Ok(())
    }

    /// Failures on this path are logged and swallowed.
    async fn sign_in_with_custom_token(&self, client: &dyn AuthClient) -> Option<UserCredential> {
        let token = match self.tokens.acquire_custom_access_token().await {
            Ok(token) => token,
            Err(e) => {
                error!("unable to acquire custom access token: {}", e);
                return None;
            }
        };

        match client.sign_in_with_custom_token(&token.access_token).await {
            Ok(credential) => Some(credential),
            Err(e) => {
                error!("custom token sign-in failed: {}", e);
                None
            }
        }
    }

    /// Binds `user` to the session; restored sessions are also traced.
    async fn bind(&self, user: User, restored: bool) {
        let label = session_label(&user);

        if restored {
            info!("logged in as {}", label);
            self.trace_event(&format!("Logged in as {label}")).await;
            self.trace_session(Some(&label)).await;
        }

        self.session.send_replace(SessionState {
            current_user: Some(user),
            label: Some(label),
            phase: SessionPhase::Authenticated,
        });
    }

    async fn trace_event(&self, message: &str) {
        if let Err(e) = self.tracer.trace_event(message).await {
            warn!("unable to trace event: {}", e);
        }
    }

    async fn trace_session(&self, label: Option<&str>) {
        if let Err(e) = self.tracer.trace_session(label).await {
            warn!("unable to trace session: {}", e);
        }
    }
}
