//! In-memory collaborators used by unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::StreamExt;

use super::*;
use crate::settings::{self, SettingsResolver, StaticSettingsResolver};
use crate::{token, trace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Subscribe,
    RedirectResult,
    Anonymous,
    Redirect(ProviderKind, Vec<String>),
    EmailPassword(String),
    CustomToken(String),
}

#[derive(Default)]
pub struct MockAuth {
    /// User emitted by the first auth-state notification.
    pub initial_user: Option<User>,
    /// Ends the auth-state stream without emitting anything.
    pub close_listener: bool,
    /// Credential returned by the redirect result query.
    pub pending_redirect: Option<UserCredential>,
    pub fail_sign_in: bool,
    pub(crate) calls: Mutex<Vec<Call>>,
}

impl MockAuth {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn sign_in_result(&self, provider: &str, user: User) -> Result<UserCredential, Error> {
        if self.fail_sign_in {
            return Err(Error::SignIn {
                provider: provider.to_owned(),
                msg: "rejected".to_owned(),
            });
        }
        Ok(UserCredential::new(user, Some(provider)))
    }
}

#[async_trait]
impl AuthClient for MockAuth {
    fn on_auth_state_changed(&self) -> AuthStateStream {
        self.record(Call::Subscribe);
        if self.close_listener {
            return futures::stream::empty::<Option<User>>().boxed();
        }
        futures::stream::once(futures::future::ready(self.initial_user.clone()))
            .chain(futures::stream::pending())
            .boxed()
    }

    async fn redirect_result(&self) -> Result<Option<UserCredential>, Error> {
        self.record(Call::RedirectResult);
        Ok(self.pending_redirect.clone())
    }

    async fn sign_in_anonymously(&self) -> Result<UserCredential, Error> {
        self.record(Call::Anonymous);
        tokio::task::yield_now().await;
        self.sign_in_result("anonymous", User::anonymous("anon-uid"))
    }

    async fn sign_in_with_redirect(&self, provider: &OAuthProvider) -> Result<(), Error> {
        self.record(Call::Redirect(provider.kind(), provider.scopes().to_vec()));
        if self.fail_sign_in {
            return Err(Error::Redirect("popup blocked".to_owned()));
        }
        Ok(())
    }

    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<UserCredential, Error> {
        self.record(Call::EmailPassword(email.to_owned()));
        self.sign_in_result("password", User::new("basic-uid").with_email(email))
    }

    async fn sign_in_with_custom_token(&self, token: &str) -> Result<UserCredential, Error> {
        self.record(Call::CustomToken(token.to_owned()));
        self.sign_in_result("custom", User::new("custom-uid"))
    }
}

pub struct MockConnection {
    app_id: String,
    auth: Arc<MockAuth>,
}

impl Connection for MockConnection {
    fn app_id(&self) -> &str {
        &self.app_id
    }

    fn auth(&self) -> Arc<dyn AuthClient> {
        self.auth.clone()
    }
}

#[derive(Default)]
pub struct MockPlatform {
    pub auth: Arc<MockAuth>,
    /// Rejects every connection attempt.
    pub reject: bool,
    pub(crate) apps: Mutex<HashSet<String>>,
    pub(crate) connects: AtomicUsize,
}

impl MockPlatform {
    pub fn with_auth(auth: MockAuth) -> Self {
        Self {
            auth: Arc::new(auth),
            ..Default::default()
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl Platform for MockPlatform {
    fn connect(
        &self,
        app_id: &str,
        _params: &ConnectionParams,
    ) -> Result<Arc<dyn Connection>, Error> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.reject {
            return Err(Error::InvalidParameters("missing apiKey".to_owned()));
        }
        if !self.apps.lock().unwrap().insert(app_id.to_owned()) {
            return Err(Error::DuplicateApp(app_id.to_owned()));
        }
        Ok(Arc::new(MockConnection {
            app_id: app_id.to_owned(),
            auth: self.auth.clone(),
        }))
    }
}

/// Static resolver counting lookups, yielding once per lookup so concurrent
/// callers overlap.
#[derive(Default)]
pub struct CountingResolver {
    pub(crate) inner: StaticSettingsResolver,
    pub(crate) calls: AtomicUsize,
}

impl CountingResolver {
    pub fn firebase(value: serde_json::Value) -> Self {
        Self {
            inner: StaticSettingsResolver::new().with(crate::params::SETTINGS_KEY_FIREBASE, value),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettingsResolver for CountingResolver {
    async fn get_setting(&self, key: &str) -> Result<serde_json::Value, settings::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.inner.get_setting(key).await
    }
}

#[derive(Default)]
pub struct RecordingTracer {
    pub fail: bool,
    pub(crate) events: Mutex<Vec<String>>,
}

impl RecordingTracer {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl trace::SessionTracer for RecordingTracer {
    async fn trace_event(&self, message: &str) -> Result<(), trace::Error> {
        self.events.lock().unwrap().push(format!("event:{message}"));
        if self.fail {
            return Err(trace::Error::Sink("offline".to_owned()));
        }
        Ok(())
    }

    async fn trace_session(&self, label: Option<&str>) -> Result<(), trace::Error> {
        self.events
            .lock()
            .unwrap()
            .push(format!("session:{}", label.unwrap_or("-")));
        if self.fail {
            return Err(trace::Error::Sink("offline".to_owned()));
        }
        Ok(())
    }
}

/// Token provider returning `token`, or failing when it is [`None`].
#[derive(Default)]
pub struct MockTokenProvider {
    pub token: Option<String>,
    pub(crate) calls: AtomicUsize,
}

impl MockTokenProvider {
    pub fn issuing(token: &str) -> Self {
        Self {
            token: Some(token.to_owned()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl token::CustomTokenProvider for MockTokenProvider {
    async fn acquire_custom_access_token(&self) -> Result<token::AccessToken, token::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.token
            .as_deref()
            .map(token::AccessToken::new)
            .ok_or_else(|| token::Error::Provider("issuer unreachable".to_owned()))
    }
}
