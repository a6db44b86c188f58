//! Sign-in strategy selection.
//!
//! The policy branches are evaluated through [`PRECEDENCE`], an ordered table
//! of selectors. The first selector returning a strategy wins; branches further
//! down the table are ignored even when populated.

use crate::platform::{OAuthProvider, ProviderKind};
use crate::settings::{AuthSettings, OAuthSettings};

#[derive(Clone, PartialEq)]
pub enum SignInStrategy {
    Anonymous,
    /// OAuth sign-in completed through a redirect round-trip.
    Redirect(OAuthProvider),
    Basic { email: String, password: String },
    /// Token from the custom token provider, exchanged for a session.
    CustomToken,
}

impl SignInStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Redirect(p) => match p.kind() {
                ProviderKind::Github => "github",
                ProviderKind::Google => "google",
            },
            Self::Basic { .. } => "basic",
            Self::CustomToken => "custom",
        }
    }
}

impl std::fmt::Debug for SignInStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redirect(p) => f.debug_tuple("Redirect").field(p).finish(),
            Self::Basic { email, .. } => f
                .debug_struct("Basic")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
            other => write!(f, "{}", other.name()),
        }
    }
}

pub type Selector = fn(&AuthSettings) -> Option<SignInStrategy>;

/// Policy branches in evaluation order.
pub const PRECEDENCE: [(&str, Selector); 4] = [
    ("github", select_github as Selector),
    ("google", select_google as Selector),
    ("basic", select_basic as Selector),
    ("custom", select_custom as Selector),
];

/// Selects the strategy for `policy`.
///
/// An absent policy selects [`SignInStrategy::Anonymous`]. A present policy
/// with no matching branch (e.g. only a service account) selects nothing.
pub fn select(policy: Option<&AuthSettings>) -> Option<SignInStrategy> {
    let Some(policy) = policy else {
        return Some(SignInStrategy::Anonymous);
    };

    PRECEDENCE.iter().find_map(|(_, selector)| selector(policy))
}

fn oauth(kind: ProviderKind, settings: &OAuthSettings) -> SignInStrategy {
    let mut provider = OAuthProvider::new(kind);
    for scope in settings.scopes.iter().flatten() {
        provider.add_scope(scope.as_str());
    }
    SignInStrategy::Redirect(provider)
}

fn select_github(policy: &AuthSettings) -> Option<SignInStrategy> {
    policy.github.as_ref().map(|s| oauth(ProviderKind::Github, s))
}

fn select_google(policy: &AuthSettings) -> Option<SignInStrategy> {
    policy.google.as_ref().map(|s| oauth(ProviderKind::Google, s))
}

fn select_basic(policy: &AuthSettings) -> Option<SignInStrategy> {
    policy.basic.as_ref().map(|b| SignInStrategy::Basic {
        email: b.email.clone(),
        password: b.password.clone(),
    })
}

fn select_custom(policy: &AuthSettings) -> Option<SignInStrategy> {
    policy.custom.then_some(SignInStrategy::CustomToken)
}
