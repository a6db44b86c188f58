use serde::{Deserialize, Serialize};

/// Identity record of a signed-in user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl User {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Default::default()
        }
    }

    pub fn anonymous(uid: impl Into<String>) -> Self {
        Self {
            is_anonymous: true,
            ..Self::new(uid)
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Result of a successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserCredential {
    pub user: User,
    #[serde(default)]
    pub provider_id: Option<String>,
}

impl UserCredential {
    pub fn new(user: User, provider_id: Option<&str>) -> Self {
        Self {
            user,
            provider_id: provider_id.map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Github,
    Google,
}

impl ProviderKind {
    /// Provider identifier as used by the platform.
    pub fn provider_id(&self) -> &'static str {
        match self {
            Self::Github => "github.com",
            Self::Google => "google.com",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Github => write!(f, "github"),
            Self::Google => write!(f, "google"),
        }
    }
}

/// OAuth identity provider used by redirect sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthProvider {
    kind: ProviderKind,
    scopes: Vec<String>,
}

impl OAuthProvider {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            scopes: Vec::new(),
        }
    }

    pub fn github() -> Self {
        Self::new(ProviderKind::Github)
    }

    pub fn google() -> Self {
        Self::new(ProviderKind::Google)
    }

    /// Requests an additional OAuth scope; duplicates are ignored.
    pub fn add_scope(&mut self, scope: impl Into<String>) -> &mut Self {
        let scope = scope.into();
        if !self.scopes.contains(&scope) {
            self.scopes.push(scope);
        }
        self
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn provider_id(&self) -> &'static str {
        self.kind.provider_id()
    }
}
