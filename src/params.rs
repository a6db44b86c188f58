//! Constants and process-wide configurable parameters.
//!
//! Configurables are read once from the environment (after loading an
//! optional `.env` file) and cached for the whole process lifetime.

use std::sync::OnceLock;

/// Settings key under which the backend connection configuration is stored.
pub const SETTINGS_KEY_FIREBASE: &str = "firebase";

/// Default database root key, also used as the app identifier.
pub const DEFAULT_DATABASE_ROOT_KEY: &str = "/";

/// Label used for sessions bound to an anonymous user without name or email.
pub const LABEL_ANONYMOUS: &str = "Anonymous";

/// Label used for sessions bound to a non-anonymous user without name or email.
pub const LABEL_CUSTOM: &str = "Custom";

pub mod env {
    /// Prefix used by the environment settings resolver.
    pub const SETTINGS_PREFIX: &str = "FIREGATE_SETTINGS_PREFIX";
}

const DEFAULT_SETTINGS_PREFIX: &str = "FIREGATE_SETTINGS_";

#[derive(Debug, Clone)]
pub struct Configurables {
    /// Prefix prepended to the uppercased setting key when looking up
    /// environment variables (e.g. `FIREGATE_SETTINGS_FIREBASE`).
    pub settings_prefix: String,
}

impl Configurables {
    fn from_env() -> Self {
        // A missing `.env` file is not an error
        dotenv::dotenv().ok();

        Self {
            settings_prefix: std::env::var(env::SETTINGS_PREFIX)
                .unwrap_or_else(|_| DEFAULT_SETTINGS_PREFIX.to_owned()),
        }
    }
}

static CONFIGURABLES: OnceLock<Configurables> = OnceLock::new();

/// Returns the process-wide configurables, reading them on first access.
pub fn configurables() -> &'static Configurables {
    CONFIGURABLES.get_or_init(Configurables::from_env)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configurables_are_cached() {
        let a = configurables() as *const Configurables;
        let b = configurables() as *const Configurables;
        assert_eq!(a, b);
        assert!(!configurables().settings_prefix.is_empty());
    }
}
