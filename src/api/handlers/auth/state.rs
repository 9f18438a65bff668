//! Auth state and configuration.

use secrecy::SecretString;

use super::codec::SessionCodec;

// Sliding-window session lifetime; every pass-through re-seals the cookie.
const DEFAULT_SESSION_TTL_SECONDS: i64 = 12 * 60 * 60;
const DEFAULT_LOGIN_PATH: &str = "/";
const DEFAULT_PROTECTED_PREFIX: &str = "/proposal";

/// Which paths the session middleware gates, and where anonymous requests
/// are sent. Declared as explicit configuration so the gate is testable
/// independent of the router.
#[derive(Clone, Debug)]
pub struct GuardConfig {
    protected_prefixes: Vec<String>,
    login_path: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: vec![DEFAULT_PROTECTED_PREFIX.to_string()],
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

impl GuardConfig {
    #[must_use]
    pub fn new(protected_prefixes: Vec<String>, login_path: String) -> Self {
        Self {
            protected_prefixes,
            login_path,
        }
    }

    #[must_use]
    pub fn protected_prefixes(&self) -> &[String] {
        &self.protected_prefixes
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    base_url: String,
    session_ttl_seconds: i64,
    guard: GuardConfig,
}

impl AuthConfig {
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            guard: GuardConfig::default(),
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_guard(mut self, guard: GuardConfig) -> Self {
        self.guard = guard;
        self
    }

    #[must_use]
    pub fn guard(&self) -> &GuardConfig {
        &self.guard
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(super) fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    /// Only mark cookies secure when the deployment is served over HTTPS.
    pub(super) fn session_cookie_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

pub struct AuthState {
    config: AuthConfig,
    codec: SessionCodec,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, session_secret: &SecretString) -> Self {
        let codec = SessionCodec::new(session_secret, config.session_ttl_seconds());
        Self { config, codec }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new("https://propono.dev".to_string());

        assert_eq!(config.base_url(), "https://propono.dev");
        assert_eq!(
            config.session_ttl_seconds(),
            super::DEFAULT_SESSION_TTL_SECONDS
        );
        assert_eq!(config.guard().protected_prefixes(), ["/proposal"]);
        assert_eq!(config.guard().login_path(), "/");

        let config = config.with_session_ttl_seconds(120).with_guard(GuardConfig::new(
            vec!["/drafts".to_string()],
            "/signin".to_string(),
        ));

        assert_eq!(config.session_ttl_seconds(), 120);
        assert_eq!(config.guard().protected_prefixes(), ["/drafts"]);
        assert_eq!(config.guard().login_path(), "/signin");
    }

    #[test]
    fn cookie_secure_follows_base_url_scheme() {
        assert!(AuthConfig::new("https://propono.dev".to_string()).session_cookie_secure());
        assert!(!AuthConfig::new("http://localhost:8080".to_string()).session_cookie_secure());
    }

    #[test]
    fn auth_state_exposes_config_and_codec() {
        let config = AuthConfig::new("https://propono.dev".to_string());
        let state = AuthState::new(config, &SecretString::from("sealed".to_string()));
        assert!(state.config().session_cookie_secure());
        assert_eq!(
            state.codec().decode(None),
            super::super::codec::Session::anonymous()
        );
    }
}
