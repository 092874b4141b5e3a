//! Provider configuration: endpoint resolution from the environment with
//! hardcoded fallbacks, plus the application credentials the hosting
//! framework supplies.

use crate::error::ChallengepostResult;
use url::Url;

pub const PROVIDER_NAME: &str = "challengepost";

pub const DEFAULT_SITE: &str = "https://api.challengepost.com";
pub const DEFAULT_AUTHORIZE_URL: &str = "/oauth/authorize";
pub const DEFAULT_TOKEN_URL: &str = "/oauth/access_token";
pub const DEFAULT_SCOPE: &str = "user";
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 10;

/// Path of the profile endpoint, relative to `site`.
pub const CREDENTIALS_PATH: &str = "/user/credentials";

pub const SITE_ENV_VAR: &str = "OMNIAUTH_PROVIDER_SITE";
pub const AUTHORIZE_URL_ENV_VAR: &str = "OMNIAUTH_AUTHORIZE_URL";
pub const TOKEN_URL_ENV_VAR: &str = "OMNIAUTH_TOKEN_URL";

/// Challengepost adapter configuration.
///
/// Built once at startup and handed to the provider; endpoints come from the
/// environment with literal defaults, credentials from the caller. The
/// `authorize_url` and `token_url` values may be paths relative to `site`
/// or absolute URLs; an absolute override wins.
#[derive(Debug, Clone)]
pub struct ChallengepostConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub site: String,
    pub authorize_url: String,
    pub token_url: String,
    pub http_timeout_seconds: u64,
}

impl ChallengepostConfig {
    /// Configuration with the default endpoints, environment ignored.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            site: DEFAULT_SITE.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            http_timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECONDS,
        }
    }

    /// Production constructor: endpoints resolved from process environment.
    pub fn from_env(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self::resolved(client_id, client_secret, redirect_uri, |key| {
            std::env::var(key).ok()
        })
    }

    /// Endpoint resolution against an arbitrary environment lookup. For each
    /// URL the override is used when set and non-empty, else the default.
    /// Resolution always succeeds; there is no validation beyond presence.
    pub fn resolved(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = Self::new(client_id, client_secret, redirect_uri);
        config.site = env_or(&lookup, SITE_ENV_VAR, DEFAULT_SITE);
        config.authorize_url = env_or(&lookup, AUTHORIZE_URL_ENV_VAR, DEFAULT_AUTHORIZE_URL);
        config.token_url = env_or(&lookup, TOKEN_URL_ENV_VAR, DEFAULT_TOKEN_URL);
        config
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into();
        self
    }

    pub fn with_authorize_url(mut self, authorize_url: impl Into<String>) -> Self {
        self.authorize_url = authorize_url.into();
        self
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn with_http_timeout(mut self, seconds: u64) -> Self {
        self.http_timeout_seconds = seconds;
        self
    }

    pub fn authorize_endpoint(&self) -> ChallengepostResult<Url> {
        self.join(&self.authorize_url)
    }

    pub fn token_endpoint(&self) -> ChallengepostResult<Url> {
        self.join(&self.token_url)
    }

    pub fn credentials_endpoint(&self) -> ChallengepostResult<Url> {
        self.join(CREDENTIALS_PATH)
    }

    fn join(&self, endpoint: &str) -> ChallengepostResult<Url> {
        let base = Url::parse(&self.site)?;
        Ok(base.join(endpoint)?)
    }
}

fn env_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    match lookup(key) {
        Some(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}
