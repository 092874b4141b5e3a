//! Challengepost identity provider and the per-request authentication attempt.

use crate::client::ChallengepostClient;
use crate::config::{ChallengepostConfig, DEFAULT_SCOPE, PROVIDER_NAME};
use crate::error::ChallengepostResult;
use crate::normalize::{credentials_of, extra_of, identity_of, info_of, uid_of};
use crate::prune::prune;
use crate::types::{RawProfile, TokenResponse};
use async_trait::async_trait;
use challengepost_identity_core::{
    IdentityError, IdentityProvider, IdentityResult, NormalizedIdentity,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::OnceCell;
use tracing::info;
use url::Url;

/// Payload accepted by the [`IdentityProvider`] impl: the bearer token the
/// hosting framework obtained from its own code exchange.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChallengepostAuthPayload {
    pub access_token: String,
}

#[derive(Clone)]
pub struct ChallengepostProvider {
    config: ChallengepostConfig,
    client: ChallengepostClient,
}

impl ChallengepostProvider {
    pub fn new(config: ChallengepostConfig) -> Self {
        let client = ChallengepostClient::new(config.http_timeout_seconds);
        Self { config, client }
    }

    pub fn config(&self) -> &ChallengepostConfig {
        &self.config
    }

    /// Build the authorize redirect URL. `scope` is forwarded unchanged from
    /// the inbound request's query parameters when present, defaulting to
    /// `"user"`.
    pub fn authorize_url(
        &self,
        request_params: &HashMap<String, String>,
    ) -> ChallengepostResult<Url> {
        let mut url = self.config.authorize_endpoint()?;
        let scope = request_params
            .get("scope")
            .map(String::as_str)
            .unwrap_or(DEFAULT_SCOPE);

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("response_type", "code");
            pairs.append_pair("client_id", &self.config.client_id);
            pairs.append_pair("redirect_uri", &self.config.redirect_uri);
            pairs.append_pair("scope", scope);
        }

        Ok(url)
    }

    /// Begin one authentication attempt for an already-obtained access token.
    pub fn attempt(&self, access_token: impl Into<String>) -> AuthAttempt<'_> {
        AuthAttempt {
            provider: self,
            access_token: access_token.into(),
            token_response: None,
            raw_info: OnceCell::new(),
        }
    }

    fn attempt_with_tokens(&self, token_response: TokenResponse) -> AuthAttempt<'_> {
        AuthAttempt {
            provider: self,
            access_token: token_response.access_token.clone(),
            token_response: Some(token_response),
            raw_info: OnceCell::new(),
        }
    }

    /// Callback-phase glue: exchange the authorization code, fetch the
    /// profile once, and emit the normalized identity with credentials
    /// derived from the token response.
    pub async fn authenticate_code(&self, code: &str) -> ChallengepostResult<NormalizedIdentity> {
        let token_response = self.client.exchange_code(&self.config, code).await?;
        let attempt = self.attempt_with_tokens(token_response);
        let identity = attempt.identity().await?;
        info!(uid = %identity.uid, "authenticated challengepost user");
        Ok(identity)
    }
}

/// One authentication attempt. The raw profile is fetched at most once per
/// attempt regardless of how many accessors run; the cache lives here rather
/// than on the provider, so concurrent attempts can never observe each
/// other's profiles.
pub struct AuthAttempt<'a> {
    provider: &'a ChallengepostProvider,
    access_token: String,
    token_response: Option<TokenResponse>,
    raw_info: OnceCell<RawProfile>,
}

impl AuthAttempt<'_> {
    pub async fn raw_info(&self) -> ChallengepostResult<&RawProfile> {
        self.raw_info
            .get_or_try_init(|| {
                self.provider
                    .client
                    .fetch_credentials(&self.provider.config, &self.access_token)
            })
            .await
    }

    pub async fn uid(&self) -> ChallengepostResult<Option<String>> {
        Ok(uid_of(self.raw_info().await?))
    }

    pub async fn info(&self) -> ChallengepostResult<Map<String, Value>> {
        Ok(info_of(self.raw_info().await?))
    }

    pub async fn extra(&self) -> ChallengepostResult<Map<String, Value>> {
        Ok(extra_of(self.raw_info().await?))
    }

    fn credentials(&self) -> Map<String, Value> {
        match &self.token_response {
            Some(token_response) => credentials_of(token_response),
            None => {
                // token-only attempt: no expiry information available
                let mut credentials = Map::new();
                credentials.insert(
                    "token".to_string(),
                    Value::String(self.access_token.clone()),
                );
                prune(credentials)
            }
        }
    }

    pub async fn identity(&self) -> ChallengepostResult<NormalizedIdentity> {
        let raw = self.raw_info().await?;
        identity_of(raw, self.credentials())
    }
}

#[async_trait]
impl IdentityProvider for ChallengepostProvider {
    fn provider_id(&self) -> &str {
        PROVIDER_NAME
    }

    async fn verify(&self, auth_payload: Value) -> IdentityResult<NormalizedIdentity> {
        let payload: ChallengepostAuthPayload =
            serde_json::from_value(auth_payload).map_err(|_| IdentityError::InvalidPayload)?;

        let attempt = self.attempt(payload.access_token);
        let identity = attempt.identity().await?;

        info!(uid = %identity.uid, "verified challengepost identity");
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_provider() -> ChallengepostProvider {
        let config = ChallengepostConfig::new(
            "test_client_id",
            "53cr3tz",
            "http://localhost:3000/auth/challengepost/callback",
        );
        ChallengepostProvider::new(config)
    }

    fn query_params(url: &Url) -> HashMap<String, String> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn provider_id_is_challengepost() {
        assert_eq!(test_provider().provider_id(), "challengepost");
    }

    #[test]
    fn authorize_url_uses_the_default_scope() {
        let url = test_provider().authorize_url(&HashMap::new()).unwrap();
        let params = query_params(&url);

        assert_eq!(url.host_str(), Some("api.challengepost.com"));
        assert_eq!(url.path(), "/oauth/authorize");
        assert_eq!(params.get("response_type").map(String::as_str), Some("code"));
        assert_eq!(
            params.get("client_id").map(String::as_str),
            Some("test_client_id")
        );
        assert_eq!(
            params.get("redirect_uri").map(String::as_str),
            Some("http://localhost:3000/auth/challengepost/callback")
        );
        assert_eq!(params.get("scope").map(String::as_str), Some("user"));
    }

    #[test]
    fn authorize_url_forwards_the_requested_scope() {
        let request_params = HashMap::from([("scope".to_string(), "admin".to_string())]);
        let url = test_provider().authorize_url(&request_params).unwrap();

        assert_eq!(
            query_params(&url).get("scope").map(String::as_str),
            Some("admin")
        );
    }

    #[test]
    fn authorize_url_passes_multi_valued_scopes_through_unchanged() {
        let request_params = HashMap::from([("scope".to_string(), "user, admin".to_string())]);
        let url = test_provider().authorize_url(&request_params).unwrap();

        assert_eq!(
            query_params(&url).get("scope").map(String::as_str),
            Some("user, admin")
        );
    }

    #[test]
    fn unrelated_request_params_are_not_forwarded() {
        let request_params = HashMap::from([("prompt".to_string(), "consent".to_string())]);
        let url = test_provider().authorize_url(&request_params).unwrap();

        assert!(!query_params(&url).contains_key("prompt"));
    }
}
