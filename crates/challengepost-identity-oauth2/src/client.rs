//! HTTP client for the Challengepost OAuth2 endpoints.

use crate::config::{CREDENTIALS_PATH, ChallengepostConfig};
use crate::error::{ChallengepostError, ChallengepostResult};
use crate::types::{RawProfile, TokenResponse};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

/// Thin wrapper around one `reqwest::Client` with a bounded timeout. All
/// calls are single-shot: a transport failure surfaces immediately with no
/// retries or backoff.
#[derive(Clone)]
pub struct ChallengepostClient {
    http_client: Client,
}

impl ChallengepostClient {
    pub fn new(http_timeout_seconds: u64) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(http_timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self { http_client }
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(
        &self,
        config: &ChallengepostConfig,
        code: &str,
    ) -> ChallengepostResult<TokenResponse> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
        ];

        let response = self
            .http_client
            .post(config.token_endpoint()?)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("token exchange failed: {}", error_text);
            return Err(ChallengepostError::TokenExchange(error_text));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| ChallengepostError::InvalidTokenResponse(e.to_string()))?;

        info!("exchanged authorization code for access token");
        Ok(token_response)
    }

    /// Fetch the authenticated user's profile. The access token travels as a
    /// query parameter rather than a bearer header; the upstream provider
    /// only accepts query mode. The response wraps the profile in a `user`
    /// envelope, which is stripped here.
    pub async fn fetch_credentials(
        &self,
        config: &ChallengepostConfig,
        access_token: &str,
    ) -> ChallengepostResult<RawProfile> {
        let mut url = config.credentials_endpoint()?;
        url.query_pairs_mut().append_pair("access_token", access_token);

        debug!("fetching {}", CREDENTIALS_PATH);
        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(%status, "credentials endpoint returned an error");
            return Err(ChallengepostError::UpstreamStatus { status, body });
        }

        let parsed: Value = serde_json::from_str(&body)
            .map_err(|e| ChallengepostError::InvalidJson(e.to_string()))?;

        let user = match parsed {
            Value::Object(mut envelope) => match envelope.remove("user") {
                Some(Value::Object(user)) => user,
                _ => return Err(ChallengepostError::MissingUser),
            },
            _ => return Err(ChallengepostError::MissingUser),
        };

        debug!("fetched credentials for user id {:?}", user.get("id"));
        Ok(user)
    }
}
