//! Adapter error types.

use challengepost_identity_core::IdentityError;
use reqwest::StatusCode;
use thiserror::Error;

pub type ChallengepostResult<T> = Result<T, ChallengepostError>;

#[derive(Debug, Error)]
pub enum ChallengepostError {
    #[error("credentials request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("credentials endpoint returned {status}: {body}")]
    UpstreamStatus { status: StatusCode, body: String },

    #[error("credentials response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("credentials response has no `user` object")]
    MissingUser,

    #[error("authenticated profile has no id to derive a uid from")]
    MissingIdentity,

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("invalid token response: {0}")]
    InvalidTokenResponse(String),

    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl From<ChallengepostError> for IdentityError {
    fn from(err: ChallengepostError) -> Self {
        match err {
            ChallengepostError::MissingIdentity => IdentityError::MissingIdentity,
            other => IdentityError::ProviderError(other.to_string()),
        }
    }
}
