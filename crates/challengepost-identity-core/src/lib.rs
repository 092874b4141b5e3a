//! Core identity contract: the normalized record an adapter hands to a
//! hosting authentication framework, and the trait the framework calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("provider error: {0}")]
    ProviderError(String),

    #[error("authenticated profile has no uid")]
    MissingIdentity,

    #[error("invalid authentication payload")]
    InvalidPayload,

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type IdentityResult<T> = Result<T, IdentityError>;

/// Canonical identity record: `{provider, uid, info, extra, credentials}`
/// with null and empty values pruned from the mappings.
///
/// `uid` is always present and non-empty; an upstream profile without a
/// usable id surfaces as [`IdentityError::MissingIdentity`] instead of a
/// partial record. Nothing here is persisted; the record lives for one
/// authentication attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedIdentity {
    pub provider: String,
    pub uid: String,
    pub info: Map<String, Value>,
    pub extra: Map<String, Value>,
    pub credentials: Map<String, Value>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn provider_id(&self) -> &str;

    async fn verify(&self, auth_payload: Value) -> IdentityResult<NormalizedIdentity>;
}
