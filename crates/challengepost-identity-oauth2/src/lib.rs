//! Challengepost/Devpost OAuth2 identity adapter.
//!
//! Authenticates a user against the Challengepost OAuth2 service and
//! normalizes the returned profile into the [`NormalizedIdentity`] record a
//! hosting auth framework consumes. The protocol itself is a plain
//! authorization-code grant; the upstream quirks live here instead: the
//! access token travels as a query parameter rather than a bearer header,
//! the profile arrives wrapped in a `user` envelope, and null or empty
//! values are recursively pruned from the emitted identity.
//!
//! Endpoint URLs resolve from `OMNIAUTH_PROVIDER_SITE`,
//! `OMNIAUTH_AUTHORIZE_URL`, and `OMNIAUTH_TOKEN_URL` with hardcoded
//! defaults. Each authentication attempt fetches the profile at most once;
//! the cache is scoped to the attempt, never shared across requests.

mod client;
mod config;
mod error;
mod normalize;
mod provider;
mod prune;
mod types;


pub use client::ChallengepostClient;
pub use config::{
    AUTHORIZE_URL_ENV_VAR, CREDENTIALS_PATH, ChallengepostConfig, DEFAULT_AUTHORIZE_URL,
    DEFAULT_HTTP_TIMEOUT_SECONDS, DEFAULT_SCOPE, DEFAULT_SITE, DEFAULT_TOKEN_URL, PROVIDER_NAME,
    SITE_ENV_VAR, TOKEN_URL_ENV_VAR,
};
pub use error::{ChallengepostError, ChallengepostResult};
pub use normalize::{credentials_of, extra_of, identity_of, info_of, uid_of};
pub use provider::{AuthAttempt, ChallengepostAuthPayload, ChallengepostProvider};
pub use prune::prune;
pub use types::{RawProfile, TokenResponse};

// Re-export the core contract for convenience
pub use challengepost_identity_core::{
    IdentityError, IdentityProvider, IdentityResult, NormalizedIdentity,
};
