//! Wire types for the Challengepost OAuth2 endpoints.

use serde::{Deserialize, Serialize};

/// Raw user object returned by the credentials endpoint, unwrapped from its
/// `user` envelope. No schema is enforced; fields are accessed optimistically
/// and missing fields degrade to absent.
pub type RawProfile = serde_json::Map<String, serde_json::Value>;

/// Token endpoint response. `token_type` is optional because the upstream
/// provider predates RFC 6749 and omits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub expires_at: Option<i64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_tolerates_minimal_body() {
        let json = r#"{ "access_token": "t0k3n" }"#;

        let token: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "t0k3n");
        assert_eq!(token.token_type, None);
        assert_eq!(token.expires_in, None);
        assert_eq!(token.refresh_token, None);
    }

    #[test]
    fn token_response_reads_expiry_fields() {
        let json = r#"{
            "access_token": "t0k3n",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r3fr3sh",
            "scope": "user"
        }"#;

        let token: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.expires_in, Some(3600));
        assert_eq!(token.refresh_token, Some("r3fr3sh".to_string()));
        assert_eq!(token.scope, Some("user".to_string()));
    }
}
