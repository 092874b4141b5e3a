//! Mapping of the raw upstream profile into the normalized identity record.

use crate::config::PROVIDER_NAME;
use crate::error::{ChallengepostError, ChallengepostResult};
use crate::prune::prune;
use crate::types::{RawProfile, TokenResponse};
use challengepost_identity_core::NormalizedIdentity;
use chrono::Utc;
use serde_json::{Map, Value};

/// `raw["id"]` verbatim: strings as-is, numbers in their canonical decimal
/// form. Anything else means the upstream never authenticated this user.
pub fn uid_of(raw: &RawProfile) -> Option<String> {
    match raw.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}

/// Pruned info mapping: nickname, email, location, first_name, last_name.
pub fn info_of(raw: &RawProfile) -> Map<String, Value> {
    let field = |source: &str| raw.get(source).cloned().unwrap_or(Value::Null);

    let mut info = Map::new();
    info.insert("nickname".to_string(), field("screen_name"));
    info.insert("email".to_string(), field("email"));
    info.insert("location".to_string(), field("location"));
    info.insert("first_name".to_string(), field("first_name"));
    info.insert("last_name".to_string(), field("last_name"));
    prune(info)
}

/// Pruned extra mapping carrying the full raw profile.
pub fn extra_of(raw: &RawProfile) -> Map<String, Value> {
    let mut extra = Map::new();
    extra.insert("raw_info".to_string(), Value::Object(raw.clone()));
    prune(extra)
}

/// Credentials mapping derived from the token response: always the token and
/// whether it expires; the refresh token and expiry instant only when the
/// token is actually expiring.
pub fn credentials_of(token: &TokenResponse) -> Map<String, Value> {
    let expiring = token.expires_in.is_some() || token.expires_at.is_some();

    let mut credentials = Map::new();
    credentials.insert(
        "token".to_string(),
        Value::String(token.access_token.clone()),
    );
    credentials.insert("expires".to_string(), Value::Bool(expiring));

    if expiring {
        if let Some(refresh_token) = &token.refresh_token {
            credentials.insert(
                "refresh_token".to_string(),
                Value::String(refresh_token.clone()),
            );
        }
        let expires_at = token
            .expires_at
            .or_else(|| token.expires_in.map(|s| Utc::now().timestamp() + s as i64));
        if let Some(at) = expires_at {
            credentials.insert("expires_at".to_string(), Value::from(at));
        }
    }

    prune(credentials)
}

/// Assemble the full identity record. A profile without a usable id is an
/// authentication failure, not a partial identity.
pub fn identity_of(
    raw: &RawProfile,
    credentials: Map<String, Value>,
) -> ChallengepostResult<NormalizedIdentity> {
    let uid = uid_of(raw).ok_or(ChallengepostError::MissingIdentity)?;

    Ok(NormalizedIdentity {
        provider: PROVIDER_NAME.to_string(),
        uid,
        info: info_of(raw),
        extra: extra_of(raw),
        credentials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(value: Value) -> RawProfile {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn empty_profile_normalizes_to_nothing() {
        let raw = RawProfile::new();

        assert_eq!(uid_of(&raw), None);
        assert!(info_of(&raw).is_empty());
        assert!(extra_of(&raw).is_empty());
    }

    #[test]
    fn populated_profile_maps_into_info_and_extra() {
        let raw = profile(json!({
            "id": "123",
            "screen_name": "fredsmith",
            "email": "fred@smith.com"
        }));

        assert_eq!(uid_of(&raw), Some("123".to_string()));

        let info = info_of(&raw);
        assert_eq!(
            Value::Object(info),
            json!({ "nickname": "fredsmith", "email": "fred@smith.com" })
        );

        let extra = extra_of(&raw);
        assert_eq!(
            Value::Object(extra),
            json!({ "raw_info": {
                "id": "123",
                "screen_name": "fredsmith",
                "email": "fred@smith.com"
            }})
        );
    }

    #[test]
    fn info_carries_name_and_location_fields() {
        let raw = profile(json!({
            "id": "123",
            "screen_name": "fredsmith",
            "first_name": "Fred",
            "last_name": "Smith",
            "location": "Palo Alto, California"
        }));

        let info = info_of(&raw);
        assert_eq!(info["nickname"], "fredsmith");
        assert_eq!(info["first_name"], "Fred");
        assert_eq!(info["last_name"], "Smith");
        assert_eq!(info["location"], "Palo Alto, California");
        assert!(!info.contains_key("email"));
    }

    #[test]
    fn numeric_id_becomes_the_uid() {
        let raw = profile(json!({ "id": 4242 }));
        assert_eq!(uid_of(&raw), Some("4242".to_string()));
    }

    #[test]
    fn null_or_empty_id_yields_no_uid() {
        assert_eq!(uid_of(&profile(json!({ "id": null }))), None);
        assert_eq!(uid_of(&profile(json!({ "id": "" }))), None);
    }

    #[test]
    fn identity_of_fails_without_a_uid() {
        let raw = profile(json!({ "screen_name": "ghost" }));
        let result = identity_of(&raw, Map::new());
        assert!(matches!(result, Err(ChallengepostError::MissingIdentity)));
    }

    #[test]
    fn identity_of_builds_the_full_record() {
        let raw = profile(json!({ "id": "123", "email": "fred@smith.com" }));
        let identity = identity_of(&raw, Map::new()).unwrap();

        assert_eq!(identity.provider, "challengepost");
        assert_eq!(identity.uid, "123");
        assert_eq!(identity.info["email"], "fred@smith.com");
        assert_eq!(identity.extra["raw_info"]["id"], "123");
        assert!(identity.credentials.is_empty());
    }

    fn token(value: Value) -> TokenResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn credentials_for_a_non_expiring_token() {
        let credentials = credentials_of(&token(json!({ "access_token": "t0k3n" })));

        assert_eq!(credentials["token"], "t0k3n");
        assert_eq!(credentials["expires"], false);
        assert!(!credentials.contains_key("refresh_token"));
        assert!(!credentials.contains_key("expires_at"));
    }

    #[test]
    fn credentials_for_an_expiring_token_include_refresh_and_expiry() {
        let credentials = credentials_of(&token(json!({
            "access_token": "t0k3n",
            "expires_in": 600,
            "refresh_token": "r3fr3sh"
        })));

        assert_eq!(credentials["expires"], true);
        assert_eq!(credentials["refresh_token"], "r3fr3sh");
        let expires_at = credentials["expires_at"].as_i64().unwrap();
        assert!(expires_at > Utc::now().timestamp());
    }

    #[test]
    fn missing_refresh_token_is_omitted_even_when_expiring() {
        let credentials = credentials_of(&token(json!({
            "access_token": "t0k3n",
            "expires_at": 1735689600
        })));

        assert_eq!(credentials["expires"], true);
        assert_eq!(credentials["expires_at"], 1735689600_i64);
        assert!(!credentials.contains_key("refresh_token"));
    }
}
