// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Read-only token decoding.
//!
//! Tokens are decoded to read the user ID, role and expiry shown in the UI.
//! The signature segment is never checked; the backend re-validates every
//! privileged call, so nothing here is a trust decision.

use std::sync::Arc;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use super::{Claims, Role};
use crate::error::{ClientError, ClientResult};
use crate::storage::CredentialSource;

/// base64url, padding optional.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes the payload segment of a three-part token.
///
/// Fails with [`ClientError::MalformedToken`] when the token does not have
/// exactly three segments, the payload is not base64url, or the decoded text
/// is not a JSON object.
pub fn decode(token: &str) -> ClientResult<Claims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(ClientError::malformed_token(format!(
            "expected 3 segments, found {}",
            parts.len()
        )));
    }

    let bytes = URL_SAFE_LENIENT
        .decode(parts[1])
        .map_err(|e| ClientError::malformed_token(format!("payload is not base64url: {}", e)))?;

    let text = String::from_utf8(bytes)
        .map_err(|_| ClientError::malformed_token("payload is not UTF-8"))?;

    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| ClientError::malformed_token(format!("payload is not JSON: {}", e)))?;

    if !value.is_object() {
        return Err(ClientError::malformed_token("payload is not a JSON object"));
    }

    Ok(Claims::from(value))
}

/// Returns `true` if `token` is absent, undecodable, lacks `exp`, or has
/// `exp < now`.
pub fn is_expired_at(token: Option<&str>, now: i64) -> bool {
    let Some(token) = token else {
        debug!("No token found, treating as expired");
        return true;
    };

    match decode(token) {
        Ok(claims) => {
            if claims.exp.is_none() {
                debug!("Token has no exp claim, treating as expired");
            }
            claims.is_expired_at(now)
        }
        Err(e) => {
            debug!(error = %e, "Token decode failed, treating as expired");
            true
        }
    }
}

// =============================================================================
// TokenInfo
// =============================================================================

/// Summary of the current credential.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    /// User ID claim.
    pub user_id: Option<i64>,
    /// Role claim.
    pub role: Option<Role>,
    /// Expiration time (Unix seconds).
    pub exp: Option<i64>,
    /// Issued at time (Unix seconds).
    pub iat: Option<i64>,
    /// Whether the token is expired.
    pub is_expired: bool,
}

// =============================================================================
// TokenInspector
// =============================================================================

/// Reads claims from whichever credential source the client is configured
/// with (session storage or a cookie).
#[derive(Clone)]
pub struct TokenInspector {
    source: Arc<dyn CredentialSource>,
}

impl TokenInspector {
    /// Creates an inspector over the given credential source.
    pub fn new(source: Arc<dyn CredentialSource>) -> Self {
        Self { source }
    }

    /// Returns the current credential, if any.
    pub fn token(&self) -> Option<String> {
        self.source.credential()
    }

    /// Decodes the current credential.
    pub fn claims(&self) -> Option<Claims> {
        let token = self.token()?;
        decode(&token).ok()
    }

    /// Returns the role claim of the current credential.
    pub fn role_from_token(&self) -> Option<Role> {
        self.claims().and_then(|c| c.role)
    }

    /// Returns the user ID claim of the current credential.
    pub fn user_id_from_token(&self) -> Option<i64> {
        self.claims().and_then(|c| c.user_id)
    }

    /// Returns `true` unless a decodable, unexpired credential is present.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Same as [`is_expired`](Self::is_expired) against a fixed clock.
    pub fn is_expired_at(&self, now: i64) -> bool {
        is_expired_at(self.token().as_deref(), now)
    }

    /// Returns a summary of the current credential.
    pub fn token_info(&self) -> Option<TokenInfo> {
        self.token_info_at(Utc::now().timestamp())
    }

    /// Same as [`token_info`](Self::token_info) against a fixed clock.
    pub fn token_info_at(&self, now: i64) -> Option<TokenInfo> {
        let claims = self.claims()?;
        Some(TokenInfo {
            user_id: claims.user_id,
            role: claims.role,
            exp: claims.exp,
            iat: claims.iat,
            is_expired: claims.is_expired_at(now),
        })
    }
}

impl std::fmt::Debug for TokenInspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenInspector")
            .field("has_token", &self.token().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::storage::TokenStore;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn token_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_decode_valid() {
        let token = token_with_payload(r#"{"userId":7,"role":0,"exp":2000000000,"iat":1700000000}"#);
        let claims = decode(&token).unwrap();
        assert_eq!(claims.user_id, Some(7));
        assert_eq!(claims.role, Some(Role::Admin));
        assert_eq!(claims.exp, Some(2_000_000_000));
    }

    #[test]
    fn test_decode_accepts_padding() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"userId":12}"#);
        assert!(payload.ends_with('='));
        let token = format!("h.{}.s", payload);
        assert_eq!(decode(&token).unwrap().user_id, Some(12));
    }

    #[test]
    fn test_decode_wrong_segment_count() {
        for token in ["", "abc", "a.b", "a.b.c.d"] {
            let err = decode(token).unwrap_err();
            assert!(matches!(err, ClientError::MalformedToken { .. }), "{}", token);
        }
    }

    #[test]
    fn test_decode_bad_base64() {
        assert!(decode("h.!!!not-base64!!!.s").is_err());
    }

    #[test]
    fn test_decode_non_json() {
        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode("hello"));
        assert!(decode(&token).is_err());

        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode("42"));
        assert!(decode(&token).is_err());
    }

    #[test]
    fn test_decode_mistyped_claims() {
        let token = token_with_payload(r#"{"sub":42,"userId":"7","exp":1792345135.5}"#);
        let claims = decode(&token).unwrap();
        assert_eq!(claims.user_id, Some(7));
        assert_eq!(claims.exp, Some(1_792_345_135));
        assert!(!is_expired_at(Some(&token), 1_792_345_000));

        let token = token_with_payload(r#"{"userId":{"id":7},"role":true,"exp":2000}"#);
        let claims = decode(&token).unwrap();
        assert_eq!(claims.user_id, None);
        assert_eq!(claims.role, None);
        assert!(!is_expired_at(Some(&token), 1000));
    }

    #[test]
    fn test_is_expired_fails_open() {
        assert!(is_expired_at(None, 0));
        assert!(is_expired_at(Some("garbage"), 0));
        let no_exp = token_with_payload(r#"{"userId":1}"#);
        assert!(is_expired_at(Some(&no_exp), 0));
    }

    #[test]
    fn test_is_expired_compares_seconds() {
        let token = token_with_payload(r#"{"exp":1000}"#);
        assert!(!is_expired_at(Some(&token), 999));
        assert!(!is_expired_at(Some(&token), 1000));
        assert!(is_expired_at(Some(&token), 1001));
    }

    #[test]
    fn test_inspector_reads_store() {
        let store = TokenStore::new(Arc::new(MemoryStore::new()));
        let inspector = TokenInspector::new(Arc::new(store.clone()));
        assert!(inspector.is_expired());
        assert!(inspector.token_info().is_none());

        store
            .save_token(&token_with_payload(r#"{"userId":3,"role":1,"exp":5000,"iat":4000}"#))
            .unwrap();

        assert_eq!(inspector.role_from_token(), Some(Role::User));
        assert_eq!(inspector.user_id_from_token(), Some(3));
        let info = inspector.token_info_at(4500).unwrap();
        assert_eq!(info.iat, Some(4000));
        assert!(!info.is_expired);
        assert!(inspector.is_expired_at(5001));
    }
}
