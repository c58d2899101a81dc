//! Client-side session derivation.
//!
//! A [`Session`] is never stored. It is recomputed from the raw credential
//! every time the router or a navigation view needs it, so a logout or a new
//! login is picked up immediately.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::jwt::TokenClaims;
use crate::types::role::Role;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Malformed credential: {0}")]
    MalformedCredential(String),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// What the client knows about the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Username taken from the `sub` claim (empty when the token has none).
    pub subject: String,

    /// Canonical role. Never trusted server-side; it only picks screens.
    pub role: Role,

    /// `true` when no recognizable role claim was present and the
    /// least-privilege default was applied.
    pub role_defaulted: bool,

    /// Unverified `exp` claim, informational only.
    pub expires_at: Option<u64>,
}

impl Session {
    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }
}

/// Decode the stored credential into a [`Session`].
///
/// `None` means anonymous: either nothing is stored or the credential could
/// not be decoded. Decode failures are logged and swallowed here so that a
/// corrupt credential can never take a view down.
pub fn decode_session(credential: Option<&str>) -> Option<Session> {
    let credential = credential?.trim();
    if credential.is_empty() {
        return None;
    }

    match try_decode_session(credential) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!("Treating session as anonymous: {}", e);
            None
        }
    }
}

/// Strict variant of [`decode_session`] that reports why decoding failed.
pub fn try_decode_session(credential: &str) -> Result<Session, SessionError> {
    let claims = decode_claims(credential)?;

    let role = claims.role();
    if role.is_none() {
        warn!(
            "Credential for {:?} carries no recognizable role claim, defaulting to {}",
            claims.subject().unwrap_or("<unknown>"),
            Role::default()
        );
    }

    let session = Session {
        subject: claims.subject().unwrap_or_default().to_string(),
        role: role.unwrap_or_default(),
        role_defaulted: role.is_none(),
        expires_at: claims.exp,
    };

    debug!("Decoded session: subject={}, role={}", session.subject, session.role);

    Ok(session)
}

/// Decode the payload segment of `header.payload.signature` without
/// checking the signature.
pub fn decode_claims(credential: &str) -> Result<TokenClaims, SessionError> {
    let payload = credential
        .split('.')
        .nth(1)
        .ok_or_else(|| SessionError::MalformedCredential("missing payload segment".into()))?;

    let bytes = decode_segment(payload)?;

    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| SessionError::MalformedCredential(format!("invalid payload JSON: {}", e)))?;

    if !value.is_object() {
        return Err(SessionError::MalformedCredential(
            "payload is not a JSON object".into(),
        ));
    }

    serde_json::from_value::<TokenClaims>(value)
        .map_err(|e| SessionError::MalformedCredential(format!("invalid claims: {}", e)))
}

/// Base64 decode accepting both the URL-safe and standard alphabets, with or
/// without padding.
fn decode_segment(segment: &str) -> Result<Vec<u8>, SessionError> {
    if segment.is_empty() {
        return Err(SessionError::MalformedCredential("empty payload segment".into()));
    }

    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    URL_SAFE_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|e| SessionError::MalformedCredential(format!("invalid base64 payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    fn token_with_payload(payload: &str, engine: &impl Engine) -> String {
        format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", engine.encode(payload))
    }

    #[test]
    fn absent_credential_is_anonymous() {
        assert_eq!(decode_session(None), None);
        assert_eq!(decode_session(Some("")), None);
        assert_eq!(decode_session(Some("   ")), None);
    }

    #[test]
    fn padded_standard_alphabet_is_accepted() {
        // 'sub' chosen so the standard encoding contains padding.
        let token = token_with_payload(r#"{"sub":"ab","role":"TEACHER"}"#, &STANDARD);
        let session = decode_session(Some(token.as_str())).unwrap();
        assert_eq!(session.role, Role::Teacher);
        assert_eq!(session.subject, "ab");
    }

    #[test]
    fn url_safe_alphabet_is_accepted() {
        let token = token_with_payload(r#"{"sub":"??>>","role":"STUDENT"}"#, &URL_SAFE_NO_PAD);
        let session = decode_session(Some(token.as_str())).unwrap();
        assert_eq!(session.subject, "??>>");
        assert_eq!(session.role, Role::Student);
    }

    #[test]
    fn missing_role_defaults_to_student_and_is_flagged() {
        let token = token_with_payload(r#"{"sub":"dave"}"#, &URL_SAFE_NO_PAD);
        let session = decode_session(Some(token.as_str())).unwrap();
        assert_eq!(session.role, Role::Student);
        assert!(session.role_defaulted);
    }

    #[test]
    fn strict_decode_reports_missing_segment() {
        let err = try_decode_session("no-dots-here").unwrap_err();
        assert!(matches!(err, SessionError::MalformedCredential(_)));
        assert!(err.to_string().contains("missing payload segment"));
    }

    #[test]
    fn non_object_payload_is_malformed() {
        for payload in ["[1,2,3]", "[]", "\"TEACHER\"", "null"] {
            let token = token_with_payload(payload, &URL_SAFE_NO_PAD);
            assert!(try_decode_session(&token).is_err(), "{payload}");
            assert_eq!(decode_session(Some(token.as_str())), None);
        }
    }

    #[test]
    fn expiry_is_carried_through() {
        let token = token_with_payload(r#"{"sub":"e","role":"TEACHER","exp":42}"#, &URL_SAFE_NO_PAD);
        assert_eq!(decode_session(Some(token.as_str())).unwrap().expires_at, Some(42));
    }
}
