use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use proptest::prelude::*;
use serde_json::{Value, json};

use shared::types::Role;
use shared::{decode_session, try_decode_session};

fn token(payload: &Value) -> String {
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

// ── Historical role encodings ────────────────────────────────────────────────

#[test]
fn every_teacher_encoding_normalizes_to_teacher() {
    let payloads = [
        json!({"sub": "t", "role": "TEACHER"}),
        json!({"sub": "t", "role": "ROLE_TEACHER"}),
        json!({"sub": "t", "roles": ["TEACHER"]}),
        json!({"sub": "t", "authorities": ["ROLE_TEACHER"]}),
    ];

    for payload in &payloads {
        let session = decode_session(Some(token(payload).as_str()))
            .unwrap_or_else(|| panic!("no session for {}", payload));
        assert_eq!(session.role, Role::Teacher, "payload: {}", payload);
        assert!(!session.role_defaulted);
        assert_eq!(session.subject, "t");
    }
}

#[test]
fn every_student_encoding_normalizes_to_student() {
    let payloads = [
        json!({"sub": "s", "role": "STUDENT"}),
        json!({"sub": "s", "role": "ROLE_STUDENT"}),
        json!({"sub": "s", "roles": ["STUDENT"]}),
        json!({"sub": "s", "authorities": ["ROLE_STUDENT"]}),
    ];

    for payload in &payloads {
        let session = decode_session(Some(token(payload).as_str())).unwrap();
        assert_eq!(session.role, Role::Student, "payload: {}", payload);
        assert!(!session.role_defaulted);
    }
}

#[test]
fn unknown_role_is_least_privilege() {
    let session = decode_session(Some(token(&json!({"sub": "x", "role": "ADMIN"})).as_str())).unwrap();
    assert_eq!(session.role, Role::Student);
    assert!(session.role_defaulted);
}

#[test]
fn oddly_typed_claims_keep_the_role() {
    let numeric_sub = decode_session(Some(token(&json!({"sub": 42, "role": "TEACHER"})).as_str()))
        .expect("numeric sub");
    assert_eq!(numeric_sub.role, Role::Teacher);
    assert_eq!(numeric_sub.subject, "42");

    let float_exp = decode_session(Some(
        token(&json!({"sub": "t", "role": "TEACHER", "exp": 1700000000.5})).as_str(),
    ))
    .expect("fractional exp");
    assert_eq!(float_exp.role, Role::Teacher);
    assert_eq!(float_exp.expires_at, None);

    let negative_exp = decode_session(Some(
        token(&json!({"sub": "t", "roles": ["TEACHER"], "exp": -5, "iat": "yesterday"})).as_str(),
    ))
    .expect("negative exp");
    assert_eq!(negative_exp.role, Role::Teacher);
}

// ── Malformed credentials ────────────────────────────────────────────────────

#[test]
fn malformed_credentials_are_anonymous() {
    let cases = vec![
        "garbage".to_string(),
        "only.".to_string(),
        "a.!!!not-base64!!!.c".to_string(),
        format!("a.{}.c", URL_SAFE_NO_PAD.encode("not json")),
        format!("a.{}.c", URL_SAFE_NO_PAD.encode("\"a string\"")),
        format!("a.{}.c", URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0x00])),
    ];

    for case in &cases {
        assert_eq!(decode_session(Some(case.as_str())), None, "case: {}", case);
        assert!(try_decode_session(case).is_err(), "case: {}", case);
    }
}

proptest! {
    #[test]
    fn arbitrary_strings_never_panic(s in ".*") {
        let _ = decode_session(Some(s.as_str()));
    }

    #[test]
    fn arbitrary_payload_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let credential = format!("h.{}.s", URL_SAFE_NO_PAD.encode(&bytes));
        let _ = decode_session(Some(credential.as_str()));
    }

    #[test]
    fn non_base64_payload_is_always_anonymous(payload in "[^A-Za-z0-9+/=_.-]{1,40}") {
        let credential = format!("h.{}.s", payload);
        prop_assert_eq!(decode_session(Some(credential.as_str())), None);
    }
}
