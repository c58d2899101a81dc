use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::role::Role;

/// Claims the client reads out of a credential's payload segment.
///
/// The client never verifies the signature, so none of these fields are
/// trusted for anything beyond picking which screens to show. The server
/// remains the authority on every request.
///
/// # Role claim shapes
/// Tokens issued over the backend's lifetime carry the role under different
/// keys and in different shapes:
///
/// | key           | example                                   |
/// |---------------|-------------------------------------------|
/// | `role`        | `"TEACHER"`, `"ROLE_TEACHER"`             |
/// | `roles`       | `["TEACHER"]`                             |
/// | `authorities` | `["ROLE_TEACHER"]`, `[{"authority": ..}]` |
///
/// They are kept as raw JSON here and folded into a single [`Role`] by
/// [`TokenClaims::role`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Standard JWT subject, the username.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,

    #[serde(
        default,
        rename = "userName",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorities: Option<Value>,

    /// Expiry (Unix timestamp, seconds). Carried for display only; the client
    /// does not enforce it.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub exp: Option<u64>,

    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub iat: Option<u64>,
}

impl TokenClaims {
    /// First recognized role, checking `role`, then `roles`, then `authorities`.
    pub fn role(&self) -> Option<Role> {
        [&self.role, &self.roles, &self.authorities]
            .into_iter()
            .flatten()
            .find_map(role_from_value)
    }

    /// Username, preferring the standard `sub` claim.
    pub fn subject(&self) -> Option<&str> {
        self.sub
            .as_deref()
            .or(self.username.as_deref())
            .or(self.user_name.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// A claim of the wrong type reads as absent instead of failing the whole
/// payload.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Strings as-is, numbers rendered; anything else is absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn role_from_value(value: &Value) -> Option<Role> {
    match value {
        Value::String(s) => Role::from_claim(s),
        Value::Array(items) => Role::from_claims(items.iter().filter_map(authority_name)),
        Value::Object(_) => authority_name(value).and_then(Role::from_claim),
        _ => None,
    }
}

/// `"ROLE_X"` or Spring's `{"authority": "ROLE_X"}`.
fn authority_name(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => ["authority", "role", "name"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str)),
        _ => None,
    }
}
