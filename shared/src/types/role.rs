use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Spring-style authority prefix seen on some historical tokens.
const ROLE_PREFIX: &str = "ROLE_";

/// The two roles the backend knows about.
///
/// This is the single canonical representation of a role inside the client;
/// every claim shape a token may carry is folded into one of these variants
/// by [`Role::from_claim`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Least-privilege default.
    #[default]
    Student,
    Teacher,
}

impl Role {
    /// Wire value, as sent in `{userName, password, role}` on registration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "STUDENT",
            Self::Teacher => "TEACHER",
        }
    }

    /// Normalize a single claim value.
    ///
    /// Accepts `TEACHER`, `ROLE_TEACHER`, `teacher`, surrounding whitespace, etc.
    /// Returns `None` for anything that is not one of the two known roles.
    pub fn from_claim(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let upper = trimmed.to_ascii_uppercase();
        let bare = upper.strip_prefix(ROLE_PREFIX).unwrap_or(&upper);

        match bare {
            "STUDENT" => Some(Self::Student),
            "TEACHER" => Some(Self::Teacher),
            _ => None,
        }
    }

    /// Normalize a collection of claim values (`roles` / `authorities`).
    ///
    /// Teacher wins over student when both are present.
    pub fn from_claims<'a, I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut found = None;
        for value in values {
            match Self::from_claim(value) {
                Some(Self::Teacher) => return Some(Self::Teacher),
                Some(Self::Student) => found = Some(Self::Student),
                None => {}
            }
        }
        found
    }

    /// The other role, for the registration form toggle.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Student => Self::Teacher,
            Self::Teacher => Self::Student,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_claim(s).ok_or_else(|| format!("unknown role: {}", s))
    }
}
