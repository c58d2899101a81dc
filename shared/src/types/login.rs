use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Login wire types
// ---------------------------------------------------------------------------

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    #[serde(alias = "username")]
    pub user_name: String,
    pub password: String,
}

/// Successful `POST /auth/login` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed credential, persisted verbatim by the session store.
    pub token: String,
}

// ---------------------------------------------------------------------------
// Login errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    MissingField(String),
    InvalidCredentials,
    SessionNotSaved,
}

impl LoginError {
    pub fn to_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::SessionNotSaved => "SESSION_NOT_SAVED",
        }
    }

    pub fn to_message(&self) -> String {
        match self {
            Self::MissingField(field) => format!("Please fill in your {}", field),
            Self::InvalidCredentials | Self::SessionNotSaved => {
                "Invalid credentials. Please try again!".to_string()
            }
        }
    }
}

impl LoginData {
    /// Required-field check done before any request is sent.
    pub fn validate(&self) -> Result<(), LoginError> {
        if self.user_name.trim().is_empty() {
            return Err(LoginError::MissingField("username".to_string()));
        }

        if self.password.is_empty() {
            return Err(LoginError::MissingField("password".to_string()));
        }

        Ok(())
    }
}
