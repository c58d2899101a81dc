use serde::{Deserialize, Serialize};

use crate::types::role::Role;

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationData {
    #[serde(alias = "username")]
    pub user_name: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Error codes for registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    MissingField(String),
    Rejected,
}

impl RegistrationError {
    pub fn to_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::Rejected => "REGISTRATION_REJECTED",
        }
    }

    pub fn to_message(&self) -> String {
        match self {
            Self::MissingField(field) => format!("Please fill in your {}", field),
            Self::Rejected => "Registration failed. Username might already exist!".to_string(),
        }
    }
}

impl RegistrationData {
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if self.user_name.trim().is_empty() {
            return Err(RegistrationError::MissingField("username".to_string()));
        }

        if self.password.is_empty() {
            return Err(RegistrationError::MissingField("password".to_string()));
        }

        Ok(())
    }
}
