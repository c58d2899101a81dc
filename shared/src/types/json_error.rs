use serde::{Deserialize, Serialize};

/// Error body returned by the backend on non-2xx responses.
///
/// Only used to enrich log lines; the text shown to the user is always the
/// view's own generic message.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Best human-readable description in the body, if any.
    pub fn summary(&self) -> Option<String> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .or(self.code.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}
