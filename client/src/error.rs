use http::StatusCode;
use thiserror::Error;

// ---------------------------------------------------------------------------
// HTTP adapter errors
// ---------------------------------------------------------------------------

/// The single failure condition surfaced by the HTTP adapter.
///
/// Views never show `message` to the user; they map the error to their own
/// generic text and log this value instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Request failed{}: {message}", status_suffix(.status))]
    RequestFailed {
        status: Option<StatusCode>,
        message: String,
    },
}

fn status_suffix(status: &Option<StatusCode>) -> String {
    match status {
        Some(code) => format!(" ({})", code.as_u16()),
        None => String::new(),
    }
}

impl ApiError {
    /// Transport-level failure (connect, timeout, malformed URL): no status.
    pub fn network(message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RequestFailed { status, .. } => *status,
        }
    }

    pub fn is_status(&self, code: StatusCode) -> bool {
        self.status() == Some(code)
    }

    /// 401 / 403: the server disagrees with whatever role the token claims.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }
}

// ---------------------------------------------------------------------------
// Session store errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
