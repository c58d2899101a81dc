use serde::{Deserialize, Serialize};

/// `{id}` reference the backend expects instead of a bare assignment id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRef {
    pub id: i64,
}

/// Body of `POST /submissions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub assignment: AssignmentRef,
    pub file_url: String,
}

impl NewSubmission {
    /// Build a submission from the raw text the student typed.
    ///
    /// Returns `None` when the URL is blank once trimmed; no request should be
    /// made in that case.
    pub fn from_input(assignment_id: i64, raw_url: &str) -> Option<Self> {
        let file_url = raw_url.trim();
        if file_url.is_empty() {
            return None;
        }

        Some(Self {
            assignment: AssignmentRef { id: assignment_id },
            file_url: file_url.to_string(),
        })
    }

    pub fn assignment_id(&self) -> i64 {
        self.assignment.id
    }
}

/// Submission error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    MissingFileUrl,
    AlreadySubmitted,
    Failed,
}

impl SubmissionError {
    pub fn to_code(&self) -> &'static str {
        match self {
            Self::MissingFileUrl => "MISSING_FILE_URL",
            Self::AlreadySubmitted => "ALREADY_SUBMITTED",
            Self::Failed => "SUBMISSION_FAILED",
        }
    }

    pub fn to_message(&self) -> String {
        match self {
            Self::MissingFileUrl => "Please provide a file URL before submitting!".to_string(),
            Self::AlreadySubmitted => "Already submitted".to_string(),
            Self::Failed => "Failed to submit assignment. Please try again!".to_string(),
        }
    }
}
