use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days-left threshold under which an assignment is flagged as due soon.
pub const DUE_SOON_DAYS: i64 = 3;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One entry of `GET /assignments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Backend date string, `YYYY-MM-DD` or an ISO-8601 timestamp.
    #[serde(default)]
    pub due_date: String,
}

/// Body of `POST /assignments`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
    pub title: String,
    pub description: String,
    pub due_date: String,
}

impl NewAssignment {
    /// Required-field check. Business rules (such as a due date in the past)
    /// are left to the backend.
    pub fn validate(&self) -> Result<(), AssignmentError> {
        let fields = [
            ("title", &self.title),
            ("description", &self.description),
            ("due date", &self.due_date),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(AssignmentError::MissingField(name.to_string()));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    MissingField(String),
    LoadFailed,
    CreateFailed,
}

impl AssignmentError {
    pub fn to_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::LoadFailed => "LOAD_FAILED",
            Self::CreateFailed => "CREATE_FAILED",
        }
    }

    pub fn to_message(&self) -> String {
        match self {
            Self::MissingField(field) => format!("Please fill in the {}", field),
            Self::LoadFailed => "Failed to load assignments".to_string(),
            Self::CreateFailed => "Failed to create assignment".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Due dates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Overdue,
    /// Due within [`DUE_SOON_DAYS`]; carries the days left (0 = today).
    DueSoon(i64),
    Active,
}

impl DueStatus {
    pub fn label(&self) -> String {
        match self {
            Self::Overdue => "Overdue".to_string(),
            Self::DueSoon(0) => "Due today".to_string(),
            Self::DueSoon(1) => "1 day left".to_string(),
            Self::DueSoon(days) => format!("{} days left", days),
            Self::Active => "Active".to_string(),
        }
    }
}

/// Parse the date part of a backend due date.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

impl Assignment {
    pub fn due(&self) -> Option<NaiveDate> {
        parse_due_date(&self.due_date)
    }

    /// Calendar days from `today` until the due date; negative once past.
    ///
    /// Due dates carry no time of day, so this equals the remaining time
    /// rounded up to whole days from any moment during `today`: due tomorrow
    /// is 1, due today is 0.
    pub fn days_until_due(&self, today: NaiveDate) -> Option<i64> {
        self.due()
            .map(|due| due.signed_duration_since(today).num_days())
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.days_until_due(today).is_some_and(|days| days < 0)
    }

    /// Unparseable dates are reported as [`DueStatus::Active`].
    pub fn due_status(&self, today: NaiveDate) -> DueStatus {
        match self.days_until_due(today) {
            Some(days) if days < 0 => DueStatus::Overdue,
            Some(days) if days <= DUE_SOON_DAYS => DueStatus::DueSoon(days),
            _ => DueStatus::Active,
        }
    }

    /// `March 5, 2025`, or the raw string when it cannot be parsed.
    pub fn formatted_due_date(&self) -> String {
        match self.due() {
            Some(date) => date.format("%B %-d, %Y").to_string(),
            None => self.due_date.clone(),
        }
    }
}
