use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use http::StatusCode;
use tracing::{debug, info, warn};

use shared::types::assignment::DUE_SOON_DAYS;
use shared::types::{Assignment, AssignmentError, NewSubmission, SubmissionError};

use super::ViewState;
use super::listing::ListQuery;
use crate::api::{ApiClient, Transport};
use crate::error::ApiError;

/// "Your Progress" counts for the student dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressStats {
    pub total: usize,
    pub active: usize,
    /// Due within the next few days, excluding today.
    pub due_soon: usize,
    pub overdue: usize,
}

/// Student dashboard: every assignment with its own file URL draft.
///
/// Several submissions may be in flight at once; each assignment is disabled
/// individually while its request runs.
#[derive(Debug, Clone)]
pub struct SubmissionsView {
    pub assignments: Vec<Assignment>,
    pub query: ListQuery,
    pub state: ViewState,
    drafts: HashMap<i64, String>,
    submitting: HashSet<i64>,
    flash_for: Duration,
    success_at: Option<Instant>,
}

impl SubmissionsView {
    pub fn new(flash_for: Duration) -> Self {
        Self {
            assignments: Vec::new(),
            query: ListQuery::default(),
            state: ViewState::default(),
            drafts: HashMap::new(),
            submitting: HashSet::new(),
            flash_for,
            success_at: None,
        }
    }

    pub fn draft(&self, assignment_id: i64) -> &str {
        self.drafts
            .get(&assignment_id)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn draft_mut(&mut self, assignment_id: i64) -> &mut String {
        self.drafts.entry(assignment_id).or_default()
    }

    pub fn set_draft(&mut self, assignment_id: i64, url: impl Into<String>) {
        self.drafts.insert(assignment_id, url.into());
    }

    pub fn is_submitting(&self, assignment_id: i64) -> bool {
        self.submitting.contains(&assignment_id)
    }

    pub fn in_flight(&self) -> usize {
        self.submitting.len()
    }

    // -- list ---------------------------------------------------------------

    pub fn begin_load(&mut self) -> bool {
        if self.state.loading {
            return false;
        }
        self.state.loading = true;
        self.state.error = None;
        true
    }

    pub fn finish_load(&mut self, result: Result<Vec<Assignment>, ApiError>) {
        self.state.loading = false;
        match result {
            Ok(assignments) => {
                debug!("Loaded {} assignments", assignments.len());
                self.assignments = assignments;
            }
            Err(e) => {
                warn!("Loading assignments failed: {}", e);
                self.state.error = Some(AssignmentError::LoadFailed.to_message());
            }
        }
    }

    pub async fn load<T: Transport>(&mut self, api: &ApiClient<T>) {
        if self.begin_load() {
            let result = api.list_assignments().await;
            self.finish_load(result);
        }
    }

    pub fn visible(&self, today: NaiveDate) -> Vec<&Assignment> {
        self.query.apply(&self.assignments, today)
    }

    pub fn stats(&self, today: NaiveDate) -> ProgressStats {
        let mut stats = ProgressStats {
            total: self.assignments.len(),
            ..Default::default()
        };

        for assignment in &self.assignments {
            if assignment.is_overdue(today) {
                stats.overdue += 1;
            } else {
                stats.active += 1;
            }
            if assignment
                .days_until_due(today)
                .is_some_and(|days| days > 0 && days <= DUE_SOON_DAYS)
            {
                stats.due_soon += 1;
            }
        }

        stats
    }

    // -- submit -------------------------------------------------------------

    /// Builds the request for one assignment. A blank URL sets a local error
    /// and returns `None`; no request may be sent then.
    pub fn begin_submit(&mut self, assignment_id: i64) -> Option<NewSubmission> {
        if self.is_submitting(assignment_id) {
            return None;
        }

        let Some(submission) = NewSubmission::from_input(assignment_id, self.draft(assignment_id))
        else {
            self.state.invalid(SubmissionError::MissingFileUrl.to_message());
            return None;
        };

        self.submitting.insert(assignment_id);
        self.state.clear_messages();
        self.success_at = None;
        Some(submission)
    }

    pub fn finish_submit(&mut self, assignment_id: i64, result: Result<(), ApiError>, now: Instant) {
        self.submitting.remove(&assignment_id);

        match result {
            Ok(()) => {
                let title = self
                    .assignments
                    .iter()
                    .find(|a| a.id == assignment_id)
                    .map(|a| a.title.as_str())
                    .unwrap_or("assignment");
                info!("Submission for assignment {} accepted", assignment_id);

                self.state.error = None;
                self.state.success = Some(format!("Successfully submitted \"{}\"!", title));
                self.success_at = Some(now);
                self.drafts.remove(&assignment_id);
            }
            Err(e) => {
                warn!("Submission for assignment {} rejected: {}", assignment_id, e);
                let error = if e.is_status(StatusCode::CONFLICT) {
                    SubmissionError::AlreadySubmitted
                } else {
                    SubmissionError::Failed
                };
                self.state.success = None;
                self.state.error = Some(error.to_message());
            }
        }
    }

    /// Clears the success message once it has been visible long enough.
    pub fn expire_flash(&mut self, now: Instant) {
        if let Some(at) = self.success_at
            && now.saturating_duration_since(at) >= self.flash_for
        {
            self.state.success = None;
            self.success_at = None;
        }
    }

    pub async fn submit<T: Transport>(&mut self, api: &ApiClient<T>, assignment_id: i64) -> bool {
        let Some(submission) = self.begin_submit(assignment_id) else {
            return false;
        };
        let result = api.submit(&submission).await;
        let ok = result.is_ok();
        self.finish_submit(assignment_id, result, Instant::now());
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> SubmissionsView {
        let mut view = SubmissionsView::new(Duration::from_millis(3000));
        view.finish_load(Ok(vec![
            Assignment {
                id: 1,
                title: "Essay".into(),
                description: String::new(),
                due_date: "2026-05-01".into(),
            },
            Assignment {
                id: 2,
                title: "Lab".into(),
                description: String::new(),
                due_date: "2026-05-02".into(),
            },
        ]));
        view
    }

    #[test]
    fn progress_counts_due_soon_from_tomorrow() {
        let mut view = SubmissionsView::new(Duration::from_millis(3000));
        let due = |id: i64, date: &str| Assignment {
            id,
            title: format!("a{id}"),
            description: String::new(),
            due_date: date.into(),
        };
        view.finish_load(Ok(vec![
            due(1, "2026-04-29"),
            due(2, "2026-04-30"),
            due(3, "2026-05-01"),
            due(4, "2026-05-03"),
            due(5, "2026-05-04"),
            due(6, "someday"),
        ]));

        let today = NaiveDate::from_ymd_opt(2026, 4, 30).unwrap();
        assert_eq!(
            view.stats(today),
            ProgressStats {
                total: 6,
                active: 5,
                due_soon: 2,
                overdue: 1,
            }
        );
    }

    #[test]
    fn blank_url_sets_local_error() {
        let mut view = view();
        view.set_draft(1, "   ");
        assert_eq!(view.begin_submit(1), None);
        assert_eq!(
            view.state.error.as_deref(),
            Some("Please provide a file URL before submitting!")
        );
        assert!(!view.is_submitting(1));
    }

    #[test]
    fn success_clears_draft_and_flashes_title() {
        let mut view = view();
        view.set_draft(1, " https://files/essay.pdf ");
        let submission = view.begin_submit(1).unwrap();
        assert_eq!(submission.file_url, "https://files/essay.pdf");
        assert!(view.is_submitting(1));

        let now = Instant::now();
        view.finish_submit(1, Ok(()), now);

        assert_eq!(view.draft(1), "");
        assert_eq!(
            view.state.success.as_deref(),
            Some("Successfully submitted \"Essay\"!")
        );

        view.expire_flash(now + Duration::from_millis(2999));
        assert!(view.state.success.is_some());
        view.expire_flash(now + Duration::from_millis(3000));
        assert_eq!(view.state.success, None);
    }

    #[test]
    fn conflict_maps_to_already_submitted_and_keeps_draft() {
        let mut view = view();
        view.set_draft(2, "https://files/lab.pdf");
        view.begin_submit(2).unwrap();
        view.finish_submit(
            2,
            Err(ApiError::with_status(StatusCode::CONFLICT, "duplicate")),
            Instant::now(),
        );

        assert_eq!(view.draft(2), "https://files/lab.pdf");
        assert_eq!(view.state.error.as_deref(), Some("Already submitted"));
        assert_eq!(view.state.success, None);
    }

    #[test]
    fn other_failures_use_generic_text() {
        let mut view = view();
        view.set_draft(2, "https://files/lab.pdf");
        view.begin_submit(2).unwrap();
        view.finish_submit(
            2,
            Err(ApiError::with_status(StatusCode::BAD_REQUEST, "bad")),
            Instant::now(),
        );
        assert_eq!(
            view.state.error.as_deref(),
            Some("Failed to submit assignment. Please try again!")
        );
    }

    #[test]
    fn assignments_are_disabled_individually() {
        let mut view = view();
        view.set_draft(1, "https://a");
        view.set_draft(2, "https://b");

        assert!(view.begin_submit(1).is_some());
        assert!(view.begin_submit(2).is_some());
        assert_eq!(view.in_flight(), 2);

        // Second press on a pending assignment is ignored.
        assert!(view.begin_submit(1).is_none());

        view.finish_submit(1, Ok(()), Instant::now());
        assert!(!view.is_submitting(1));
        assert!(view.is_submitting(2));
    }
}
