use chrono::NaiveDate;
use tracing::{debug, warn};

use shared::types::{Assignment, AssignmentError, DueStatus, NewAssignment};

use super::ViewState;
use super::listing::ListQuery;
use crate::api::{ApiClient, Transport};
use crate::error::ApiError;

/// Quick stats shown above the teacher's list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentStats {
    pub total: usize,
    pub active: usize,
    pub overdue: usize,
}

/// Teacher dashboard: list plus a collapsible create form.
#[derive(Debug, Clone, Default)]
pub struct AssignmentsView {
    pub assignments: Vec<Assignment>,
    pub form: NewAssignment,
    pub show_form: bool,
    pub creating: bool,
    pub query: ListQuery,
    pub state: ViewState,
}

impl AssignmentsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_form(&mut self) {
        self.show_form = !self.show_form;
    }

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

    pub fn can_create(&self) -> bool {
        !self.creating
    }

    pub fn begin_create(&mut self) -> Option<NewAssignment> {
        if self.creating {
            return None;
        }

        if let Err(e) = self.form.validate() {
            self.state.invalid(e.to_message());
            return None;
        }

        self.creating = true;
        self.state.clear_messages();
        Some(NewAssignment {
            title: self.form.title.trim().to_string(),
            description: self.form.description.trim().to_string(),
            due_date: self.form.due_date.trim().to_string(),
        })
    }

    /// Returns `true` when the list should be reloaded.
    pub fn finish_create(&mut self, result: Result<(), ApiError>) -> bool {
        self.creating = false;
        match result {
            Ok(()) => {
                self.form = NewAssignment::default();
                self.show_form = false;
                true
            }
            Err(e) => {
                warn!("Creating assignment failed: {}", e);
                self.state.error = Some(AssignmentError::CreateFailed.to_message());
                false
            }
        }
    }

    pub async fn load<T: Transport>(&mut self, api: &ApiClient<T>) {
        if self.begin_load() {
            let result = api.list_assignments().await;
            self.finish_load(result);
        }
    }

    pub async fn create<T: Transport>(&mut self, api: &ApiClient<T>) -> bool {
        let Some(data) = self.begin_create() else {
            return false;
        };
        let result = api.create_assignment(&data).await;
        if self.finish_create(result) {
            self.load(api).await;
            true
        } else {
            false
        }
    }

    pub fn stats(&self, today: NaiveDate) -> AssignmentStats {
        let overdue = self
            .assignments
            .iter()
            .filter(|a| a.due_status(today) == DueStatus::Overdue)
            .count();

        AssignmentStats {
            total: self.assignments.len(),
            active: self.assignments.len() - overdue,
            overdue,
        }
    }

    pub fn visible(&self, today: NaiveDate) -> Vec<&Assignment> {
        self.query.apply(&self.assignments, today)
    }
}
