//! View models.
//!
//! Each view owns its transient [`ViewState`] and splits every request it
//! issues into `begin_*` (validate, mark loading, build the payload) and
//! `finish_*` (apply the outcome). The terminal front-end runs the request
//! in between on a background task; tests and simple callers use the async
//! convenience that does all three steps.

pub mod assignments;
pub mod landing;
pub mod listing;
pub mod login;
pub mod navbar;
pub mod register;
pub mod submissions;

pub use assignments::AssignmentsView;
pub use landing::{FeatureCarousel, LandingView};
pub use listing::{ListQuery, SortKey, StatusFilter};
pub use login::LoginView;
pub use navbar::{NavAction, NavLink, nav_links};
pub use register::RegisterView;
pub use submissions::{ProgressStats, SubmissionsView};

/// Loading / error / success triple shared by every view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl ViewState {
    /// Clears previous messages and marks a request in flight.
    pub fn start(&mut self) {
        self.loading = true;
        self.error = None;
        self.success = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.success = None;
        self.error = Some(message.into());
    }

    pub fn succeed(&mut self, message: Option<String>) {
        self.loading = false;
        self.error = None;
        self.success = message;
    }

    /// Local validation failure: never touches `loading`.
    pub fn invalid(&mut self, message: impl Into<String>) {
        self.success = None;
        self.error = Some(message.into());
    }

    pub fn clear_messages(&mut self) {
        self.error = None;
        self.success = None;
    }
}
