use std::time::{Duration, Instant};

use tracing::warn;

use shared::types::{RegistrationData, RegistrationError};

use super::ViewState;
use crate::api::{ApiClient, Transport};
use crate::error::ApiError;

pub const REGISTERED_MESSAGE: &str = "Your account has been created successfully!";

#[derive(Debug, Clone)]
pub struct RegisterView {
    pub form: RegistrationData,
    pub state: ViewState,
    redirect_after: Duration,
    registered_at: Option<Instant>,
}

impl RegisterView {
    pub fn new(redirect_after: Duration) -> Self {
        Self {
            form: RegistrationData::default(),
            state: ViewState::default(),
            redirect_after,
            registered_at: None,
        }
    }

    pub fn toggle_role(&mut self) {
        self.form.role = self.form.role.toggled();
    }

    pub fn can_submit(&self) -> bool {
        !self.state.loading && self.registered_at.is_none()
    }

    pub fn begin_register(&mut self) -> Option<RegistrationData> {
        if !self.can_submit() {
            return None;
        }

        if let Err(e) = self.form.validate() {
            self.state.invalid(e.to_message());
            return None;
        }

        self.state.start();
        Some(RegistrationData {
            user_name: self.form.user_name.trim().to_string(),
            password: self.form.password.clone(),
            role: self.form.role,
        })
    }

    pub fn finish_register(&mut self, result: Result<(), ApiError>, now: Instant) {
        match result {
            Ok(()) => {
                self.state.succeed(Some(REGISTERED_MESSAGE.to_string()));
                self.registered_at = Some(now);
            }
            Err(e) => {
                warn!("Registration failed: {}", e);
                self.state.fail(RegistrationError::Rejected.to_message());
            }
        }
    }

    /// `true` once the post-registration delay has elapsed and the caller
    /// should move to `/login`.
    pub fn redirect_due(&self, now: Instant) -> bool {
        self.registered_at
            .is_some_and(|at| now.saturating_duration_since(at) >= self.redirect_after)
    }

    pub async fn register<T: Transport>(&mut self, api: &ApiClient<T>) -> bool {
        let Some(data) = self.begin_register() else {
            return false;
        };
        let result = api.register(&data).await;
        let ok = result.is_ok();
        self.finish_register(result, Instant::now());
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::types::Role;

    #[test]
    fn role_toggles_between_student_and_teacher() {
        let mut view = RegisterView::new(Duration::from_millis(2000));
        assert_eq!(view.form.role, Role::Student);
        view.toggle_role();
        assert_eq!(view.form.role, Role::Teacher);
        view.toggle_role();
        assert_eq!(view.form.role, Role::Student);
    }

    #[test]
    fn redirect_waits_for_the_delay() {
        let mut view = RegisterView::new(Duration::from_millis(2000));
        view.form.user_name = "newbie".into();
        view.form.password = "pw".into();

        let payload = view.begin_register().unwrap();
        assert_eq!(payload.role, Role::Student);

        let start = Instant::now();
        view.finish_register(Ok(()), start);

        assert_eq!(view.state.success.as_deref(), Some(REGISTERED_MESSAGE));
        assert!(!view.redirect_due(start + Duration::from_millis(1999)));
        assert!(view.redirect_due(start + Duration::from_millis(2000)));
        assert!(!view.can_submit());
    }

    #[test]
    fn failure_shows_generic_text_and_never_redirects() {
        let mut view = RegisterView::new(Duration::ZERO);
        view.form.user_name = "taken".into();
        view.form.password = "pw".into();
        view.begin_register().unwrap();

        let now = Instant::now();
        view.finish_register(
            Err(ApiError::with_status(http::StatusCode::CONFLICT, "exists")),
            now,
        );

        assert_eq!(
            view.state.error.as_deref(),
            Some("Registration failed. Username might already exist!")
        );
        assert!(!view.redirect_due(now));
        assert!(view.can_submit());
    }
}
