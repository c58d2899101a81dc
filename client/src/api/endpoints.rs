//! Typed helpers for the backend routes the client consumes.

use tracing::info;

use shared::types::{
    Assignment, LoginData, LoginResponse, NewAssignment, NewSubmission, RegistrationData,
};

use super::{ApiClient, Transport};
use crate::error::ApiError;

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const ASSIGNMENTS_PATH: &str = "/assignments";
pub const SUBMISSIONS_PATH: &str = "/submissions";

impl<T: Transport> ApiClient<T> {
    /// `POST /auth/login`. The returned token is not persisted here; the
    /// router owns that step.
    pub async fn login(&self, data: &LoginData) -> Result<LoginResponse, ApiError> {
        let response: LoginResponse = self.post(LOGIN_PATH, data).await?;
        info!("Login accepted for {}", data.user_name);
        Ok(response)
    }

    pub async fn register(&self, data: &RegistrationData) -> Result<(), ApiError> {
        self.post_unit(REGISTER_PATH, data).await?;
        info!("Registered {} as {}", data.user_name, data.role);
        Ok(())
    }

    pub async fn list_assignments(&self) -> Result<Vec<Assignment>, ApiError> {
        self.get(ASSIGNMENTS_PATH).await
    }

    /// `POST /assignments`. Any response body is ignored.
    pub async fn create_assignment(&self, data: &NewAssignment) -> Result<(), ApiError> {
        self.post_unit(ASSIGNMENTS_PATH, data).await?;
        info!("Created assignment {:?}", data.title);
        Ok(())
    }

    pub async fn submit(&self, submission: &NewSubmission) -> Result<(), ApiError> {
        self.post_unit(SUBMISSIONS_PATH, submission).await?;
        info!("Submitted work for assignment {}", submission.assignment_id());
        Ok(())
    }
}
