use tracing::{error, warn};

use shared::types::{LoginData, LoginError, LoginResponse};

use super::ViewState;
use crate::api::{ApiClient, Transport};
use crate::error::ApiError;
use crate::router::{Route, Router};

#[derive(Debug, Clone, Default)]
pub struct LoginView {
    pub form: LoginData,
    pub state: ViewState,
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit affordance state.
    pub fn can_submit(&self) -> bool {
        !self.state.loading
    }

    /// Validates the form and marks the request in flight. `None` means no
    /// request must be sent.
    pub fn begin_login(&mut self) -> Option<LoginData> {
        if self.state.loading {
            return None;
        }

        if let Err(e) = self.form.validate() {
            self.state.invalid(e.to_message());
            return None;
        }

        self.state.start();
        Some(LoginData {
            user_name: self.form.user_name.trim().to_string(),
            password: self.form.password.clone(),
        })
    }

    /// Stores the credential through the router and returns the route the
    /// user landed on, or `None` when the login failed.
    pub fn finish_login(
        &mut self,
        router: &mut Router,
        result: Result<LoginResponse, ApiError>,
    ) -> Option<Route> {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("Login failed: {}", e);
                self.state.fail(LoginError::InvalidCredentials.to_message());
                return None;
            }
        };

        match router.complete_login(&response.token) {
            Ok(route) => {
                self.form = LoginData::default();
                self.state.succeed(None);
                Some(route)
            }
            Err(e) => {
                error!("Could not persist session: {}", e);
                self.state.fail(LoginError::SessionNotSaved.to_message());
                None
            }
        }
    }

    pub async fn login<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
        router: &mut Router,
    ) -> Option<Route> {
        let data = self.begin_login()?;
        let result = api.login(&data).await;
        self.finish_login(router, result)
    }
}
