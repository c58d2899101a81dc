pub mod assignment;
pub mod client_config;
pub mod json_error;
pub mod jwt;
pub mod login;
pub mod register;
pub mod role;
pub mod submission;

pub use self::assignment::{Assignment, AssignmentError, DueStatus, NewAssignment};
pub use self::client_config::{ApiConfig, ClientConfig, ConfigError, SessionConfig, UiConfig};
pub use self::json_error::ErrorResponse;
pub use self::jwt::TokenClaims;
pub use self::login::{LoginData, LoginError, LoginResponse};
pub use self::register::{RegistrationData, RegistrationError};
pub use self::role::Role;
pub use self::submission::{AssignmentRef, NewSubmission, SubmissionError};
