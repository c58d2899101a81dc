//! EduHub client core: HTTP adapter, session store, router and view models.
//!
//! Nothing in this crate touches the terminal; the `eduhub` binary renders
//! the view models and feeds user input back into them.

pub mod api;
pub mod error;
pub mod router;
pub mod store;
pub mod views;

pub use api::{ApiClient, HyperTransport, Transport};
pub use error::{ApiError, StoreError};
pub use router::{AuthState, Navigation, Route, Router, guard, home_for};
pub use store::{FileStore, MemoryStore, SessionStore};
