//! Route table and guard.
//!
//! The router never caches a [`Session`]: every navigation re-reads the
//! credential from the store and decodes it, so a login or logout performed
//! anywhere is reflected on the next move.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use shared::types::Role;
use shared::{Session, decode_session};

use crate::error::StoreError;
use crate::store::SessionStore;

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Register,
    Teacher,
    StudentSubmissions,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Landing,
        Route::Login,
        Route::Register,
        Route::Teacher,
        Route::StudentSubmissions,
    ];

    /// Resolve a client path. Query strings and a trailing slash are ignored,
    /// `/student` is an alias for the submissions page and anything unknown
    /// resolves to the landing page.
    pub fn parse(path: &str) -> Route {
        let path = path.trim();
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');

        match path {
            "" => Route::Landing,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/teacher" => Route::Teacher,
            "/submissions/student" | "/student" => Route::StudentSubmissions,
            other => {
                debug!("Unknown path {:?}, falling back to /", other);
                Route::Landing
            }
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Teacher => "/teacher",
            Route::StudentSubmissions => "/submissions/student",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Landing => "Welcome",
            Route::Login => "Sign In",
            Route::Register => "Create Account",
            Route::Teacher => "Teacher Dashboard",
            Route::StudentSubmissions => "My Assignments",
        }
    }

    /// Role required to view the route, if any.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Teacher => Some(Role::Teacher),
            Route::StudentSubmissions => Some(Role::Student),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Dashboard for a signed-in role.
pub fn home_for(role: Role) -> Route {
    match role {
        Role::Teacher => Route::Teacher,
        Role::Student => Route::StudentSubmissions,
    }
}

// ---------------------------------------------------------------------------
// Auth state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Student(Session),
    Teacher(Session),
}

impl AuthState {
    pub fn from_session(session: Option<Session>) -> Self {
        match session {
            None => AuthState::Anonymous,
            Some(session) if session.is_teacher() => AuthState::Teacher(session),
            Some(session) => AuthState::Student(session),
        }
    }

    pub fn from_store(store: &dyn SessionStore) -> Self {
        Self::from_session(decode_session(store.credential().as_deref()))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Anonymous => None,
            AuthState::Student(session) | AuthState::Teacher(session) => Some(session),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.session().map(|s| s.role)
    }
}

// ---------------------------------------------------------------------------
// Guard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect { from: Route, to: Route },
}

impl Navigation {
    /// Where the user actually ends up when asking for `requested`.
    pub fn destination(&self, requested: Route) -> Route {
        match self {
            Navigation::Allow => requested,
            Navigation::Redirect { to, .. } => *to,
        }
    }
}

/// Decide whether `route` may be shown in `auth`.
///
/// Protected routes send anonymous users to `/login` and users of the other
/// role to their own dashboard. Public routes are always allowed, including
/// `/login` for a user who is already signed in.
pub fn guard(route: Route, auth: &AuthState) -> Navigation {
    let Some(required) = route.required_role() else {
        return Navigation::Allow;
    };

    match auth.role() {
        None => Navigation::Redirect {
            from: route,
            to: Route::Login,
        },
        Some(role) if role == required => Navigation::Allow,
        Some(role) => Navigation::Redirect {
            from: route,
            to: home_for(role),
        },
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub struct Router {
    store: Arc<dyn SessionStore>,
    current: Route,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl Router {
    /// The initial route is guarded against whatever credential is already
    /// persisted.
    pub fn new(store: Arc<dyn SessionStore>, initial_path: &str) -> Self {
        let mut router = Self {
            store,
            current: Route::Landing,
        };
        router.navigate(initial_path);
        router
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Re-derived from the store on every call.
    pub fn auth_state(&self) -> AuthState {
        AuthState::from_store(self.store.as_ref())
    }

    pub fn navigate(&mut self, path: &str) -> Route {
        let requested = Route::parse(path);
        if requested.path() != path {
            debug!("Path {:?} resolved to {}", path, requested);
        }
        self.go(requested)
    }

    pub fn go(&mut self, requested: Route) -> Route {
        let auth = self.auth_state();
        let navigation = guard(requested, &auth);

        if let Navigation::Redirect { from, to } = navigation {
            info!("Redirecting {} -> {}", from, to);
        }

        self.current = navigation.destination(requested);
        self.current
    }

    /// Role home when signed in.
    pub fn dashboard(&self) -> Option<Route> {
        self.auth_state().role().map(home_for)
    }

    /// Persist a freshly issued credential and move to the role's home.
    pub fn complete_login(&mut self, token: &str) -> Result<Route, StoreError> {
        self.store.save(token.trim())?;

        let auth = self.auth_state();
        match auth.session() {
            Some(session) => info!("Signed in as {} ({})", session.subject, session.role),
            None => warn!("Login returned a credential that does not decode"),
        }

        // An undecodable credential is anonymous, so the guard bounces the
        // student home back to /login.
        Ok(self.go(home_for(auth.role().unwrap_or_default())))
    }

    /// Drop the credential and return to `/login`. A store that cannot be
    /// cleared is logged and the navigation still happens.
    pub fn logout(&mut self) -> Route {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear session store: {}", e);
        } else {
            info!("Signed out");
        }
        self.go(Route::Login)
    }
}
