use crate::router::{AuthState, Route, home_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Go(Route),
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub action: NavAction,
    pub active: bool,
}

/// Links for the top bar. The active flag follows `current`.
pub fn nav_links(auth: &AuthState, current: Route) -> Vec<NavLink> {
    let link = |label, route: Route| NavLink {
        label,
        action: NavAction::Go(route),
        active: route == current,
    };

    match auth.role() {
        None => vec![link("Login", Route::Login), link("Get Started", Route::Register)],
        Some(role) => vec![
            link("Dashboard", home_for(role)),
            NavLink {
                label: "Logout",
                action: NavAction::Logout,
                active: false,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Session;
    use shared::types::Role;

    #[test]
    fn anonymous_links() {
        let links = nav_links(&AuthState::Anonymous, Route::Register);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].label, "Login");
        assert!(!links[0].active);
        assert_eq!(links[1].action, NavAction::Go(Route::Register));
        assert!(links[1].active);
    }

    #[test]
    fn teacher_dashboard_points_home() {
        let auth = AuthState::Teacher(Session {
            subject: "t".into(),
            role: Role::Teacher,
            role_defaulted: false,
            expires_at: None,
        });
        let links = nav_links(&auth, Route::Teacher);
        assert_eq!(links[0].action, NavAction::Go(Route::Teacher));
        assert!(links[0].active);
        assert_eq!(links[1].action, NavAction::Logout);
    }
}
