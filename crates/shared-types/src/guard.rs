//! Role-based route guard and the navigation menu.

use serde::{Deserialize, Serialize};

use crate::models::{AuthUser, UserRole};
use crate::session::Session;

/// Every screen of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Home,
    Login,
    Register,
    CitizenDashboard,
    FileFir,
    StatusCheck,
    Profile,
    PoliceDashboard,
    FirManagement,
    Analytics,
}

/// Who may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any signed-in user.
    Authenticated,
    Role(UserRole),
}

impl Route {
    pub const ALL: [Route; 10] = [
        Route::Home,
        Route::Login,
        Route::Register,
        Route::CitizenDashboard,
        Route::FileFir,
        Route::StatusCheck,
        Route::Profile,
        Route::PoliceDashboard,
        Route::FirManagement,
        Route::Analytics,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::CitizenDashboard => "/citizen",
            Route::FileFir => "/citizen/file-fir",
            Route::StatusCheck => "/citizen/status",
            Route::Profile => "/profile",
            Route::PoliceDashboard => "/police",
            Route::FirManagement => "/police/fir-management",
            Route::Analytics => "/police/analytics",
        }
    }

    /// Look up a route by path. A trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Self::ALL.into_iter().find(|r| r.path() == path)
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Home | Route::Login | Route::Register => Access::Public,
            Route::Profile => Access::Authenticated,
            Route::CitizenDashboard | Route::FileFir | Route::StatusCheck => {
                Access::Role(UserRole::Citizen)
            }
            Route::PoliceDashboard | Route::FirManagement | Route::Analytics => {
                Access::Role(UserRole::Responder)
            }
        }
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session is still being restored.
    Loading,
    Allow,
    /// Not signed in. `from` is the path to return to after login.
    RedirectToLogin { from: String },
    Redirect(Route),
}

/// Dashboard a user lands on after login or a role mismatch.
pub fn landing_route(role: UserRole) -> Route {
    match role {
        UserRole::Citizen => Route::CitizenDashboard,
        UserRole::Responder => Route::PoliceDashboard,
    }
}

pub fn guard(session: &Session, route: Route) -> GuardDecision {
    let access = route.access();
    if access == Access::Public {
        return GuardDecision::Allow;
    }
    if session.is_loading() {
        return GuardDecision::Loading;
    }
    let Some(user) = session.user() else {
        return GuardDecision::RedirectToLogin {
            from: route.path().to_string(),
        };
    };
    match access {
        Access::Role(required) if user.role != required => {
            GuardDecision::Redirect(landing_route(user.role))
        }
        _ => GuardDecision::Allow,
    }
}

/// Where to send the user after a successful login: back to the page that
/// bounced them, if their role may open it, else their dashboard.
pub fn post_login_route(from: Option<&str>, role: UserRole) -> Route {
    from.and_then(Route::from_path)
        .filter(|r| match r.access() {
            Access::Public => false,
            Access::Authenticated => true,
            Access::Role(required) => required == role,
        })
        .unwrap_or_else(|| landing_route(role))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub route: Route,
}

impl MenuItem {
    /// Dashboards highlight only on an exact match; other entries also
    /// highlight on their sub-paths.
    pub fn is_active(&self, current_path: &str) -> bool {
        let path = self.route.path();
        match self.route {
            Route::CitizenDashboard | Route::PoliceDashboard => current_path == path,
            _ => {
                current_path == path
                    || current_path
                        .strip_prefix(path)
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

/// Navigation entries for the signed-in user. Empty when signed out.
pub fn menu_for(user: Option<&AuthUser>) -> Vec<MenuItem> {
    let item = |label, route| MenuItem { label, route };
    match user.map(|u| u.role) {
        Some(UserRole::Citizen) => vec![
            item("Dashboard", Route::CitizenDashboard),
            item("File FIR", Route::FileFir),
            item("Track Status", Route::StatusCheck),
        ],
        Some(UserRole::Responder) => vec![
            item("Dashboard", Route::PoliceDashboard),
            item("FIR Management", Route::FirManagement),
            item("Analytics", Route::Analytics),
        ],
        None => Vec::new(),
    }
}
