//! Access gate: decides whether a screen may be entered in the current sign-in state.

use super::{AuthState, Session, SessionError};
use std::fmt;
use tracing::debug;

/// Which half of the application a route belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Realm {
    Admin,
    User,
    Public,
}

/// Every screen of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    AdminLogin,
    AdminHome,
    AdminTeachers,
    AdminSubjects,
    AdminSemester { semester: u32, grade: Option<String> },
    UserLogin,
    UserSignup,
    UserDashboard,
    UserSemester { semester: u32, grade: Option<String> },
}

impl Route {
    pub fn realm(&self) -> Realm {
        match self {
            Route::Home => Realm::Public,
            Route::AdminLogin
            | Route::AdminHome
            | Route::AdminTeachers
            | Route::AdminSubjects
            | Route::AdminSemester { .. } => Realm::Admin,
            Route::UserLogin
            | Route::UserSignup
            | Route::UserDashboard
            | Route::UserSemester { .. } => Realm::User,
        }
    }

    /// Login and signup screens.
    pub fn is_auth_page(&self) -> bool {
        matches!(self, Route::AdminLogin | Route::UserLogin | Route::UserSignup)
    }

    /// Screens that need a stored token.
    pub fn is_protected(&self) -> bool {
        !self.is_auth_page() && self.realm() != Realm::Public
    }

    /// Where an anonymous visitor of this route is sent.
    pub fn login_route(&self) -> Route {
        match self.realm() {
            Realm::Admin => Route::AdminLogin,
            _ => Route::UserLogin,
        }
    }

    /// Where a signed-in visitor of an auth page is sent.
    fn landing_route(&self) -> Route {
        match self.realm() {
            Realm::Admin => Route::AdminHome,
            _ => Route::Home,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::AdminLogin => "/admin/auth/login".to_string(),
            Route::AdminHome => "/admin/home".to_string(),
            Route::AdminTeachers => "/admin/teachers".to_string(),
            Route::AdminSubjects => "/admin/subjects".to_string(),
            Route::AdminSemester { semester, grade } => {
                with_grade(format!("/admin/semester/{semester}"), grade)
            }
            Route::UserLogin => "/user/auth/login".to_string(),
            Route::UserSignup => "/user/auth/signup".to_string(),
            Route::UserDashboard => "/user/dashboard".to_string(),
            Route::UserSemester { semester, grade } => {
                with_grade(format!("/user/semester/{semester}"), grade)
            }
        }
    }
}

fn with_grade(path: String, grade: &Option<String>) -> String {
    match grade {
        Some(g) => {
            let grade: String = url::form_urlencoded::byte_serialize(g.as_bytes()).collect();
            format!("{path}?grade={grade}")
        }
        None => path,
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of entering a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Redirect(Route),
}

/// Decides entry for `route` in `state`.
pub fn guard(route: &Route, state: AuthState) -> GateDecision {
    let decision = match state {
        AuthState::Anonymous if route.is_protected() => GateDecision::Redirect(route.login_route()),
        AuthState::Authenticated if route.is_auth_page() => {
            GateDecision::Redirect(route.landing_route())
        }
        _ => GateDecision::Proceed,
    };
    debug!(route = %route, state = ?state, decision = ?decision, "Gate evaluated");
    decision
}

/// Decides entry for `route` from what `session` has stored.
pub fn guard_session(route: &Route, session: &Session) -> Result<GateDecision, SessionError> {
    Ok(guard(route, session.state()?))
}
