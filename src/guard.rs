use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    auth::SessionHandle,
    models::{Role, Session},
};

pub const LOGIN_PATH: &str = "/";

/// Navigation
///
/// Outcome of guarding a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(tag = "action", rename_all = "lowercase")]
#[ts(export)]
pub enum Navigation {
    Render,
    Redirect { to: String },
}

impl Navigation {
    fn redirect(to: &str) -> Self {
        Navigation::Redirect { to: to.to_string() }
    }
}

/// Page
///
/// Every screen of the application, keyed by its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Register,
    ForgotPassword,
    StudentDashboard,
    FeedbackForm,
    FacultyDashboard,
    FormBuilder,
    Analytics,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Login,
        Page::Register,
        Page::ForgotPassword,
        Page::StudentDashboard,
        Page::FeedbackForm,
        Page::FacultyDashboard,
        Page::FormBuilder,
        Page::Analytics,
    ];

    /// Looks a page up by path. The builder's question endpoints (`/create/questions`,
    /// `/create/questions/2`) belong to the builder page; any other sub-path is unknown.
    pub fn from_path(path: &str) -> Option<Page> {
        if !path.starts_with('/') || path.contains("//") {
            return None;
        }
        let trimmed = match path.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => path,
        };
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        match segments.as_slice() {
            [""] => Some(Page::Login),
            ["register"] => Some(Page::Register),
            ["forgot-password"] => Some(Page::ForgotPassword),
            ["student"] => Some(Page::StudentDashboard),
            ["form"] => Some(Page::FeedbackForm),
            ["admin"] => Some(Page::FacultyDashboard),
            ["analytics"] => Some(Page::Analytics),
            ["create"] | ["create", "questions"] => Some(Page::FormBuilder),
            ["create", "questions", index] if index.parse::<usize>().is_ok() => {
                Some(Page::FormBuilder)
            }
            _ => None,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Page::Login => LOGIN_PATH,
            Page::Register => "/register",
            Page::ForgotPassword => "/forgot-password",
            Page::StudentDashboard => "/student",
            Page::FeedbackForm => "/form",
            Page::FacultyDashboard => "/admin",
            Page::FormBuilder => "/create",
            Page::Analytics => "/analytics",
        }
    }

    /// `None` for public pages.
    pub fn required_role(self) -> Option<Role> {
        match self {
            Page::Login | Page::Register | Page::ForgotPassword => None,
            Page::StudentDashboard | Page::FeedbackForm => Some(Role::Student),
            Page::FacultyDashboard | Page::FormBuilder | Page::Analytics => Some(Role::Faculty),
        }
    }
}

/// evaluate
///
/// The guard itself, as a plain value so it can be tested without a router. Signed-out sessions go to the login page; a role mismatch goes to the home
/// page of the role the route asks for; everything else renders.
pub fn evaluate(session: &Session, required: Option<Role>) -> Navigation {
    let Some(current) = session.role() else {
        return Navigation::redirect(LOGIN_PATH);
    };
    match required {
        Some(required) if required != current => Navigation::redirect(required.home_path()),
        _ => Navigation::Render,
    }
}

/// resolve
///
/// Guards a navigation to `path`. Unknown paths go to the login page. If the guard points at a
/// page the session could not open either, the session's own home page is used instead, so
/// following redirects always terminates.
pub fn resolve(session: &Session, path: &str) -> Navigation {
    let Some(page) = Page::from_path(path) else {
        return Navigation::redirect(LOGIN_PATH);
    };
    if page.required_role().is_none() {
        return Navigation::Render;
    }

    match evaluate(session, page.required_role()) {
        Navigation::Redirect { to } => {
            let target_renders = Page::from_path(&to)
                .map(|target| match target.required_role() {
                    None => true,
                    required => required == session.role(),
                })
                .unwrap_or(false);
            match session.role() {
                Some(role) if !target_renders => Navigation::redirect(role.home_path()),
                _ => Navigation::Redirect { to },
            }
        }
        Navigation::Render => Navigation::Render,
    }
}

/// RoleGate
///
/// State of the `require_role` middleware: where to read the session and which role to demand.
#[derive(Clone)]
pub struct RoleGate {
    pub sessions: SessionHandle,
    pub role: Role,
}

impl RoleGate {
    pub fn new(sessions: SessionHandle, role: Role) -> Self {
        Self { sessions, role }
    }
}

/// require_role
///
/// Middleware enforcing the guard for a whole router. Requests that may not render are answered
/// with `303 See Other` pointing at the resolved target.
pub async fn require_role(
    State(gate): State<RoleGate>,
    request: Request,
    next: Next,
) -> Response {
    let session = gate.sessions.current().await;

    let decision = match evaluate(&session, Some(gate.role)) {
        Navigation::Render => Navigation::Render,
        Navigation::Redirect { .. } => resolve(&session, request.uri().path()),
    };

    match decision {
        Navigation::Render => next.run(request).await,
        Navigation::Redirect { to } => {
            tracing::debug!(path = %request.uri().path(), to = %to, "route guard redirect");
            Redirect::to(&to).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_paths_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_path(page.path()), Some(page));
        }
    }

    #[test]
    fn test_sub_resources_and_unknown_paths() {
        assert_eq!(Page::from_path("/create/questions/3"), Some(Page::FormBuilder));
        assert_eq!(Page::from_path("/student/"), Some(Page::StudentDashboard));
        assert_eq!(Page::from_path("/student/extra"), None);
        assert_eq!(Page::from_path("/nowhere"), None);
        assert_eq!(Page::from_path("/create/questions"), Some(Page::FormBuilder));
        assert_eq!(Page::from_path("/create/bogus"), None);
        assert_eq!(Page::from_path("/create/questions/x"), None);
        assert_eq!(Page::from_path("/create/questions/1/extra"), None);
        assert_eq!(Page::from_path(""), None);
        assert_eq!(Page::from_path("//"), None);
    }
}
