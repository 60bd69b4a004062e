use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Student Router Module
///
/// Wrapped in the `require_role` layer for `Role::Student`. Anyone else is redirected before a
/// handler runs.
pub fn student_routes() -> Router<AppState> {
    Router::new()
        // GET /student
        .route("/student", get(handlers::student_dashboard))
        // GET/PUT/POST /form
        // Read the feedback screen, edit the draft, submit it.
        .route(
            "/form",
            get(handlers::feedback_page)
                .put(handlers::update_feedback)
                .post(handlers::submit_feedback),
        )
}
