use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Faculty Router Module
///
/// Wrapped in the `require_role` layer for `Role::Faculty`.
pub fn faculty_routes() -> Router<AppState> {
    Router::new()
        // GET /admin
        .route("/admin", get(handlers::faculty_dashboard))
        // --- Form Builder ---
        // GET/PUT/POST /create
        // Builder state, title/description edits, submit.
        .route(
            "/create",
            get(handlers::form_builder)
                .put(handlers::update_form_details)
                .post(handlers::submit_form),
        )
        // POST /create/questions
        // Appends an empty question slot.
        .route("/create/questions", post(handlers::add_question))
        // PUT/DELETE /create/questions/{index}
        // Indices are 0-based; the last remaining question cannot be deleted.
        .route(
            "/create/questions/{index}",
            put(handlers::update_question).delete(handlers::delete_question),
        )
        // GET /analytics
        .route("/analytics", get(handlers::analytics))
}
