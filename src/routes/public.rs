use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a session. A signed-in user may still visit them; the login
/// page does not bounce an authenticated session.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness check, answers "ok".
        .route("/health", get(|| async { "ok" }))
        // GET/POST /
        // The login page and the login action.
        .route("/", get(handlers::login_page).post(handlers::login))
        // GET/POST /register
        .route(
            "/register",
            get(handlers::register_page).post(handlers::register),
        )
        // GET/POST /forgot-password
        // Demo only, nothing is sent.
        .route(
            "/forgot-password",
            get(handlers::forgot_password_page).post(handlers::forgot_password),
        )
        // --- Session ---
        .route("/session", get(handlers::get_session))
        .route("/logout", post(handlers::logout))
        // GET /navigate?path=...
        // The guard decision for a path, so a client can route without a round-trip per page.
        .route("/navigate", get(handlers::navigate))
        // GET /nav?path=...
        // The header model, or null where no header is shown.
        .route("/nav", get(handlers::nav_shell))
}
