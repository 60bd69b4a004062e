use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Domain logic. None of these depend on axum routing.
pub mod catalog;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod navigation;
pub mod validation;

// Session handling, the route guard and the HTTP surface.
pub mod auth;
pub mod guard;
pub mod handlers;
pub mod routes;
use routes::{faculty, public, student};

// --- Public Re-exports ---

pub use auth::SessionHandle;
pub use catalog::{CatalogState, DemoCatalog};
pub use config::AppConfig;
pub use forms::{FeedbackFormHandle, FormBuilderHandle};

use guard::RoleGate;
use models::Role;

/// ApiDoc
///
/// OpenAPI document for every endpoint and wire model, served at `/api-docs/openapi.json`
/// and browsable under `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login_page, handlers::login, handlers::register_page, handlers::register,
        handlers::forgot_password_page, handlers::forgot_password, handlers::get_session,
        handlers::logout, handlers::navigate, handlers::nav_shell,
        handlers::student_dashboard, handlers::feedback_page, handlers::update_feedback,
        handlers::submit_feedback, handlers::faculty_dashboard, handlers::form_builder,
        handlers::update_form_details, handlers::submit_form, handlers::add_question,
        handlers::update_question, handlers::delete_question, handlers::analytics
    ),
    components(
        schemas(
            models::Role, models::SessionView, models::LoginRequest, models::RegisterRequest,
            models::ForgotPasswordRequest, models::AuthResponse, models::LogoutResponse,
            models::ForgotPasswordResponse, models::LoginPage, models::RegisterPage,
            models::ForgotPasswordPage, models::RoleOption, models::DemoAccount,
            models::Course, models::CourseStatus, models::FacultyMember, models::RatingBand,
            models::RecentFeedback, models::StatCard, models::ChartPlaceholder,
            models::DashboardCard, models::StudentDashboard, models::FacultyDashboard,
            models::AnalyticsReport, models::FormPhase, models::FeedbackField,
            models::FeedbackDraft, models::FeedbackUpdate, models::FeedbackReceipt,
            models::FeedbackPage, models::FormDetailsUpdate, models::QuestionUpdate,
            models::FormBuilderView, models::FormDefinition, models::NavLink, models::NavShell,
            guard::Navigation, error::ErrorResponse,
        )
    ),
    tags(
        (name = "course-feedback", description = "Course Feedback Portal API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Everything the handlers share. All fields are cheap clones of `Arc`s, so Axum can hand a
/// copy to every request.
#[derive(Clone)]
pub struct AppState {
    /// The one session of this process.
    pub sessions: SessionHandle,
    /// Sample data shown on the screens.
    pub catalog: CatalogState,
    /// The student's feedback draft.
    pub feedback: FeedbackFormHandle,
    /// The faculty member's form under construction.
    pub builder: FormBuilderHandle,
    pub config: AppConfig,
}

impl AppState {
    /// A signed-out state with empty forms.
    pub fn new(config: AppConfig, catalog: CatalogState) -> Self {
        Self {
            sessions: SessionHandle::new(),
            catalog,
            feedback: Arc::default(),
            builder: Arc::default(),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for SessionHandle {
    fn from_ref(app_state: &AppState) -> SessionHandle {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for CatalogState {
    fn from_ref(app_state: &AppState) -> CatalogState {
        app_state.catalog.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, puts the role guard in front of the student and faculty
/// routers, and applies the request-id, tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let student_gate = RoleGate::new(state.sessions.clone(), Role::Student);
    let faculty_gate = RoleGate::new(state.sessions.clone(), Role::Faculty);

    // 2. Base Router Assembly
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        // `route_layer` only runs the guard for matched routes, so unknown paths still reach
        // the fallback below.
        .merge(
            student::student_routes().route_layer(middleware::from_fn_with_state(
                student_gate,
                guard::require_role,
            )),
        )
        .merge(
            faculty::faculty_routes().route_layer(middleware::from_fn_with_state(
                faculty_gate,
                guard::require_role,
            )),
        )
        .fallback(handlers::unknown_route)
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one request, carrying the method, URI and the `x-request-id` set by the layer
/// above, so every log line of a request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
