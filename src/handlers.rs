use crate::{
    AppState,
    auth::{self, AuthUser, CurrentSession},
    error::FormError,
    forms::{self, Resettable},
    guard::{self, LOGIN_PATH, Navigation},
    models::{
        AnalyticsReport, AuthResponse, DashboardCard, DemoAccount, FacultyDashboard,
        FeedbackPage, FeedbackReceipt, FeedbackUpdate, ForgotPasswordPage, ForgotPasswordRequest,
        ForgotPasswordResponse, FormBuilderView, FormDefinition, FormDetailsUpdate, LoginPage,
        LoginRequest, LogoutResponse, NavShell, QuestionUpdate, RegisterPage, RegisterRequest,
        Role, RoleOption, SessionView, StudentDashboard,
    },
    navigation, validation,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;

const DEMO_PASSWORD: &str = "demo123";

// --- Query Structs ---

/// NavigateQuery
///
/// The path being navigated to, for `GET /navigate` and `GET /nav`.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct NavigateQuery {
    /// Path of the page, e.g. `/form`.
    pub path: String,
}

// --- Public Pages & Auth Flows ---

/// login_page
///
/// [Public Route] What the login screen offers: the selectable roles and the demo accounts.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Login page", body = LoginPage))
)]
pub async fn login_page() -> Json<LoginPage> {
    Json(LoginPage {
        roles: role_options(),
        default_role: Role::default(),
        demo_accounts: [
            (Role::Student, "student@example.com"),
            (Role::Faculty, "faculty@example.com"),
        ]
        .into_iter()
        .map(|(role, email)| DemoAccount {
            role,
            email: email.to_string(),
            password: DEMO_PASSWORD.to_string(),
        })
        .collect(),
    })
}

/// login
///
/// [Public Route] Signs in with the chosen role after the simulated round-trip.
/// Any non-empty password is accepted. Both form drafts start over for the new session.
#[utoipa::path(
    post,
    path = "/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Missing field or invalid email", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, FormError> {
    let response = auth::login(&state.sessions, payload, state.config.latency.login).await?;
    reset_forms(&state).await;
    Ok(Json(response))
}

/// register_page
///
/// [Public Route] Roles and the password rules shown under the password field.
#[utoipa::path(
    get,
    path = "/register",
    responses((status = 200, description = "Registration page", body = RegisterPage))
)]
pub async fn register_page() -> Json<RegisterPage> {
    Json(RegisterPage {
        roles: role_options(),
        password_rules: validation::PASSWORD_RULES.to_string(),
    })
}

/// register
///
/// [Public Route] Validates the registration form in order and signs the new user in.
/// The first failing rule is reported; the session is only touched on success.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered and signed in", body = AuthResponse),
        (status = 400, description = "First failing rule", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, FormError> {
    let response = auth::register(&state.sessions, payload, state.config.latency.register).await?;
    reset_forms(&state).await;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/forgot-password",
    responses((status = 200, description = "Forgot password page", body = ForgotPasswordPage))
)]
pub async fn forgot_password_page() -> Json<ForgotPasswordPage> {
    Json(ForgotPasswordPage {
        notice: "This is a UI demo. No actual reset email will be sent.".to_string(),
    })
}

/// forgot_password
///
/// [Public Route] Demo only. Validates the address and answers as if a link went out.
#[utoipa::path(
    post,
    path = "/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset link 'sent'", body = ForgotPasswordResponse),
        (status = 400, description = "Missing or invalid email", body = crate::error::ErrorResponse)
    )
)]
pub async fn forgot_password(
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, FormError> {
    let message = auth::request_password_reset(&payload.email)?;
    Ok(Json(ForgotPasswordResponse { message }))
}

// --- Session & Navigation ---

#[utoipa::path(
    get,
    path = "/session",
    responses((status = 200, description = "Current session", body = SessionView))
)]
pub async fn get_session(CurrentSession(session): CurrentSession) -> Json<SessionView> {
    Json(SessionView::from(&session))
}

/// logout
///
/// Clears the session and both form drafts. No confirmation step.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 200, description = "Signed out", body = LogoutResponse))
)]
pub async fn logout(State(state): State<AppState>) -> Json<LogoutResponse> {
    let redirect = auth::logout(&state.sessions).await;
    reset_forms(&state).await;
    Json(LogoutResponse {
        redirect: redirect.to_string(),
    })
}

/// navigate
///
/// The guard decision for a path, without visiting it.
#[utoipa::path(
    get,
    path = "/navigate",
    params(NavigateQuery),
    responses((status = 200, description = "Render or redirect", body = Navigation))
)]
pub async fn navigate(
    CurrentSession(session): CurrentSession,
    Query(query): Query<NavigateQuery>,
) -> Json<Navigation> {
    Json(guard::resolve(&session, &query.path))
}

/// nav_shell
///
/// The header for the page at `path`, or `null` when no header is shown.
#[utoipa::path(
    get,
    path = "/nav",
    params(NavigateQuery),
    responses((status = 200, description = "Navigation header", body = Option<NavShell>))
)]
pub async fn nav_shell(
    CurrentSession(session): CurrentSession,
    Query(query): Query<NavigateQuery>,
) -> Json<Option<NavShell>> {
    Json(navigation::nav_shell(&session, &query.path))
}

/// unknown_route
///
/// Fallback for every unmatched path: back to the login page.
pub async fn unknown_route() -> Redirect {
    Redirect::to(LOGIN_PATH)
}

// --- Student Routes ---

/// student_dashboard
///
/// [Student Route] Greeting, action cards and the student's current courses.
#[utoipa::path(
    get,
    path = "/student",
    responses(
        (status = 200, description = "Student dashboard", body = StudentDashboard),
        (status = 303, description = "Not signed in as a student")
    )
)]
pub async fn student_dashboard(
    AuthUser { display_name, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<StudentDashboard> {
    Json(StudentDashboard {
        welcome: format!("Welcome Back, {display_name}! 👋"),
        intro: "Here you can submit feedback for your courses and engage with your education."
            .to_string(),
        cards: vec![
            card(
                "Submit Feedback",
                "Share your feedback about recent courses and instructors",
                "Go to Form",
                Some(guard::Page::FeedbackForm.path()),
            ),
            card(
                "My Courses",
                "View all your enrolled courses",
                "View Courses",
                None,
            ),
        ],
        courses: state.catalog.courses().await,
    })
}

/// feedback_page
///
/// [Student Route] Everything the feedback screen shows: choices, draft, errors and phase.
#[utoipa::path(
    get,
    path = "/form",
    responses((status = 200, description = "Feedback form", body = FeedbackPage))
)]
pub async fn feedback_page(State(state): State<AppState>) -> Json<FeedbackPage> {
    Json(load_feedback_page(&state).await)
}

/// update_feedback
///
/// [Student Route] Applies a partial edit to the draft. Refused while a submission is in
/// flight or its success indicator is showing.
#[utoipa::path(
    put,
    path = "/form",
    request_body = FeedbackUpdate,
    responses(
        (status = 200, description = "Updated form", body = FeedbackPage),
        (status = 409, description = "Submission in progress", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_feedback(
    State(state): State<AppState>,
    Json(payload): Json<FeedbackUpdate>,
) -> Result<Json<FeedbackPage>, FormError> {
    state.feedback.lock().await.apply(payload)?;
    Ok(Json(load_feedback_page(&state).await))
}

/// submit_feedback
///
/// [Student Route] Validates every field at once. On success the response arrives after the
/// simulated round-trip and the form empties itself a few seconds later.
#[utoipa::path(
    post,
    path = "/form",
    responses(
        (status = 200, description = "Feedback accepted", body = FeedbackReceipt),
        (status = 400, description = "Field-keyed validation messages", body = crate::error::ErrorResponse),
        (status = 409, description = "Submission in progress", body = crate::error::ErrorResponse)
    )
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
) -> Result<Json<FeedbackReceipt>, FormError> {
    let receipt =
        forms::submit_feedback(&state.feedback, state.catalog.as_ref(), &state.config.latency)
            .await?;
    Ok(Json(receipt))
}

// --- Faculty Routes ---

/// faculty_dashboard
///
/// [Faculty Route] Shortcuts, headline statistics and the latest feedback rows.
#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Faculty dashboard", body = FacultyDashboard),
        (status = 303, description = "Not signed in as faculty")
    )
)]
pub async fn faculty_dashboard(
    AuthUser { display_name, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<FacultyDashboard> {
    let name = if display_name.is_empty() {
        "Faculty".to_string()
    } else {
        display_name
    };

    Json(FacultyDashboard {
        welcome: format!("Welcome Back, {name}! 👋"),
        intro: "Monitor your feedback forms and student responses".to_string(),
        shortcuts: vec![
            card(
                "Create Feedback Form",
                "Design and launch a new feedback form",
                "Create Form",
                Some(guard::Page::FormBuilder.path()),
            ),
            card(
                "View Analytics",
                "Analyze feedback data and trends",
                "View Analytics",
                Some(guard::Page::Analytics.path()),
            ),
        ],
        stats: state.catalog.faculty_stats().await,
        recent_feedback: state.catalog.recent_feedback().await,
    })
}

#[utoipa::path(
    get,
    path = "/create",
    responses((status = 200, description = "Form builder", body = FormBuilderView))
)]
pub async fn form_builder(State(state): State<AppState>) -> Json<FormBuilderView> {
    Json(state.builder.lock().await.view())
}

#[utoipa::path(
    put,
    path = "/create",
    request_body = FormDetailsUpdate,
    responses(
        (status = 200, description = "Updated builder", body = FormBuilderView),
        (status = 409, description = "Form just submitted", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_form_details(
    State(state): State<AppState>,
    Json(payload): Json<FormDetailsUpdate>,
) -> Result<Json<FormBuilderView>, FormError> {
    let mut builder = state.builder.lock().await;
    builder.set_details(payload)?;
    Ok(Json(builder.view()))
}

/// submit_form
///
/// [Faculty Route] Validates the form being built. Blank question slots are dropped from the
/// resulting definition; the builder empties itself after the reset delay.
#[utoipa::path(
    post,
    path = "/create",
    responses(
        (status = 201, description = "Form created", body = FormDefinition),
        (status = 400, description = "Missing title or questions", body = crate::error::ErrorResponse),
        (status = 409, description = "Form just submitted", body = crate::error::ErrorResponse)
    )
)]
pub async fn submit_form(
    AuthUser { display_name, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, FormError> {
    let created_by = if display_name.is_empty() {
        "User".to_string()
    } else {
        display_name
    };

    let definition =
        forms::submit_form(&state.builder, &created_by, state.config.latency.form_reset).await?;
    Ok((StatusCode::CREATED, Json(definition)))
}

#[utoipa::path(
    post,
    path = "/create/questions",
    responses((status = 201, description = "Empty question appended", body = FormBuilderView))
)]
pub async fn add_question(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, FormError> {
    let mut builder = state.builder.lock().await;
    builder.add_question()?;
    Ok((StatusCode::CREATED, Json(builder.view())))
}

/// update_question
///
/// [Faculty Route] Replaces the text of the question at `index` (0-based).
#[utoipa::path(
    put,
    path = "/create/questions/{index}",
    params(("index" = usize, Path, description = "0-based question index")),
    request_body = QuestionUpdate,
    responses(
        (status = 200, description = "Updated builder", body = FormBuilderView),
        (status = 404, description = "No question at index", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_question(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(payload): Json<QuestionUpdate>,
) -> Result<Json<FormBuilderView>, FormError> {
    let mut builder = state.builder.lock().await;
    builder.update_question(index, payload.text)?;
    Ok(Json(builder.view()))
}

/// delete_question
///
/// [Faculty Route] Removes the question at `index`. The last remaining question stays.
#[utoipa::path(
    delete,
    path = "/create/questions/{index}",
    params(("index" = usize, Path, description = "0-based question index")),
    responses(
        (status = 200, description = "Updated builder", body = FormBuilderView),
        (status = 404, description = "No question at index", body = crate::error::ErrorResponse),
        (status = 409, description = "Only one question left", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<FormBuilderView>, FormError> {
    let mut builder = state.builder.lock().await;
    builder.remove_question(index)?;
    Ok(Json(builder.view()))
}

#[utoipa::path(
    get,
    path = "/analytics",
    responses((status = 200, description = "Analytics overview", body = AnalyticsReport))
)]
pub async fn analytics(State(state): State<AppState>) -> Json<AnalyticsReport> {
    Json(state.catalog.analytics().await)
}

// --- Helpers ---

fn role_options() -> Vec<RoleOption> {
    [Role::Student, Role::Faculty]
        .into_iter()
        .map(|role| RoleOption {
            value: role,
            label: role.label().to_string(),
        })
        .collect()
}

fn card(title: &str, description: &str, action_label: &str, target: Option<&str>) -> DashboardCard {
    DashboardCard {
        title: title.to_string(),
        description: description.to_string(),
        action_label: action_label.to_string(),
        target: target.map(str::to_string),
    }
}

async fn load_feedback_page(state: &AppState) -> FeedbackPage {
    let courses = state.catalog.courses().await;
    let faculty = state.catalog.faculty().await;
    let form = state.feedback.lock().await;
    FeedbackPage {
        courses,
        faculty,
        draft: form.draft.clone(),
        errors: form.errors.clone(),
        phase: form.phase,
    }
}

async fn reset_forms(state: &AppState) {
    state.feedback.lock().await.reset();
    state.builder.lock().await.reset();
}
