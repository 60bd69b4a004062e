use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
    response::IntoResponse,
};
use course_feedback::{
    AppConfig, AppState, DemoCatalog,
    auth::{self, AuthUser, CurrentSession, SessionHandle},
    error::FormError,
    models::{LoginRequest, RegisterRequest, Role, Session, SessionView},
};
use std::{sync::Arc, time::Duration};
use tokio::time::Instant;

// --- Helper Functions ---

fn create_app_state() -> AppState {
    AppState::new(AppConfig::default(), Arc::new(DemoCatalog::new()))
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn login_request(email: &str, password: &str, role: Role) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
        role,
        ..LoginRequest::default()
    }
}

fn registration(password: &str, confirmation: &str) -> RegisterRequest {
    RegisterRequest {
        name: "Ada Lovelace".to_string(),
        identifier: "CS-042".to_string(),
        email: "ada@uni.edu".to_string(),
        password: password.to_string(),
        confirm_password: confirmation.to_string(),
        role: Role::Student,
    }
}

// --- Login ---

#[tokio::test(start_paused = true)]
async fn test_login_signs_in_after_delay() {
    let sessions = SessionHandle::new();
    let start = Instant::now();

    let pending = tokio::spawn({
        let sessions = sessions.clone();
        async move {
            auth::login(
                &sessions,
                login_request("a@b.com", "x", Role::Student),
                Duration::from_millis(1000),
            )
            .await
        }
    });

    // The round-trip has not finished yet.
    tokio::task::yield_now().await;
    assert!(!sessions.current().await.is_authenticated());

    let response = pending.await.unwrap().unwrap();
    assert!(start.elapsed() >= Duration::from_millis(1000));

    assert_eq!(response.redirect, "/student");
    assert_eq!(
        response.session,
        SessionView {
            is_authenticated: true,
            role: Some(Role::Student),
            display_name: "a".to_string(),
            identifier: String::new(),
            email: "a@b.com".to_string(),
        }
    );
    assert_eq!(SessionView::from(&sessions.current().await), response.session);
}

#[tokio::test]
async fn test_login_as_faculty_redirects_to_admin() {
    let sessions = SessionHandle::new();
    let mut req = login_request("prof@uni.edu", "demo123", Role::Faculty);
    req.display_name = Some("Prof. Sarah Johnson".to_string());

    let response = auth::login(&sessions, req, Duration::ZERO).await.unwrap();

    assert_eq!(response.redirect, "/admin");
    assert_eq!(response.session.display_name, "Prof. Sarah Johnson");
    assert_eq!(sessions.current().await.role(), Some(Role::Faculty));
}

#[tokio::test]
async fn test_login_rejects_missing_fields_without_waiting() {
    let sessions = SessionHandle::new();
    let start = Instant::now();

    for (email, password) in [("", "x"), ("a@b.com", "")] {
        let err = auth::login(
            &sessions,
            login_request(email, password, Role::Student),
            Duration::from_secs(60),
        )
        .await
        .unwrap_err();
        assert_eq!(err, FormError::MissingField("Please fill in all fields"));
    }

    assert!(start.elapsed() < Duration::from_secs(60));
    assert_eq!(sessions.current().await, Session::Unauthenticated);
}

#[tokio::test]
async fn test_login_whitespace_email_is_invalid_not_missing() {
    let sessions = SessionHandle::new();
    let err = auth::login(
        &sessions,
        login_request("   ", "x", Role::Student),
        Duration::ZERO,
    )
    .await
    .unwrap_err();

    assert_eq!(err, FormError::InvalidEmail);
    assert_eq!(err.to_string(), "Please enter a valid email");
}

#[tokio::test]
async fn test_login_rejects_email_without_at_sign() {
    let sessions = SessionHandle::new();
    let err = auth::login(
        &sessions,
        login_request("student.example.com", "x", Role::Student),
        Duration::ZERO,
    )
    .await
    .unwrap_err();

    assert_eq!(err, FormError::InvalidEmail);
    assert!(!sessions.current().await.is_authenticated());
}

// --- Registration ---

#[tokio::test]
async fn test_registration_weak_password_fails_immediately() {
    let sessions = SessionHandle::new();
    let start = Instant::now();

    let err = auth::register(
        &sessions,
        registration("abc123", "abc123"),
        Duration::from_secs(60),
    )
    .await
    .unwrap_err();

    assert_eq!(err, FormError::PasswordComplexity);
    assert_eq!(
        err.to_string(),
        "Password must contain uppercase, number, and special character"
    );
    assert!(start.elapsed() < Duration::from_secs(60));
    assert_eq!(sessions.current().await, Session::Unauthenticated);
}

#[test]
fn test_registration_rules_apply_in_order() {
    let mut req = registration("Ab1!", "nope");
    req.name = " ".to_string();
    req.identifier = String::new();
    req.email = "invalid".to_string();
    assert_eq!(
        auth::check_registration(&req),
        Err(FormError::MissingField("Please enter your name"))
    );

    req.name = "Ada".to_string();
    assert_eq!(
        auth::check_registration(&req),
        Err(FormError::MissingField("Please enter your ID/Roll number"))
    );

    req.identifier = "CS-042".to_string();
    assert_eq!(auth::check_registration(&req), Err(FormError::InvalidEmail));

    req.email = "ada@uni.edu".to_string();
    assert_eq!(
        auth::check_registration(&req),
        Err(FormError::PasswordTooShort)
    );

    req.password = "abcdef".to_string();
    assert_eq!(
        auth::check_registration(&req),
        Err(FormError::PasswordComplexity)
    );

    req.password = "Abcde1!".to_string();
    assert_eq!(
        auth::check_registration(&req),
        Err(FormError::PasswordMismatch)
    );

    req.confirm_password = "Abcde1!".to_string();
    let identity = auth::check_registration(&req).unwrap();
    assert_eq!(identity.display_name, "Ada");
    assert_eq!(identity.identifier, "CS-042");
}

#[tokio::test(start_paused = true)]
async fn test_registration_signs_new_user_in() {
    let sessions = SessionHandle::new();
    let mut req = registration("Secret1!", "Secret1!");
    req.role = Role::Faculty;

    let response = auth::register(&sessions, req, Duration::from_millis(1000))
        .await
        .unwrap();

    assert_eq!(response.redirect, "/admin");
    let session = sessions.current().await;
    let identity = session.identity().unwrap();
    assert_eq!(identity.display_name, "Ada Lovelace");
    assert_eq!(identity.identifier, "CS-042");
    assert_eq!(identity.email, "ada@uni.edu");
}

// --- Logout & Password Reset ---

#[tokio::test]
async fn test_logout_clears_session() {
    let sessions = SessionHandle::new();
    auth::login(
        &sessions,
        login_request("a@b.com", "x", Role::Student),
        Duration::ZERO,
    )
    .await
    .unwrap();

    let redirect = auth::logout(&sessions).await;

    assert_eq!(redirect, "/");
    assert_eq!(sessions.current().await, Session::Unauthenticated);
}

#[test]
fn test_password_reset_demo_messages() {
    assert_eq!(
        auth::request_password_reset(""),
        Err(FormError::MissingField("Please enter your email"))
    );
    assert_eq!(
        auth::request_password_reset("  "),
        Err(FormError::InvalidEmailAddress)
    );

    let err = auth::request_password_reset("nobody").unwrap_err();
    assert_eq!(err, FormError::InvalidEmailAddress);
    assert_eq!(err.to_string(), "Please enter a valid email address");
    assert_eq!(err.code(), "invalid_email");
    assert_eq!(
        auth::request_password_reset("ada@uni.edu").unwrap(),
        "Password reset link sent to ada@uni.edu (Demo - No backend)"
    );
}

// --- Extractors ---

#[tokio::test]
async fn test_auth_user_redirects_when_signed_out() {
    let app_state = create_app_state();
    let mut parts = get_request_parts(Method::GET, "/student".parse().unwrap());

    let rejection = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap_err()
        .into_response();

    assert_eq!(rejection.status(), StatusCode::SEE_OTHER);
    assert_eq!(rejection.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn test_auth_user_resolves_signed_in_identity() {
    let app_state = create_app_state();
    auth::login(
        &app_state.sessions,
        login_request("faculty@example.com", "demo123", Role::Faculty),
        Duration::ZERO,
    )
    .await
    .unwrap();

    let mut parts = get_request_parts(Method::GET, "/admin".parse().unwrap());
    let user = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();

    assert_eq!(user.role, Role::Faculty);
    assert_eq!(user.display_name, "faculty");
    assert_eq!(user.email, "faculty@example.com");
}

#[tokio::test]
async fn test_current_session_never_rejects() {
    let app_state = create_app_state();
    let mut parts = get_request_parts(Method::GET, "/session".parse().unwrap());

    let CurrentSession(session) = CurrentSession::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();

    assert_eq!(session, Session::Unauthenticated);
}
