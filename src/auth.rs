use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::Redirect,
};
use tokio::sync::RwLock;

use crate::{
    error::FormError,
    guard::LOGIN_PATH,
    models::{AuthResponse, Identity, LoginRequest, RegisterRequest, Role, Session, SessionView},
    validation,
};

/// SessionHandle
///
/// Shared ownership of the application's single `Session`. Many handlers read it; only the
/// login, registration and logout flows write it, always by replacing the whole value.
#[derive(Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the current session.
    pub async fn current(&self) -> Session {
        self.inner.read().await.clone()
    }

    pub async fn replace(&self, session: Session) {
        *self.inner.write().await = session;
    }

    pub async fn clear(&self) {
        self.replace(Session::Unauthenticated).await;
    }
}

/// CurrentSession Extractor
///
/// Hands a handler the session as it is right now, signed in or not. Never rejects.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    SessionHandle: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionHandle::from_ref(state);
        Ok(CurrentSession(sessions.current().await))
    }
}

/// AuthUser Extractor
///
/// The signed-in identity. Handlers behind the role gate use it to personalise their pages;
/// if nobody is signed in the request is sent back to the login page.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub role: Role,
    pub display_name: String,
    pub identifier: String,
    pub email: String,
}

impl From<Identity> for AuthUser {
    fn from(identity: Identity) -> Self {
        Self {
            role: identity.role,
            display_name: identity.display_name,
            identifier: identity.identifier,
            email: identity.email,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SessionHandle: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionHandle::from_ref(state);
        match sessions.current().await {
            Session::Authenticated(identity) => Ok(identity.into()),
            Session::Unauthenticated => Err(Redirect::to(LOGIN_PATH)),
        }
    }
}

// --- Flows ---

/// check_login
///
/// Validates a login attempt and builds the identity it would sign in. There is no credential
/// store: any non-empty password is accepted.
pub fn check_login(req: &LoginRequest) -> Result<Identity, FormError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(FormError::MissingField("Please fill in all fields"));
    }
    validation::validate_email(&req.email)?;
    let email = req.email.trim();

    let display_name = req
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| local_part(email).to_string());

    Ok(Identity {
        role: req.role,
        display_name,
        identifier: req.identifier.as_deref().unwrap_or_default().trim().to_string(),
        email: email.to_string(),
    })
}

/// login
///
/// Runs the login flow: validate, wait out the simulated round-trip, then replace the session.
/// Validation failures return immediately and leave the session untouched.
pub async fn login(
    sessions: &SessionHandle,
    req: LoginRequest,
    delay: Duration,
) -> Result<AuthResponse, FormError> {
    let identity = check_login(&req)?;

    tokio::time::sleep(delay).await;

    tracing::info!(email = %identity.email, role = ?identity.role, "login accepted");
    Ok(sign_in(sessions, identity).await)
}

/// check_registration
///
/// Applies the registration rules in order and stops at the first one that fails.
pub fn check_registration(req: &RegisterRequest) -> Result<Identity, FormError> {
    validation::validate_required(&req.name, "Please enter your name")?;
    validation::validate_required(&req.identifier, "Please enter your ID/Roll number")?;
    validation::validate_email(&req.email)?;
    validation::validate_password_length(&req.password)?;
    validation::validate_password_complexity(&req.password)?;
    validation::validate_password_match(&req.password, &req.confirm_password)?;

    Ok(Identity {
        role: req.role,
        display_name: req.name.trim().to_string(),
        identifier: req.identifier.trim().to_string(),
        email: req.email.trim().to_string(),
    })
}

/// register
///
/// Runs the registration flow. A successful registration signs the new user in directly.
pub async fn register(
    sessions: &SessionHandle,
    req: RegisterRequest,
    delay: Duration,
) -> Result<AuthResponse, FormError> {
    let identity = check_registration(&req)?;

    tokio::time::sleep(delay).await;

    tracing::info!(
        email = %identity.email,
        identifier = %identity.identifier,
        role = ?identity.role,
        "registration accepted"
    );
    Ok(sign_in(sessions, identity).await)
}

/// logout
///
/// Drops the session. Returns the path the client should go to.
pub async fn logout(sessions: &SessionHandle) -> &'static str {
    if let Some(identity) = sessions.current().await.identity() {
        tracing::info!(email = %identity.email, "logged out");
    }
    sessions.clear().await;
    LOGIN_PATH
}

/// request_password_reset
///
/// Demo only: validates the address and reports that a link was sent. Nothing is sent.
pub fn request_password_reset(email: &str) -> Result<String, FormError> {
    if email.is_empty() {
        return Err(FormError::MissingField("Please enter your email"));
    }
    validation::validate_email(email).map_err(|_| FormError::InvalidEmailAddress)?;
    let email = email.trim();

    tracing::info!(email = %email, "password reset requested (demo)");
    Ok(format!(
        "Password reset link sent to {email} (Demo - No backend)"
    ))
}

async fn sign_in(sessions: &SessionHandle, identity: Identity) -> AuthResponse {
    let redirect = identity.role.home_path().to_string();
    let session = Session::Authenticated(identity);
    let view = SessionView::from(&session);
    sessions.replace(session).await;
    AuthResponse {
        session: view,
        redirect,
    }
}

fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
