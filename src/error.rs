use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::models::FeedbackField;

/// Field-keyed validation messages for forms that report every problem at once.
pub type FieldErrors = BTreeMap<FeedbackField, String>;

/// FormError
///
/// Every failure a screen can report. All of them are user-input problems that the
/// originating form displays inline; none is fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    /// A required field was left blank. Carries the exact prompt shown to the user.
    #[error("{0}")]
    MissingField(&'static str),

    #[error("Please enter a valid email")]
    InvalidEmail,

    /// Wording of the password-reset screen for the same rule.
    #[error("Please enter a valid email address")]
    InvalidEmailAddress,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Password must contain uppercase, number, and special character")]
    PasswordComplexity,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please add at least one question")]
    NoQuestions,

    /// One message per offending field (missing selections, unrated criteria, blank comments).
    #[error("Please complete the highlighted fields")]
    InvalidFields(FieldErrors),

    #[error("A submission is already in progress")]
    InProgress,

    #[error("A form needs at least one question")]
    LastQuestion,

    #[error("Question {0} does not exist")]
    QuestionNotFound(usize),
}

impl FormError {
    /// Machine-readable code sent alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            FormError::MissingField(_) => "missing_field",
            FormError::InvalidEmail | FormError::InvalidEmailAddress => "invalid_email",
            FormError::PasswordTooShort | FormError::PasswordComplexity => "password_complexity",
            FormError::PasswordMismatch => "password_mismatch",
            FormError::NoQuestions => "no_questions",
            FormError::InvalidFields(_) => "invalid_fields",
            FormError::InProgress => "in_progress",
            FormError::LastQuestion => "last_question",
            FormError::QuestionNotFound(_) => "question_not_found",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            FormError::InProgress | FormError::LastQuestion => StatusCode::CONFLICT,
            FormError::QuestionNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// ErrorResponse
///
/// JSON body of every rejected form action.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub fields: Option<FieldErrors>,
}

impl From<&FormError> for ErrorResponse {
    fn from(err: &FormError) -> Self {
        let fields = match err {
            FormError::InvalidFields(fields) => Some(fields.clone()),
            _ => None,
        };
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            fields,
        }
    }
}

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        tracing::debug!(code = self.code(), "form rejected: {}", self);
        (self.status(), Json(ErrorResponse::from(&self))).into_response()
    }
}
