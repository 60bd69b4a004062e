use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::FieldErrors;

// --- Identity & Session ---

/// Role
///
/// The two kinds of account. A role decides which screens and navigation links are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Role {
    #[default]
    Student,
    Faculty,
}

impl Role {
    /// The landing page of this role.
    pub fn home_path(self) -> &'static str {
        match self {
            Role::Student => "/student",
            Role::Faculty => "/admin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Faculty => "Faculty",
        }
    }
}

/// Identity
///
/// Who is signed in. Only exists inside `Session::Authenticated`, so a role can never be
/// attached to a signed-out session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub role: Role,
    pub display_name: String,
    pub identifier: String,
    pub email: String,
}

/// Session
///
/// The single in-memory authentication record of the application. Replaced wholesale on
/// login/registration and cleared wholesale on logout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Unauthenticated,
    Authenticated(Identity),
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|identity| identity.role)
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Authenticated(identity) => Some(identity),
            Session::Unauthenticated => None,
        }
    }
}

/// SessionView
///
/// Wire shape of the session as the client sees it (GET /session and every auth response).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionView {
    pub is_authenticated: bool,
    pub role: Option<Role>,
    pub display_name: String,
    pub identifier: String,
    pub email: String,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        match session {
            Session::Unauthenticated => SessionView::default(),
            Session::Authenticated(identity) => SessionView {
                is_authenticated: true,
                role: Some(identity.role),
                display_name: identity.display_name.clone(),
                identifier: identity.identifier.clone(),
                email: identity.email.clone(),
            },
        }
    }
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Input payload for POST /. The password is only checked for presence; it is never logged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LoginRequest {
    #[schema(example = "student@example.com")]
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    /// Falls back to the local part of the email when absent or blank.
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
}

/// RegisterRequest
///
/// Input payload for POST /register.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegisterRequest {
    pub name: String,
    /// Student ID or roll number.
    pub identifier: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

// --- Auth Responses ---

/// AuthResponse
///
/// Answer to a successful login or registration: the new session and where to go next.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AuthResponse {
    pub session: SessionView,
    pub redirect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LogoutResponse {
    pub redirect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ForgotPasswordResponse {
    pub message: String,
}

// --- Public Pages ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RoleOption {
    pub value: Role,
    pub label: String,
}

/// DemoAccount
///
/// Credentials advertised on the login page. Any non-empty password works, these are hints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DemoAccount {
    pub role: Role,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LoginPage {
    pub roles: Vec<RoleOption>,
    pub default_role: Role,
    pub demo_accounts: Vec<DemoAccount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegisterPage {
    pub roles: Vec<RoleOption>,
    pub password_rules: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ForgotPasswordPage {
    pub notice: String,
}

// --- Catalog (Sample Data) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub enum CourseStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Course {
    pub id: u32,
    pub name: String,
    pub instructor: String,
    pub status: CourseStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct FacultyMember {
    pub id: u32,
    pub name: String,
}

/// RatingBand
///
/// Colour band a dashboard uses for an average rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum RatingBand {
    Success,
    Info,
    Warning,
    Error,
}

impl RatingBand {
    pub fn for_rating(rating: f32) -> Self {
        if rating >= 4.5 {
            RatingBand::Success
        } else if rating >= 4.0 {
            RatingBand::Info
        } else if rating >= 3.0 {
            RatingBand::Warning
        } else {
            RatingBand::Error
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RecentFeedback {
    pub id: u32,
    pub student: String,
    pub course: String,
    pub rating: f32,
    #[ts(type = "string")]
    pub date: NaiveDate,
    pub band: RatingBand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct StatCard {
    pub title: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ChartPlaceholder {
    pub title: String,
    pub note: String,
}

/// DashboardCard
///
/// A call-to-action tile. `target` is the path it navigates to, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardCard {
    pub title: String,
    pub description: String,
    pub action_label: String,
    pub target: Option<String>,
}

// --- Dashboards ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct StudentDashboard {
    pub welcome: String,
    pub intro: String,
    pub cards: Vec<DashboardCard>,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FacultyDashboard {
    pub welcome: String,
    pub intro: String,
    pub shortcuts: Vec<DashboardCard>,
    pub stats: Vec<StatCard>,
    pub recent_feedback: Vec<RecentFeedback>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AnalyticsReport {
    pub cards: Vec<StatCard>,
    pub charts: Vec<ChartPlaceholder>,
}

// --- Feedback Form ---

/// FormPhase
///
/// `Submitting` is the loading flag, `Submitted` is the success indicator. Actions are only
/// accepted while `Editing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting,
    Submitted,
}

/// FeedbackField
///
/// The keys of the feedback form, used to attach validation messages to individual fields.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, ToSchema,
)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum FeedbackField {
    Course,
    Faculty,
    TeachingQuality,
    CourseContent,
    Communication,
    OverallSatisfaction,
    Comments,
}

/// FeedbackDraft
///
/// The feedback form as currently filled in. A rating of 0 means "not rated".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FeedbackDraft {
    pub course: Option<u32>,
    pub faculty: Option<u32>,
    pub teaching_quality: u8,
    pub course_content: u8,
    pub communication: u8,
    pub overall_satisfaction: u8,
    pub comments: String,
}

/// FeedbackUpdate
///
/// Partial edit of the draft (PUT /form). Only the provided fields change.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FeedbackUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teaching_quality: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_content: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_satisfaction: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// FeedbackSubmission
///
/// A draft that passed validation, with its selections resolved against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackSubmission {
    pub course: Course,
    pub faculty: FacultyMember,
    pub teaching_quality: u8,
    pub course_content: u8,
    pub communication: u8,
    pub overall_satisfaction: u8,
    pub comments: String,
}

/// FeedbackReceipt
///
/// Returned once a submission has "gone through". Nothing is stored.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FeedbackReceipt {
    pub id: Uuid,
    pub course: String,
    pub faculty: String,
    #[ts(type = "string")]
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct FeedbackPage {
    pub courses: Vec<Course>,
    pub faculty: Vec<FacultyMember>,
    pub draft: FeedbackDraft,
    #[schema(value_type = Object)]
    pub errors: FieldErrors,
    pub phase: FormPhase,
}

// --- Form Builder ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct FormDetailsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct QuestionUpdate {
    pub text: String,
}

/// FormBuilderView
///
/// The builder as the faculty member sees it. `canDelete` is false when a single question
/// remains, so no delete control is offered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FormBuilderView {
    pub title: String,
    pub description: String,
    pub questions: Vec<String>,
    pub can_delete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub phase: FormPhase,
}

/// FormDefinition
///
/// A validated feedback form. Only the non-blank questions are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FormDefinition {
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<String>,
    pub created_by: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Navigation Shell ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavLink {
    pub label: String,
    pub path: String,
}

/// NavShell
///
/// Header contents for a signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NavShell {
    /// Where the logo takes the user.
    pub home: String,
    pub links: Vec<NavLink>,
    pub display_name: String,
    pub role_label: String,
    pub initials: String,
}
