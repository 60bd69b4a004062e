/// Router Module Index
///
/// Splits the endpoints by the role a session needs to reach them. The guard is applied per
/// module (as a route layer in `create_router`), so a protected endpoint cannot be exposed by
/// registering it in the wrong place.

/// Routes open to everyone: login, registration, password reset and the session endpoints.
pub mod public;

/// Routes that render only for a signed-in STUDENT.
pub mod student;

/// Routes that render only for a signed-in FACULTY member.
pub mod faculty;
