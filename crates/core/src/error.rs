//! Domain error taxonomy shared by every service in the workspace.
//!
//! Feature-level errors (`AuthError`, `ReservationError`, ...) convert into
//! [`CoreError`] so the transport layer maps a single closed set of kinds to
//! protocol status codes.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The access token has expired; the caller should use the refresh flow.
    #[error("Token timed out")]
    TokenTimedOut,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
