//! Auth API errors.

use thiserror::Error;

/// Errors surfaced by the external Auth/Profile/Account collaborators.
///
/// These propagate to the caller from `login`, `register`, `update_profile`
/// and `delete_account`; background reconciliation absorbs them instead.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid credentials provided.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The access token was missing, expired, or rejected.
    #[error("unauthorized")]
    Unauthorized,

    /// The request never reached the server, or the response never arrived.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with an error status.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The request was rejected as invalid.
    #[error("validation error: {0}")]
    Validation(String),
}

impl ApiError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::InvalidCredentials | ApiError::Unauthorized)
    }
}
