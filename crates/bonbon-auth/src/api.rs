//! External collaborator contracts.
//!
//! The session store consumes the storefront's REST API through these narrow
//! request/response traits. Implementations live with the HTTP layer; tests
//! provide mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::user::User;

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The authenticated user's profile.
    pub user: User,
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Token used to renew the access token.
    pub refresh_token: String,
}

/// Registration request.
///
/// Registration does not log the user in; the backend requires email
/// verification before the first login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Password reset request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// A human-readable acknowledgement from the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

/// Partial profile edit. `None` fields are left untouched by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Authentication endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a session.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// Create an account. Does not authenticate.
    async fn register(&self, request: RegisterRequest) -> Result<ApiMessage, ApiError>;

    /// Request a password reset email.
    async fn forgot_password(&self, email: &str) -> Result<ApiMessage, ApiError>;

    /// Redeem a password reset token.
    async fn reset_password(&self, request: ResetPasswordRequest) -> Result<ApiMessage, ApiError>;
}

/// Profile and account endpoints, authenticated by the current access token.
#[async_trait]
pub trait ProfileApi: Send + Sync {
    /// Fetch the authoritative profile record.
    async fn get_profile(&self) -> Result<User, ApiError>;

    /// Apply a partial edit, returning the resulting record.
    async fn update_profile(&self, changes: ProfileUpdate) -> Result<User, ApiError>;

    /// Permanently delete the account.
    async fn delete_account(&self) -> Result<(), ApiError>;
}
