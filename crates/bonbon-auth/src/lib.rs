//! Session layer for Bonbon.
//!
//! Provides the authenticated-session cache and the contracts it consumes:
//!
//! - [`SessionStore`]: optimistic restore from client storage, background
//!   reconciliation against the server, login/logout/profile lifecycle.
//! - [`AuthApi`] / [`ProfileApi`]: the narrow request/response traits the
//!   storefront's REST layer implements.
//!
//! # Example
//!
//! ```rust,ignore
//! use bonbon_auth::SessionStore;
//!
//! let mut session = SessionStore::new(backend, auth_client, profile_client);
//!
//! // At application start: serve the cached session instantly,
//! // then reconcile without blocking the first render.
//! if session.restore() {
//!     spawn(async move { session.reconcile().await });
//! }
//! ```

mod api;
mod error;
mod session;
mod user;

pub use api::{
    ApiMessage, AuthApi, LoginResponse, ProfileApi, ProfileUpdate, RegisterRequest,
    ResetPasswordRequest,
};
pub use error::ApiError;
pub use session::{Freshness, SessionStore, SESSION_NAMESPACE};
pub use user::{Role, User};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        ApiError, ApiMessage, AuthApi, Freshness, LoginResponse, ProfileApi, ProfileUpdate,
        RegisterRequest, ResetPasswordRequest, Role, SessionStore, User,
    };
}
