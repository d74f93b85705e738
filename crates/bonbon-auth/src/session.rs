//! The session store.
//!
//! Caches the authenticated session optimistically and reconciles it against
//! the server. At application start the app calls [`SessionStore::restore`],
//! which serves the last persisted session immediately with no network round
//! trip, then spawns [`SessionStore::reconcile`] however its runtime likes.
//! Reconciliation fetches the authoritative profile in the background and
//! absorbs every failure, so a dead network can never log the user out of a
//! locally valid session.
//!
//! Login, registration, profile edits and account deletion are the only
//! operations whose errors propagate to the caller; the UI must be able to
//! block navigation on them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use bonbon_cache::{KvStore, StorageBackend};

use crate::api::{ApiMessage, AuthApi, ProfileApi, ProfileUpdate, RegisterRequest, ResetPasswordRequest};
use crate::error::ApiError;
use crate::user::User;

/// Storage namespace owned by the session. The cart store never reads it.
pub const SESSION_NAMESPACE: &str = "bonbon.session";

const SESSION_KEY: &str = "session";

/// Persisted shape: `{ user, token, refreshToken, isAuthenticated }`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    user: User,
    token: String,
    refresh_token: String,
    is_authenticated: bool,
}

/// Whether the current session data has been confirmed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Served from persisted storage, not yet confirmed.
    Cached,
    /// Confirmed against the Profile collaborator.
    Reconciled,
}

/// The authenticated-session cache.
///
/// One instance per browser session. States move
/// `unauthenticated -> authenticated(cached) -> authenticated(reconciled)`,
/// with logout (or corrupt persisted data) dropping back to unauthenticated
/// from anywhere.
pub struct SessionStore {
    user: Option<User>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    authenticated: bool,
    freshness: Option<Freshness>,
    storage: KvStore,
    auth: Arc<dyn AuthApi>,
    profile: Arc<dyn ProfileApi>,
}

impl SessionStore {
    /// Create an unauthenticated store. Call [`Self::restore`] to rehydrate.
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        auth: Arc<dyn AuthApi>,
        profile: Arc<dyn ProfileApi>,
    ) -> Self {
        Self {
            user: None,
            access_token: None,
            refresh_token: None,
            authenticated: false,
            freshness: None,
            storage: KvStore::new(backend, SESSION_NAMESPACE),
            auth,
            profile,
        }
    }

    /// Exchange credentials for a session.
    ///
    /// On success the session is stored in memory and persisted. On failure
    /// state is unchanged and the error propagates; login failures must be
    /// able to block navigation.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ApiError> {
        let response = self.auth.login(email, password).await?;

        self.user = Some(response.user);
        self.access_token = Some(response.access_token);
        self.refresh_token = Some(response.refresh_token);
        self.authenticated = true;
        self.freshness = Some(Freshness::Reconciled);
        self.persist();
        Ok(())
    }

    /// Create an account.
    ///
    /// Never mutates session state; the backend requires email verification
    /// before the first login.
    pub async fn register(&self, request: RegisterRequest) -> Result<ApiMessage, ApiError> {
        self.auth.register(request).await
    }

    /// Request a password reset email. Pass-through, no session state.
    pub async fn forgot_password(&self, email: &str) -> Result<ApiMessage, ApiError> {
        self.auth.forgot_password(email).await
    }

    /// Redeem a password reset token. Pass-through, no session state.
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<ApiMessage, ApiError> {
        self.auth.reset_password(request).await
    }

    /// Clear the session in memory and in durable storage.
    ///
    /// Always succeeds synchronously; a failed storage wipe is logged and
    /// the in-memory logout stands.
    pub fn logout(&mut self) {
        self.reset();
        if let Err(error) = self.storage.delete(SESSION_KEY) {
            tracing::warn!(%error, "failed to wipe persisted session");
        }
    }

    /// Rehydrate the last persisted session, optimistically.
    ///
    /// Serves the cached copy immediately and marks it [`Freshness::Cached`].
    /// Absent or unparseable data degrades to a clean unauthenticated state,
    /// never an error; a corrupt entry is simply overwritten by the next
    /// successful write. Returns whether a cached session was found.
    pub fn restore(&mut self) -> bool {
        match self.storage.get::<PersistedSession>(SESSION_KEY) {
            Ok(Some(persisted)) if persisted.is_authenticated => {
                self.user = Some(persisted.user);
                self.access_token = Some(persisted.token);
                self.refresh_token = Some(persisted.refresh_token);
                self.authenticated = true;
                self.freshness = Some(Freshness::Cached);
                true
            }
            Ok(_) => {
                self.reset();
                false
            }
            Err(error) => {
                tracing::warn!(%error, "discarding corrupt persisted session");
                self.reset();
                false
            }
        }
    }

    /// Reconcile the cached session against the Profile collaborator.
    ///
    /// On success the fresh profile replaces the cached one in memory and in
    /// storage. On any failure the cached copy is kept; reconciliation never
    /// downgrades an authenticated session. No-op while unauthenticated.
    pub async fn reconcile(&mut self) {
        if !self.authenticated {
            return;
        }

        match self.profile.get_profile().await {
            Ok(user) => {
                self.user = Some(user);
                self.freshness = Some(Freshness::Reconciled);
                self.persist();
            }
            Err(error) => {
                tracing::debug!(%error, "profile reconciliation failed, keeping cached session");
            }
        }
    }

    /// Apply a partial profile edit.
    ///
    /// The server's resulting record replaces the in-memory and persisted
    /// user. Errors propagate.
    pub async fn update_profile(&mut self, changes: ProfileUpdate) -> Result<(), ApiError> {
        let user = self.profile.update_profile(changes).await?;
        self.user = Some(user);
        self.persist();
        Ok(())
    }

    /// Delete the account, then behave as [`Self::logout`].
    pub async fn delete_account(&mut self) -> Result<(), ApiError> {
        self.profile.delete_account().await?;
        self.logout();
        Ok(())
    }

    /// The current user, if authenticated.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The current access token, if authenticated.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// The current refresh token, if authenticated.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Whether a session is active, cached or reconciled.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Staleness of the current session data, if any.
    pub fn freshness(&self) -> Option<Freshness> {
        self.freshness
    }

    fn reset(&mut self) {
        self.user = None;
        self.access_token = None;
        self.refresh_token = None;
        self.authenticated = false;
        self.freshness = None;
    }

    fn persist(&self) {
        let (Some(user), Some(token), Some(refresh_token)) = (
            self.user.as_ref(),
            self.access_token.as_ref(),
            self.refresh_token.as_ref(),
        ) else {
            return;
        };

        let snapshot = PersistedSession {
            user: user.clone(),
            token: token.clone(),
            refresh_token: refresh_token.clone(),
            is_authenticated: self.authenticated,
        };
        if let Err(error) = self.storage.set(SESSION_KEY, &snapshot) {
            tracing::warn!(%error, "session persistence write failed, keeping in-memory state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LoginResponse;
    use async_trait::async_trait;
    use bonbon_cache::MemoryBackend;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn mira() -> User {
        User::new("u1", "mira@example.com")
    }

    /// Auth mock: accepts one known credential pair.
    struct MockAuth {
        logins: AtomicUsize,
    }

    impl MockAuth {
        fn new() -> Self {
            Self {
                logins: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AuthApi for MockAuth {
        async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
            self.logins.fetch_add(1, Ordering::SeqCst);
            if email == "mira@example.com" && password == "sugar" {
                Ok(LoginResponse {
                    user: mira(),
                    access_token: "access-abc".into(),
                    refresh_token: "refresh-xyz".into(),
                })
            } else {
                Err(ApiError::InvalidCredentials)
            }
        }

        async fn register(&self, _request: RegisterRequest) -> Result<ApiMessage, ApiError> {
            Ok(ApiMessage {
                message: "verification email sent".into(),
            })
        }

        async fn forgot_password(&self, _email: &str) -> Result<ApiMessage, ApiError> {
            Ok(ApiMessage {
                message: "reset email sent".into(),
            })
        }

        async fn reset_password(
            &self,
            _request: ResetPasswordRequest,
        ) -> Result<ApiMessage, ApiError> {
            Ok(ApiMessage {
                message: "password updated".into(),
            })
        }
    }

    /// Profile mock: serves a fixed profile, or fails every call.
    struct MockProfile {
        fresh_user: Option<User>,
        calls: AtomicUsize,
    }

    impl MockProfile {
        fn serving(user: User) -> Self {
            Self {
                fresh_user: Some(user),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fresh_user: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProfileApi for MockProfile {
        async fn get_profile(&self) -> Result<User, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.fresh_user
                .clone()
                .ok_or_else(|| ApiError::Network("connection timed out".into()))
        }

        async fn update_profile(&self, changes: ProfileUpdate) -> Result<User, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut user = self
                .fresh_user
                .clone()
                .ok_or_else(|| ApiError::Network("connection timed out".into()))?;
            if let Some(name) = changes.name {
                user.name = Some(name);
            }
            if let Some(email) = changes.email {
                user.email = email;
            }
            Ok(user)
        }

        async fn delete_account(&self) -> Result<(), ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fresh_user.is_some() {
                Ok(())
            } else {
                Err(ApiError::Network("connection timed out".into()))
            }
        }
    }

    fn store_with(
        backend: Arc<MemoryBackend>,
        profile: Arc<MockProfile>,
    ) -> SessionStore {
        SessionStore::new(backend, Arc::new(MockAuth::new()), profile)
    }

    fn seed_persisted_session(backend: &MemoryBackend) {
        let raw = r#"{"user":{"id":"u1","email":"mira@example.com","name":null,"role":"customer","email_verified":false},"token":"access-abc","refreshToken":"refresh-xyz","isAuthenticated":true}"#;
        backend.store("bonbon.session:session", raw).unwrap();
    }

    #[tokio::test]
    async fn login_success_sets_and_persists_session() {
        let backend = Arc::new(MemoryBackend::new());
        let mut store = store_with(backend.clone(), Arc::new(MockProfile::serving(mira())));

        store.login("mira@example.com", "sugar").await.unwrap();

        assert!(store.is_authenticated());
        assert_eq!(store.access_token(), Some("access-abc"));
        assert_eq!(store.freshness(), Some(Freshness::Reconciled));

        let raw = backend.load("bonbon.session:session").unwrap().unwrap();
        assert!(raw.contains("\"refreshToken\":\"refresh-xyz\""));
        assert!(raw.contains("\"isAuthenticated\":true"));
    }

    #[tokio::test]
    async fn login_failure_propagates_and_leaves_state_unchanged() {
        let backend = Arc::new(MemoryBackend::new());
        let mut store = store_with(backend.clone(), Arc::new(MockProfile::serving(mira())));

        let result = store.login("mira@example.com", "wrong").await;

        assert!(matches!(result, Err(ApiError::InvalidCredentials)));
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        assert!(backend.load("bonbon.session:session").unwrap().is_none());
    }

    #[tokio::test]
    async fn register_does_not_mutate_session_state() {
        let store = store_with(
            Arc::new(MemoryBackend::new()),
            Arc::new(MockProfile::serving(mira())),
        );

        let ack = store
            .register(RegisterRequest {
                email: "new@example.com".into(),
                password: "pw".into(),
                name: None,
            })
            .await
            .unwrap();

        assert_eq!(ack.message, "verification email sent");
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_memory_and_storage() {
        let backend = Arc::new(MemoryBackend::new());
        let mut store = store_with(backend.clone(), Arc::new(MockProfile::serving(mira())));
        store.login("mira@example.com", "sugar").await.unwrap();

        store.logout();

        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        assert!(store.access_token().is_none());
        assert!(store.freshness().is_none());
        assert!(backend.load("bonbon.session:session").unwrap().is_none());
    }

    #[test]
    fn restore_without_persisted_session_stays_unauthenticated() {
        let mut store = store_with(
            Arc::new(MemoryBackend::new()),
            Arc::new(MockProfile::serving(mira())),
        );

        assert!(!store.restore());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn restore_serves_cached_session_without_network() {
        let backend = Arc::new(MemoryBackend::new());
        seed_persisted_session(&backend);
        let profile = Arc::new(MockProfile::serving(mira()));
        let mut store = store_with(backend, profile.clone());

        assert!(store.restore());

        assert!(store.is_authenticated());
        assert_eq!(store.user().unwrap().email, "mira@example.com");
        assert_eq!(store.freshness(), Some(Freshness::Cached));
        // Optimistic read only; no collaborator call yet.
        assert_eq!(profile.calls(), 0);
    }

    #[test]
    fn restore_with_corrupt_data_degrades_cleanly() {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .store("bonbon.session:session", "][ not json at all")
            .unwrap();
        let mut store = store_with(backend, Arc::new(MockProfile::serving(mira())));

        assert!(!store.restore());
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
    }

    #[tokio::test]
    async fn reconcile_overwrites_cached_user_with_fresh_record() {
        let backend = Arc::new(MemoryBackend::new());
        seed_persisted_session(&backend);

        let mut fresh = mira();
        fresh.name = Some("Mira".into());
        fresh.email_verified = true;
        let profile = Arc::new(MockProfile::serving(fresh));

        let mut store = store_with(backend.clone(), profile);
        store.restore();
        store.reconcile().await;

        assert_eq!(store.freshness(), Some(Freshness::Reconciled));
        assert!(store.user().unwrap().email_verified);

        let raw = backend.load("bonbon.session:session").unwrap().unwrap();
        assert!(raw.contains("\"email_verified\":true"));
    }

    #[tokio::test]
    async fn reconcile_failure_keeps_cached_session() {
        // Persisted session present, profile call times out.
        let backend = Arc::new(MemoryBackend::new());
        seed_persisted_session(&backend);
        let mut store = store_with(backend, Arc::new(MockProfile::failing()));

        store.restore();
        store.reconcile().await;

        assert!(store.is_authenticated());
        assert_eq!(store.user().unwrap().email, "mira@example.com");
        assert_eq!(store.freshness(), Some(Freshness::Cached));
    }

    #[tokio::test]
    async fn reconcile_while_unauthenticated_is_a_noop() {
        let profile = Arc::new(MockProfile::serving(mira()));
        let mut store = store_with(Arc::new(MemoryBackend::new()), profile.clone());

        store.reconcile().await;

        assert!(!store.is_authenticated());
        assert_eq!(profile.calls(), 0);
    }

    #[tokio::test]
    async fn update_profile_replaces_and_persists_the_user() {
        let backend = Arc::new(MemoryBackend::new());
        let profile = Arc::new(MockProfile::serving(mira()));
        let mut store = store_with(backend.clone(), profile);
        store.login("mira@example.com", "sugar").await.unwrap();

        store
            .update_profile(ProfileUpdate {
                name: Some("Mira K.".into()),
                email: None,
            })
            .await
            .unwrap();

        assert_eq!(store.user().unwrap().name.as_deref(), Some("Mira K."));
        let raw = backend.load("bonbon.session:session").unwrap().unwrap();
        assert!(raw.contains("Mira K."));
    }

    #[tokio::test]
    async fn update_profile_failure_propagates_and_keeps_user() {
        let backend = Arc::new(MemoryBackend::new());
        seed_persisted_session(&backend);
        let mut store = store_with(backend, Arc::new(MockProfile::failing()));
        store.restore();

        let result = store.update_profile(ProfileUpdate::default()).await;

        assert!(matches!(result, Err(ApiError::Network(_))));
        assert_eq!(store.user().unwrap().email, "mira@example.com");
    }

    #[tokio::test]
    async fn delete_account_behaves_as_logout() {
        let backend = Arc::new(MemoryBackend::new());
        let mut store = store_with(backend.clone(), Arc::new(MockProfile::serving(mira())));
        store.login("mira@example.com", "sugar").await.unwrap();

        store.delete_account().await.unwrap();

        assert!(!store.is_authenticated());
        assert!(backend.load("bonbon.session:session").unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_account_failure_keeps_the_session() {
        let backend = Arc::new(MemoryBackend::new());
        seed_persisted_session(&backend);
        let mut store = store_with(backend, Arc::new(MockProfile::failing()));
        store.restore();

        let result = store.delete_account().await;

        assert!(result.is_err());
        assert!(store.is_authenticated());
    }
}
