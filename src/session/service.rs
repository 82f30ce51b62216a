//! Session service — owns the authenticated-user state and both tokens.
//!
//! DESIGN
//! ======
//! One instance per running client. The current user lives in a
//! `tokio::sync::watch` channel so any number of subscribers observe the
//! latest value, with the most recent snapshot replayed on subscribe.
//! Tokens are not cached in memory; they are read through from the store
//! on demand, so the store stays the single source of truth for them.
//!
//! ERROR HANDLING
//! ==============
//! Login/refresh failures propagate unchanged and leave the session
//! untouched. A corrupt stored user record is recovered silently by wiping
//! all session state. Logout clears local state before the backend call,
//! so a failed logout request still leaves the client logged out.

#[cfg(test)]
#[path = "service_test.rs"]
mod service_test;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use super::store::{ACCESS_TOKEN_KEY, CURRENT_USER_KEY, REFRESH_TOKEN_KEY, SessionStore};
use crate::net::types::{ApiStatus, AuthBackend, AuthError, AuthPayload, AuthUser, LoginRequest, LoginResponse, RefreshTokenRequest};

/// Client-held record of who is logged in, backed by a [`SessionStore`].
#[derive(Clone)]
pub struct SessionService {
    backend: Arc<dyn AuthBackend>,
    store: Arc<dyn SessionStore>,
    user_tx: watch::Sender<Option<AuthUser>>,
}

impl SessionService {
    /// Create the service and rehydrate the session from `store`.
    ///
    /// A stored user record that fails to parse wipes all session keys and
    /// starts the service unauthenticated; no error is surfaced.
    #[must_use]
    pub fn new(backend: Arc<dyn AuthBackend>, store: Arc<dyn SessionStore>) -> Self {
        let (user_tx, _) = watch::channel(None);
        let service = Self { backend, store, user_tx };
        service.load_user_from_store();
        service
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Exchange credentials for a session.
    ///
    /// On a successful response carrying a payload, the user record and both
    /// tokens are replaced together and persisted. On failure the session is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Propagates any [`AuthError`] from the backend unchanged.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let response = self.backend.login(credentials).await?;
        if let Some(payload) = &response.data {
            self.install_session(payload);
        }
        Ok(response)
    }

    /// Exchange the refresh token for a fresh session.
    ///
    /// Same replace-and-persist contract as [`SessionService::login`].
    ///
    /// # Errors
    ///
    /// Propagates any [`AuthError`] from the backend unchanged.
    pub async fn refresh(&self, request: &RefreshTokenRequest) -> Result<LoginResponse, AuthError> {
        let response = self.backend.refresh(request).await?;
        if let Some(payload) = &response.data {
            self.install_session(payload);
        }
        Ok(response)
    }

    /// Log out: clear session state and storage immediately, then notify
    /// the backend.
    ///
    /// The local clear happens first and is unconditional; a backend failure
    /// cannot resurrect the session.
    ///
    /// # Errors
    ///
    /// Returns the backend outcome for callers that want to log it. The
    /// session is already cleared by the time this returns.
    pub async fn logout(&self) -> Result<ApiStatus, AuthError> {
        self.clear_session();
        info!("auth session cleared");
        self.backend.logout().await
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// True iff an access token is present in storage and a user is held
    /// in memory.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some() && self.current_user().is_some()
    }

    /// Snapshot of the current user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<AuthUser> {
        self.user_tx.borrow().clone()
    }

    /// Observe the current user. The receiver sees the latest value
    /// immediately and one notification per subsequent change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.user_tx.subscribe()
    }

    /// Read the stored access token, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    /// Read the stored refresh token, if any.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn install_session(&self, payload: &AuthPayload) {
        // Write order: user record, publish, then tokens.
        if let Ok(raw) = serde_json::to_string(&payload.user) {
            self.store.set(CURRENT_USER_KEY, &raw);
        }
        self.user_tx.send_replace(Some(payload.user.clone()));
        self.store.set(ACCESS_TOKEN_KEY, &payload.tokens.access_token);
        self.store.set(REFRESH_TOKEN_KEY, &payload.tokens.refresh_token);
        info!(user_id = %payload.user.id, "auth session installed");
    }

    fn clear_session(&self) {
        self.store.remove(ACCESS_TOKEN_KEY);
        self.store.remove(REFRESH_TOKEN_KEY);
        self.store.remove(CURRENT_USER_KEY);
        self.user_tx.send_replace(None);
    }

    fn load_user_from_store(&self) {
        let Some(raw) = self.store.get(CURRENT_USER_KEY) else {
            return;
        };
        match serde_json::from_str::<AuthUser>(&raw) {
            Ok(user) => {
                self.user_tx.send_replace(Some(user));
            }
            Err(e) => {
                // Silent recovery: the caller never sees this failure.
                warn!(error = %e, "stored user record unparseable; wiping session");
                self.clear_session();
            }
        }
    }
}
