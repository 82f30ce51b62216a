//! Wire DTOs and errors for the auth API boundary.
//!
//! DESIGN
//! ======
//! These types mirror the backend response envelopes field-for-field so serde
//! round-trips stay lossless. Token field names are camelCase on the wire;
//! user fields are stored exactly as the backend spells them.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by auth backend operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The HTTP request to the backend failed before a response arrived.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend returned a non-success HTTP status.
    #[error("unexpected status {status}")]
    Status { status: u16, body: String },

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

// =============================================================================
// ENVELOPES
// =============================================================================

/// Generic response envelope wrapping every auth endpoint payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the backend considered the request successful.
    pub success: bool,
    /// Optional human-readable status message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Endpoint-specific payload; absent on failures and bare acknowledgments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Envelope returned by endpoints that carry no payload (logout).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiStatus {
    /// Whether the backend considered the request successful.
    pub success: bool,
    /// Optional human-readable status message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response to `login` and `refresh`.
pub type LoginResponse = ApiResponse<AuthPayload>;

// =============================================================================
// AUTH PAYLOADS
// =============================================================================

/// An authenticated user as returned by the auth endpoints and persisted
/// in the session store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Unique user identifier, opaque to this client.
    pub id: String,
    /// Given names.
    pub nombres: String,
    /// Family names.
    pub apellidos: String,
    /// Login email.
    pub email: String,
    /// System role (`"admin"`, `"supervisor"`, `"empleado"`).
    pub rol: String,
}

/// Bearer token pair issued on login and refresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    /// Short-lived token attached to API calls.
    pub access_token: String,
    /// Long-lived token exchanged for fresh access tokens.
    pub refresh_token: String,
}

/// `data` payload of a successful login or refresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: AuthUser,
    pub tokens: AuthTokens,
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Credentials posted to `/api/v1/auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Refresh token posted to `/api/v1/auth/refresh`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

// =============================================================================
// AUTH BACKEND TRAIT
// =============================================================================

/// Async seam over the three auth endpoints. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for a user record and token pair.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the request fails, the backend responds
    /// with a non-success status, or the body cannot be decoded.
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, AuthError>;

    /// Exchange a refresh token for a fresh user record and token pair.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`AuthBackend::login`].
    async fn refresh(&self, request: &RefreshTokenRequest) -> Result<LoginResponse, AuthError>;

    /// Tell the backend to invalidate the current session.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`AuthBackend::login`]; callers treat the
    /// outcome as advisory.
    async fn logout(&self) -> Result<ApiStatus, AuthError>;
}
