//! Reqwest implementation of the auth backend.
//!
//! Thin HTTP wrapper over `/api/v1/auth/*`. Pure helpers for endpoint
//! construction and envelope parsing keep the request plumbing testable
//! without a live backend.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{ApiStatus, AuthBackend, AuthError, LoginRequest, LoginResponse, RefreshTokenRequest};
use crate::config::ApiConfig;

const AUTH_BASE_PATH: &str = "/api/v1/auth";

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client for the backend auth endpoints.
pub struct AuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl AuthApi {
    /// Build a client from `config`, applying its request and connect timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ClientBuild`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| AuthError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    async fn post_json<B, T>(&self, action: &str, body: &B) -> Result<T, AuthError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = auth_endpoint(&self.base_url, action);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(AuthError::Status { status, body: text });
        }

        parse_envelope(&text)
    }
}

#[async_trait::async_trait]
impl AuthBackend for AuthApi {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, AuthError> {
        self.post_json("login", credentials).await
    }

    async fn refresh(&self, request: &RefreshTokenRequest) -> Result<LoginResponse, AuthError> {
        self.post_json("refresh", request).await
    }

    async fn logout(&self) -> Result<ApiStatus, AuthError> {
        // The backend keys the session off the bearer header; the body is empty.
        self.post_json("logout", &serde_json::json!({})).await
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn auth_endpoint(base_url: &str, action: &str) -> String {
    format!("{}{AUTH_BASE_PATH}/{action}", base_url.trim_end_matches('/'))
}

fn parse_envelope<T: DeserializeOwned>(json: &str) -> Result<T, AuthError> {
    serde_json::from_str(json).map_err(|e| AuthError::Parse(e.to_string()))
}
