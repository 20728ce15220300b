//! Backend token exchange — `POST <base>/auth`.
//!
//! Thin HTTP wrapper in the style of the LLM provider clients: build a
//! reqwest client once with timeouts, send JSON, map every failure into
//! [`AuthError`]. Pure parsing lives in [`parse_token_response`] for
//! testability.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::claims::ClaimsError;
use crate::config::{self, AuthTimeouts, ConfigError, SessionConfig};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while exchanging `initData` for a session token.
///
/// These are logged, never published: consumers only see
/// [`crate::store::AUTHENTICATION_FAILED`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The backend base URL could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (connect, timeout, TLS).
    #[error("auth request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("auth response error: status {status}")]
    Status { status: u16, body: String },

    /// The response body was not `{ "token": string }`.
    #[error("auth response parse failed: {0}")]
    Parse(String),

    /// The issued token could not be decoded or is unusable.
    #[error("issued token rejected: {0}")]
    Claims(String),
}

impl From<ClaimsError> for AuthError {
    fn from(err: ClaimsError) -> Self {
        Self::Claims(err.to_string())
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Exchanges a host-issued `initData` payload for a session token.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    async fn exchange(&self, init_data: &str) -> Result<String, AuthError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpAuthApi {
    http: reqwest::Client,
    /// Fixed base URL; `None` reads `MINIAPP_API_URL` on every exchange.
    base_url: Option<String>,
}

impl HttpAuthApi {
    /// Client that resolves the base URL from the environment at call time.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(timeouts: AuthTimeouts) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| AuthError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: None })
    }

    /// Build from a parsed config, pinning its base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &SessionConfig) -> Result<Self, AuthError> {
        Ok(Self::new(config.timeouts)?.with_base_url(&config.api_base_url))
    }

    /// Pin the base URL instead of reading it from the environment.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_owned());
        self
    }

    fn auth_url(&self) -> Result<String, AuthError> {
        let base = match &self.base_url {
            Some(base) => base.clone(),
            None => config::api_base_url_from_env()?,
        };
        Ok(format!("{base}/auth"))
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpAuthApi {
    async fn exchange(&self, init_data: &str) -> Result<String, AuthError> {
        let url = self.auth_url()?;

        // `.json` sets `Content-Type: application/json`.
        let response = self
            .http
            .post(&url)
            .json(&AuthRequest { init_data })
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(AuthError::Status { status: status.as_u16(), body: text });
        }

        parse_token_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct AuthRequest<'a> {
    #[serde(rename = "initData")]
    init_data: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
}

/// Extract the token from a successful `/auth` response body.
pub(crate) fn parse_token_response(body: &str) -> Result<String, AuthError> {
    let parsed: AuthResponse = serde_json::from_str(body).map_err(|e| AuthError::Parse(e.to_string()))?;
    if parsed.token.is_empty() {
        return Err(AuthError::Parse("empty token".into()));
    }
    Ok(parsed.token)
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
