//! Session configuration parsed from environment variables.

pub const API_URL_VAR: &str = "MINIAPP_API_URL";
pub const REQUEST_TIMEOUT_VAR: &str = "MINIAPP_AUTH_REQUEST_TIMEOUT_SECS";
pub const CONNECT_TIMEOUT_VAR: &str = "MINIAPP_AUTH_CONNECT_TIMEOUT_SECS";

pub const DEFAULT_AUTH_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_AUTH_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing config: env var {var} not set")]
    MissingVar { var: &'static str },
    #[error("invalid config: env var {var} is empty")]
    EmptyVar { var: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for AuthTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_AUTH_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_AUTH_CONNECT_TIMEOUT_SECS }
    }
}

impl AuthTimeouts {
    /// Timeouts from `MINIAPP_AUTH_*_TIMEOUT_SECS`. Unset or non-numeric
    /// values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            request_secs: parse_u64(lookup(REQUEST_TIMEOUT_VAR), DEFAULT_AUTH_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(lookup(CONNECT_TIMEOUT_VAR), DEFAULT_AUTH_CONNECT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub api_base_url: String,
    pub timeouts: AuthTimeouts,
}

impl SessionConfig {
    /// Build typed session config from environment variables.
    ///
    /// Required:
    /// - `MINIAPP_API_URL`: backend base URL; `/auth` is appended per call
    ///
    /// Optional:
    /// - `MINIAPP_AUTH_REQUEST_TIMEOUT_SECS`: default 30
    /// - `MINIAPP_AUTH_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same parse as [`SessionConfig::from_env`] against an arbitrary lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is unset or blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = normalize_base_url(lookup(API_URL_VAR))?;
        let timeouts = AuthTimeouts::from_lookup(&lookup);
        Ok(Self { api_base_url, timeouts })
    }
}

/// Read only the backend base URL from the process environment.
///
/// # Errors
///
/// Returns an error if `MINIAPP_API_URL` is unset or blank.
pub fn api_base_url_from_env() -> Result<String, ConfigError> {
    normalize_base_url(std::env::var(API_URL_VAR).ok())
}

pub(crate) fn normalize_base_url(raw: Option<String>) -> Result<String, ConfigError> {
    let raw = raw.ok_or(ConfigError::MissingVar { var: API_URL_VAR })?;
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyVar { var: API_URL_VAR });
    }
    Ok(trimmed.to_owned())
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
