//! Session token claims — structural decode without verification.
//!
//! TRUST MODEL
//! ===========
//! The backend signs the token; this module only base64-decodes the payload
//! segment and parses it as JSON. Signature and issuer are NOT checked.
//! Decoded claims are untrusted display data: they label the UI, they never
//! authorize anything. Authorization happens server-side on every request
//! that carries the token.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

#[derive(Debug, thiserror::Error)]
pub enum ClaimsError {
    #[error("token has no payload segment")]
    MissingPayload,
    #[error("token payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Identity claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub username: String,
    /// Expiry, epoch seconds.
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Only the expiry claim; used when the identity fields are irrelevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ExpiryClaims {
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Decode the payload segment of a compact `header.payload.signature` token.
///
/// # Errors
///
/// Returns an error if the payload segment is absent, not base64url, or not
/// JSON matching `T`.
pub fn decode_claims<T: DeserializeOwned>(token: &str) -> Result<T, ClaimsError> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or(ClaimsError::MissingPayload)?;
    let bytes = decode_segment(payload)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Whether the token's `exp` lies strictly after `now_millis`.
///
/// Undecodable tokens and tokens without `exp` are invalid.
#[must_use]
pub fn is_token_valid(token: &str, now_millis: i64) -> bool {
    match decode_claims::<ExpiryClaims>(token) {
        Ok(ExpiryClaims { exp: Some(exp) }) => exp.saturating_mul(1000) > now_millis,
        Ok(ExpiryClaims { exp: None }) | Err(_) => false,
    }
}

// Issuers disagree on padding and alphabet; normalize to unpadded base64url.
fn decode_segment(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    URL_SAFE_NO_PAD.decode(normalized)
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        UInt(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::UInt(n) => n.to_string(),
    })
}


#[cfg(test)]
#[path = "claims_test.rs"]
mod tests;
