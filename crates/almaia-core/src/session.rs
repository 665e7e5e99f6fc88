//! Explicit session context and bearer-token expiry checks.
//!
//! The student id and token are passed to whatever needs them; nothing here
//! reads or writes token storage.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Who the current calls are made for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentContext {
    pub student_id: i64,
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

impl StudentContext {
    pub fn new(student_id: i64) -> Self {
        Self {
            student_id,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Token if present and not blank.
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    [URL_SAFE_NO_PAD, URL_SAFE, STANDARD, STANDARD_NO_PAD]
        .iter()
        .find_map(|engine| engine.decode(segment).ok())
        .ok_or(TokenError::BadEncoding)
}

/// Expiry instant of a JWT, read from its `exp` claim (seconds since epoch).
pub fn token_expiry(token: &str) -> Result<DateTime<Utc>, TokenError> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::NotJwt(parts.len()));
    }

    let payload = decode_segment(parts[1])?;
    let claims: serde_json::Value =
        serde_json::from_slice(&payload).map_err(|_| TokenError::MissingExpiry)?;
    let exp = claims
        .get("exp")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .ok_or(TokenError::MissingExpiry)?;

    DateTime::from_timestamp(exp, 0).ok_or(TokenError::MissingExpiry)
}

/// `false` for a missing, malformed or expired token.
pub fn is_token_valid(token: Option<&str>, now: DateTime<Utc>) -> bool {
    match token.map(token_expiry) {
        Some(Ok(expiry)) => now < expiry,
        _ => false,
    }
}
