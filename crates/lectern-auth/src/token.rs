//! Authentication tokens.

use crate::AuthError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token pair returned by `auth/login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: AccessToken,
    pub refresh: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &self.access)
            .field("refresh", &"<redacted>")
            .finish()
    }
}

/// A bearer access token (JWT).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Expiry taken from the `exp` claim. The signature is not checked.
    pub fn expires_at(&self) -> Result<Option<DateTime<Utc>>, AuthError> {
        let payload = self
            .0
            .split('.')
            .nth(1)
            .ok_or_else(|| AuthError::InvalidToken("not a JWT".to_string()))?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let claims: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        match claims.get("exp").and_then(serde_json::Value::as_i64) {
            Some(exp) => DateTime::from_timestamp(exp, 0)
                .map(Some)
                .ok_or_else(|| AuthError::InvalidToken(format!("exp out of range: {}", exp))),
            None => Ok(None),
        }
    }

    /// Whether the token is past its expiry at `now`.
    ///
    /// Tokens without a readable `exp` are treated as live; the backend has
    /// the final say.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at(), Ok(Some(exp)) if exp <= now)
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}
