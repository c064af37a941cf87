//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No user is signed in.
    #[error("not signed in")]
    NotAuthenticated,

    /// Signed-in user lacks the required role.
    #[error("insufficient permissions")]
    InsufficientPermissions,

    /// Role name not recognized.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// Token could not be decoded.
    #[error("token invalid: {0}")]
    InvalidToken(String),

    /// Token expired.
    #[error("token expired")]
    TokenExpired,

    /// Durable storage error.
    #[error("store error: {0}")]
    Store(#[from] lectern_store::StoreError),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::NotAuthenticated | AuthError::InvalidToken(_) | AuthError::TokenExpired
        )
    }

    /// Check if this is a permission error.
    pub fn is_permission_error(&self) -> bool {
        matches!(self, AuthError::InsufficientPermissions)
    }
}
