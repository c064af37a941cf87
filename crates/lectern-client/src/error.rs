//! Client error types.

use lectern_auth::AuthError;
use lectern_catalog::{CatalogError, ValidationErrors};
use lectern_data::{FetchError, UNEXPECTED_ERROR};
use lectern_store::StoreError;
use thiserror::Error;

/// Errors surfaced by API calls and session flows.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Input rejected before anything was sent.
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// The operation needs a signed-in user.
    #[error("Not signed in")]
    NotAuthenticated,

    /// The signed-in user may not perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The backend did not report an id for the signed-in user.
    #[error("User id unknown")]
    UnknownUser,

    /// Checkout was requested with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Auth(AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClientError {
    /// Text suitable for inline display next to the form or action.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Fetch(e) => e.user_message(),
            ClientError::Validation(errors) => errors
                .iter()
                .next()
                .map(|(_, message)| message.to_string())
                .unwrap_or_else(|| UNEXPECTED_ERROR.to_string()),
            ClientError::NotAuthenticated => "Please sign in first".to_string(),
            ClientError::Forbidden(_) => "You do not have access to this action".to_string(),
            ClientError::EmptyCart => "Your cart is empty".to_string(),
            ClientError::Catalog(CatalogError::NoSelection) => {
                "Choose a complectation first".to_string()
            }
            ClientError::Catalog(
                e @ (CatalogError::ImportRow { .. }
                | CatalogError::Csv(_)
                | CatalogError::LastComplectation),
            ) => e.to_string(),
            ClientError::Catalog(CatalogError::ComplectationNotFound(id)) => {
                format!("Complectation {} no longer exists", id)
            }
            ClientError::UnknownUser => "Your profile could not be loaded".to_string(),
            _ => UNEXPECTED_ERROR.to_string(),
        }
    }

    /// HTTP status of a server rejection, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Fetch(e) => e.status(),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(e: ValidationErrors) -> Self {
        ClientError::Validation(e)
    }
}

impl From<AuthError> for ClientError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NotAuthenticated => ClientError::NotAuthenticated,
            AuthError::InsufficientPermissions => {
                ClientError::Forbidden("administrator role required".to_string())
            }
            other => ClientError::Auth(other),
        }
    }
}
