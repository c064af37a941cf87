//! Catalog error types.

use thiserror::Error;

use crate::schema::ValidationErrors;

/// Errors that can occur in catalog and cart operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Book not found.
    #[error("Book not found: {0}")]
    BookNotFound(String),

    /// Complectation not found on an item.
    #[error("Complectation not found: {0}")]
    ComplectationNotFound(String),

    /// No complectation is currently selected.
    #[error("No complectation selected")]
    NoSelection,

    /// Removing the complectation would leave the item with none.
    #[error("An item needs at least one complectation")]
    LastComplectation,

    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in price calculation")]
    Overflow,

    /// Invalid price value.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Malformed row in a bulk import file.
    #[error("Import row {row}: {message}")]
    ImportRow { row: usize, message: String },

    /// CSV reader error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Form or schema validation failure.
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::SerializationError(e.to_string())
    }
}

impl From<ValidationErrors> for CatalogError {
    fn from(e: ValidationErrors) -> Self {
        CatalogError::Validation(e)
    }
}
