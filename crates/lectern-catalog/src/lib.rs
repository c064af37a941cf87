//! Catalog domain types and client-side logic for Lectern.
//!
//! This crate holds the shapes exchanged with the library backend and the
//! bookkeeping the client performs on them:
//!
//! - **Catalog**: Books, authors, complectations and the selection cursor
//! - **Cart**: Id-unique cart of requested books
//! - **Search**: Filter metadata, user selections and query-parameter flattening
//! - **Checkout**: Orders and their statuses
//! - **Schema**: Form validation rules (sign in, sign up, profile)
//!
//! # Example
//!
//! ```rust,ignore
//! use lectern_catalog::prelude::*;
//!
//! let mut cart = Cart::new();
//! let item = CartItem::from_book(&book, &ComplectationSelection::first_of(&book.complectations))?;
//! assert!(cart.add_item(item.clone()));
//! assert!(!cart.add_item(item)); // second add is a no-op
//!
//! let params = BookQuery::new()
//!     .with_search_term("rust")
//!     .with_selection(selection)
//!     .to_query_pairs();
//! ```

pub mod error;
pub mod ids;
pub mod price;
pub mod text;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod schema;
pub mod search;

pub use error::CatalogError;
pub use ids::*;
pub use price::Price;
pub use schema::ValidationErrors;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CatalogError;
    pub use crate::ids::*;
    pub use crate::price::Price;

    // Catalog
    pub use crate::catalog::{
        parse_import_csv, Author, Book, BookDraft, BookSummary, Complectation,
        ComplectationDraft, ComplectationSelection, ImportRow,
    };

    // Cart
    pub use crate::cart::{Cart, CartItem};

    // Checkout
    pub use crate::checkout::{Order, OrderStatus, StatusFilter};

    // Schema
    pub use crate::schema::{ProfileEditForm, SignInForm, SignUpForm, ValidationErrors};

    // Search
    pub use crate::search::{
        flatten_filters, BookQuery, FilterSelection, Filters, FlattenOptions, PageRange,
        QueryValue,
    };
}
