//! Catalog module.
//!
//! Contains types for books, authors, complectations and bulk imports.

mod author;
mod book;
mod complectation;
mod import;

pub use author::Author;
pub use book::{Book, BookDraft, BookSummary};
pub use complectation::{Complectation, ComplectationDraft, ComplectationSelection};
pub use import::{parse_import_csv, ImportAuthor, ImportRow};
