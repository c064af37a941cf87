//! Search module.
//!
//! Contains filter metadata, user filter selections and the flattening of
//! nested selections into query parameters.

mod filter;
mod flatten;
mod query;

pub use filter::{FilterSelection, Filters, PageRange};
pub use flatten::{flatten_filters, FlattenOptions, QueryValue};
pub use query::BookQuery;
