//! Book list query builder.

use crate::search::{flatten_filters, FilterSelection, FlattenOptions};
use serde::{Deserialize, Serialize};

/// A book list query.
///
/// Combines the search bar term with the filter panel selection. The search
/// bar term wins over a term carried in the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookQuery {
    pub search_term: Option<String>,
    pub selection: FilterSelection,
}

impl BookQuery {
    /// Create an empty query (lists everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search term. Blank terms are ignored.
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        let trimmed = term.trim();
        self.search_term = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Set the filter selection.
    pub fn with_selection(mut self, selection: FilterSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Check if the query carries nothing.
    pub fn is_empty(&self) -> bool {
        self.to_query_pairs().is_empty()
    }

    /// Render as query-string pairs in key order.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut selection = self.selection.clone();
        if let Some(term) = &self.search_term {
            selection.search_term = Some(term.clone());
        }

        flatten_filters(&selection.to_value(), FlattenOptions::default())
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k, v.to_string()))
            .collect()
    }
}
