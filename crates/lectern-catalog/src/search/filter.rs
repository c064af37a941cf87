//! Filter metadata and user selections.

use crate::catalog::Author;
use crate::ids::AuthorId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// An inclusive page-count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageRange {
    pub min: u32,
    pub max: u32,
}

impl PageRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Swap the bounds when given in the wrong order.
    pub fn normalized(self) -> Self {
        if self.min > self.max {
            Self {
                min: self.max,
                max: self.min,
            }
        } else {
            self
        }
    }

    /// Check if a page count falls within the range.
    pub fn contains(&self, pages: u32) -> bool {
        pages >= self.min && pages <= self.max
    }
}

/// Filter metadata served by the backend.
///
/// An older backend revision answers with `{}`; that decodes to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default, alias = "numPages")]
    pub num_pages: PageRange,
    #[serde(default)]
    pub authors: Vec<Author>,
}

impl Filters {
    /// Whether the metadata carries anything to filter on.
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty() && self.num_pages == PageRange::default()
    }

    /// A selection spanning the full page range with nothing else chosen.
    pub fn default_selection(&self) -> FilterSelection {
        FilterSelection {
            num_pages: (!self.is_empty()).then_some(self.num_pages),
            ..FilterSelection::default()
        }
    }
}

/// Filter values chosen by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    /// `None` means "any".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<bool>,
    #[serde(default)]
    pub authors: Vec<AuthorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_pages: Option<PageRange>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn with_availability(mut self, available: bool) -> Self {
        self.availability = Some(available);
        self
    }

    pub fn with_author(mut self, id: AuthorId) -> Self {
        if !self.authors.contains(&id) {
            self.authors.push(id);
        }
        self
    }

    pub fn with_page_range(mut self, min: u32, max: u32) -> Self {
        self.num_pages = Some(PageRange::new(min, max).normalized());
        self
    }

    /// The nested object handed to the flattener.
    ///
    /// Availability travels as the text `"true"`/`"false"` so that an explicit
    /// "not available" choice is not mistaken for an unset value.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(term) = &self.search_term {
            map.insert("search_term".to_string(), Value::String(term.trim().to_string()));
        }
        if let Some(available) = self.availability {
            map.insert("availability".to_string(), Value::String(available.to_string()));
        }
        map.insert("authors".to_string(), json!(self.authors));
        if let Some(range) = self.num_pages {
            map.insert("num_range".to_string(), json!({"min": range.min, "max": range.max}));
        }
        Value::Object(map)
    }
}
