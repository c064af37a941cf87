//! Book (catalog item) types.

use crate::catalog::{Author, Complectation};
use crate::ids::{AuthorId, ComplectationId, ItemId};
use crate::schema::ValidationErrors;
use serde::{Deserialize, Serialize};

/// A book in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Unique book identifier.
    pub id: ItemId,
    /// Book title.
    pub title: String,
    /// ISBN as printed (may contain hyphens).
    pub isbn: String,
    /// Number of pages.
    #[serde(alias = "numPages")]
    pub num_pages: u32,
    /// Authors of the book.
    #[serde(default)]
    pub authors: Vec<Author>,
    /// Purchasable variants. Empty for library-only records.
    #[serde(default)]
    pub complectations: Vec<Complectation>,
}

impl Book {
    /// Find a complectation by id.
    pub fn complectation(&self, id: ComplectationId) -> Option<&Complectation> {
        self.complectations.iter().find(|c| c.id == id)
    }

    /// Author names joined for display.
    pub fn author_names(&self) -> String {
        self.authors
            .iter()
            .map(Author::full_name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Convert to a draft for editing, keeping author ids and complectations.
    pub fn to_draft(&self) -> BookDraft {
        BookDraft {
            title: self.title.clone(),
            isbn: self.isbn.clone(),
            num_pages: self.num_pages,
            authors: self.authors.iter().map(|a| a.id).collect(),
            complectations: self.complectations.clone(),
        }
    }

    /// Short form used in order lines.
    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id,
            title: self.title.clone(),
            isbn: self.isbn.clone(),
            num_pages: self.num_pages,
        }
    }
}

/// Book fields sent when creating or editing a book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BookDraft {
    pub title: String,
    pub isbn: String,
    pub num_pages: u32,
    /// Author ids to attach.
    pub authors: Vec<AuthorId>,
    /// Existing variants, sent back in full when editing. Never sent when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub complectations: Vec<Complectation>,
}

impl BookDraft {
    /// Validate the draft before sending it.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.title.trim().is_empty() {
            errors.push("title", "Title must not be empty");
        }

        let isbn = self.isbn.trim();
        if isbn.is_empty() {
            errors.push("isbn", "ISBN must not be empty");
        } else if !isbn
            .chars()
            .all(|c| c.is_ascii_digit() || c == '-' || c == 'X' || c == 'x')
        {
            errors.push("isbn", "ISBN may contain only digits, hyphens and X");
        }

        if self.num_pages == 0 {
            errors.push("num_pages", "Number of pages must be positive");
        }

        if self
            .complectations
            .iter()
            .any(|c| c.model.trim().is_empty() || c.price.is_zero())
        {
            errors.push("complectations", "Every complectation needs a model and a price");
        }

        errors.into_result()
    }
}

/// Book without authors, as listed in orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookSummary {
    pub id: ItemId,
    pub title: String,
    pub isbn: String,
    #[serde(alias = "numPages")]
    pub num_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": 1,
            "title": "Programming Rust",
            "isbn": "978-5-04-195039-2",
            "num_pages": 550,
            "authors": [
                {"id": 1, "first_name": "Jason", "last_name": "Orendorff", "origin": "USA"},
                {"id": 2, "first_name": "Jim", "last_name": "Blandy", "origin": "USA"}
            ]
        }"#
    }

    #[test]
    fn test_deserialize_library_book() {
        let book: Book = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(book.id, ItemId::new(1));
        assert!(book.complectations.is_empty());
        assert_eq!(book.author_names(), "Jason Orendorff, Jim Blandy");
    }

    #[test]
    fn test_to_draft_keeps_author_ids() {
        let book: Book = serde_json::from_str(sample_json()).unwrap();
        let draft = book.to_draft();
        assert_eq!(draft.authors, vec![AuthorId::new(1), AuthorId::new(2)]);
        assert!(draft.validate().is_ok());

        // Library records have no variants, so the key is left out.
        let body = serde_json::to_value(&draft).unwrap();
        assert!(body.get("complectations").is_none());
    }

    #[test]
    fn test_to_draft_carries_complectations() {
        let mut book: Book = serde_json::from_str(sample_json()).unwrap();
        book.complectations.push(Complectation {
            id: ComplectationId::new(3),
            model: "Soft".to_string(),
            description: "Paperback".to_string(),
            price: crate::Price::from_cents(900),
        });

        let draft = book.to_draft();
        assert!(draft.validate().is_ok());
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["complectations"][0]["id"], 3);
        assert_eq!(body["complectations"][0]["model"], "Soft");

        let mut broken = draft.clone();
        broken.complectations[0].model.clear();
        let errors = broken.validate().unwrap_err();
        assert!(errors.get("complectations").is_some());
    }

    #[test]
    fn test_draft_validation() {
        let draft = BookDraft {
            title: "  ".to_string(),
            isbn: "97A".to_string(),
            num_pages: 0,
            authors: vec![],
            complectations: vec![],
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("title"), Some("Title must not be empty"));
        assert!(errors.get("isbn").is_some());
        assert!(errors.get("num_pages").is_some());
    }
}
