//! Complectations (purchasable variants) and the selection cursor.

use crate::catalog::Book;
use crate::error::CatalogError;
use crate::ids::ComplectationId;
use crate::price::Price;
use crate::schema::ValidationErrors;
use serde::{Deserialize, Serialize};

/// A purchasable variant of a catalog item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Complectation {
    pub id: ComplectationId,
    pub model: String,
    pub description: String,
    pub price: Price,
}

/// Complectation fields sent when adding or editing a variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ComplectationDraft {
    pub model: String,
    pub description: String,
    pub price: Price,
}

impl ComplectationDraft {
    /// Validate the draft before sending it.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.model.trim().is_empty() {
            errors.push("model", "Model must not be empty");
        }
        if self.description.trim().is_empty() {
            errors.push("description", "Description must not be empty");
        }
        if self.price.is_zero() {
            errors.push("price", "Price must be positive");
        }
        errors.into_result()
    }

    fn into_complectation(self, id: ComplectationId) -> Complectation {
        Complectation {
            id,
            model: self.model,
            description: self.description,
            price: self.price,
        }
    }
}

/// The complectation currently shown and targeted by mutations.
///
/// Only the id is stored. The display index is looked up from the current
/// list every time it is needed, so adding or removing variants can never
/// leave the shown variant and the mutation target pointing at different
/// records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComplectationSelection {
    selected: Option<ComplectationId>,
}

impl ComplectationSelection {
    /// Nothing selected.
    pub fn none() -> Self {
        Self::default()
    }

    /// Select the first complectation of a freshly fetched list.
    pub fn first_of(list: &[Complectation]) -> Self {
        Self {
            selected: list.first().map(|c| c.id),
        }
    }

    /// Selected id, if any.
    pub fn id(&self) -> Option<ComplectationId> {
        self.selected
    }

    /// Select by id.
    pub fn select(&mut self, id: ComplectationId) {
        self.selected = Some(id);
    }

    /// Select the entry shown at `index`. Returns `false` if out of range.
    pub fn select_index(&mut self, list: &[Complectation], index: usize) -> bool {
        match list.get(index) {
            Some(c) => {
                self.selected = Some(c.id);
                true
            }
            None => false,
        }
    }

    /// Display index of the selection within `list`.
    pub fn index_in(&self, list: &[Complectation]) -> Option<usize> {
        let id = self.selected?;
        list.iter().position(|c| c.id == id)
    }

    /// The selected complectation within `list`.
    pub fn current<'a>(&self, list: &'a [Complectation]) -> Option<&'a Complectation> {
        self.index_in(list).map(|i| &list[i])
    }

    /// Re-anchor after the list changed shape.
    ///
    /// Keeps the selection when its id is still present, otherwise falls back
    /// to the first entry, or clears when the list is empty.
    pub fn reconcile(&mut self, list: &[Complectation]) {
        if self.index_in(list).is_none() {
            *self = Self::first_of(list);
        }
    }

    /// Id to delete when removing the selection from `list`.
    ///
    /// The last remaining complectation of an item cannot be removed.
    pub fn removal_target(&self, list: &[Complectation]) -> Result<ComplectationId, CatalogError> {
        let id = self.selected.ok_or(CatalogError::NoSelection)?;
        if self.index_in(list).is_none() {
            return Err(CatalogError::ComplectationNotFound(id.to_string()));
        }
        if list.len() < 2 {
            return Err(CatalogError::LastComplectation);
        }
        Ok(id)
    }

    /// Produce an updated copy of `book` with the selected complectation
    /// replaced by `draft`. The original book is left untouched.
    pub fn apply_edit(&self, book: &Book, draft: ComplectationDraft) -> Result<Book, CatalogError> {
        let id = self.selected.ok_or(CatalogError::NoSelection)?;
        let index = self
            .index_in(&book.complectations)
            .ok_or_else(|| CatalogError::ComplectationNotFound(id.to_string()))?;

        let mut updated = book.clone();
        updated.complectations[index] = draft.into_complectation(id);
        Ok(updated)
    }
}
