//! Cart and cart item types.

use crate::catalog::{Author, Book, Complectation, ComplectationSelection};
use crate::error::CatalogError;
use crate::ids::ItemId;
use crate::price::Price;
use serde::{Deserialize, Serialize};

/// A cart of requested books.
///
/// Entries are unique by item id. The cart carries no timestamps or owner;
/// it is the durable client-side list and nothing more.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Items in insertion order.
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item to the cart.
    ///
    /// Adding an id that is already present leaves the cart unchanged and
    /// returns `false`.
    pub fn add_item(&mut self, item: CartItem) -> bool {
        if self.contains(item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove every entry with the given id. Returns whether anything was removed.
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() < len_before
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drop repeated ids, keeping the first occurrence.
    ///
    /// Carts persisted by older clients were append-only and may hold
    /// duplicates. Returns the number of entries removed.
    pub fn dedupe(&mut self) -> usize {
        let len_before = self.items.len();
        let mut seen = std::collections::HashSet::new();
        self.items.retain(|i| seen.insert(i.id));
        len_before - self.items.len()
    }

    /// Check if an id is in the cart.
    pub fn contains(&self, id: ItemId) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    /// Get an item by id.
    pub fn get_item(&self, id: ItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item ids in cart order; this is the checkout payload.
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|i| i.id).collect()
    }

    /// Sum of the selected complectation prices.
    ///
    /// Entries without a complectation count as free.
    pub fn total_price(&self) -> Result<Price, CatalogError> {
        Price::try_sum(
            self.items
                .iter()
                .filter_map(|i| i.complectation.as_ref().map(|c| c.price)),
        )
        .ok_or(CatalogError::Overflow)
    }
}

/// An entry in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub id: ItemId,
    pub title: String,
    pub isbn: String,
    #[serde(alias = "numPages")]
    pub num_pages: u32,
    #[serde(default)]
    pub authors: Vec<Author>,
    /// The variant chosen when the item was added, if the item has any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complectation: Option<Complectation>,
}

impl CartItem {
    /// Prepare a cart entry from a book.
    ///
    /// Books with complectations must have one selected; only that one is
    /// carried into the cart.
    pub fn from_book(
        book: &Book,
        selection: &ComplectationSelection,
    ) -> Result<Self, CatalogError> {
        let complectation = if book.complectations.is_empty() {
            None
        } else {
            let current = selection
                .current(&book.complectations)
                .ok_or(CatalogError::NoSelection)?;
            Some(current.clone())
        };

        Ok(Self {
            id: book.id,
            title: book.title.clone(),
            isbn: book.isbn.clone(),
            num_pages: book.num_pages,
            authors: book.authors.clone(),
            complectation,
        })
    }

    /// One-line listing: title followed by the first author's short name.
    pub fn display_line(&self) -> String {
        match self.authors.first() {
            Some(author) => format!("{} {}", self.title, author.short_name()),
            None => self.title.clone(),
        }
    }
}
