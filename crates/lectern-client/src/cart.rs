//! Durable cart.

use crate::ClientError;
use lectern_catalog::prelude::{Book, Cart, CartItem, ComplectationSelection, ItemId};
use lectern_store::{Cache, Persisted};

/// Cache key of the cart.
pub const CART_KEY: &str = "cart";

/// The cart, written through to storage on every change.
#[derive(Debug)]
pub struct CartStore {
    cart: Persisted<Cart>,
}

impl CartStore {
    /// Bind to `cache` without reading it.
    pub fn new(cache: Cache) -> Self {
        Self {
            cart: Persisted::new(cache, CART_KEY),
        }
    }

    /// Load the stored cart, dropping duplicates older clients may have left.
    pub fn rehydrate(&mut self) -> Result<(), ClientError> {
        self.cart.rehydrate();
        if self.cart.state().items.len() > 1 {
            let removed = self.cart.update(Cart::dedupe)?;
            if removed > 0 {
                tracing::info!(removed, "dropped duplicate cart entries");
            }
        }
        Ok(())
    }

    pub fn hydrated(&self) -> bool {
        self.cart.hydrated()
    }

    /// The cart, once hydrated.
    pub fn cart(&self) -> Option<&Cart> {
        self.cart.get()
    }

    /// Items, empty until hydrated.
    pub fn items(&self) -> &[CartItem] {
        self.cart.get().map(|c| c.items.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Add an entry. Returns `false` if its id was already present.
    pub fn add_item(&mut self, item: CartItem) -> Result<bool, ClientError> {
        Ok(self.cart.update(|c| c.add_item(item))?)
    }

    /// Add a book with the currently selected complectation.
    pub fn add_book(
        &mut self,
        book: &Book,
        selection: &ComplectationSelection,
    ) -> Result<bool, ClientError> {
        let item = CartItem::from_book(book, selection)?;
        self.add_item(item)
    }

    /// Remove an entry. Returns whether anything was removed.
    pub fn remove_item(&mut self, id: ItemId) -> Result<bool, ClientError> {
        Ok(self.cart.update(|c| c.remove_item(id))?)
    }

    pub fn clear(&mut self) -> Result<(), ClientError> {
        self.cart.update(Cart::clear)?;
        Ok(())
    }

    /// Ids to send at checkout.
    pub fn ids(&self) -> Vec<ItemId> {
        self.cart.get().map(Cart::ids).unwrap_or_default()
    }
}
