//! Cart module.
//!
//! Contains the cart of requested books and its entries.

mod cart;

pub use cart::{Cart, CartItem};
