//! Checkout module.
//!
//! Contains orders and their review statuses.

mod order;

pub use order::{Order, OrderStatus, StatusFilter};
