//! Durable key/value storage for Lectern client state.
//!
//! Provides a small JSON cache with a directory backend for state that must
//! survive restarts, and an in-memory backend for tests and ephemeral runs.
//! [`Persisted`] wraps a single cache slot with a versioned envelope and an
//! explicit hydration flag.
//!
//! # Example
//!
//! ```rust,ignore
//! use lectern_store::{Cache, Persisted};
//!
//! let cache = Cache::open_dir("~/.lectern")?;
//!
//! let mut cart: Persisted<Cart> = Persisted::new(cache.clone(), "cart");
//! cart.rehydrate();
//! cart.update(|c| c.clear())?;
//! ```

mod error;
mod kv;
mod persisted;

pub use error::StoreError;
pub use kv::Cache;
pub use persisted::{Persisted, STATE_VERSION};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, Persisted, StoreError};
}
