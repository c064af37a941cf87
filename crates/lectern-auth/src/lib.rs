//! Authentication module for Lectern.
//!
//! Provides the signed-in user, roles, access tokens and the durable auth
//! store that ties them together.
//!
//! The `fake-auth` feature adds a synthetic FAKE-role user. Its tests only
//! build with the feature on:
//!
//! ```text
//! cargo test -p lectern-auth --features fake-auth
//! ```
//!
//! `cargo test-all` (see `.cargo/config.toml`) runs the whole workspace that way.

#[cfg(all(feature = "fake-auth", not(debug_assertions)))]
compile_error!("the `fake-auth` feature must not be enabled in release builds");

mod error;
mod state;
mod token;
mod user;

#[cfg(feature = "fake-auth")]
mod fake;

pub use error::AuthError;
pub use state::{AuthState, AuthStore, Redirect, ACCESS_TOKEN_KEY, AUTH_KEY, LANDING_ROUTE};
pub use token::{AccessToken, TokenPair};
pub use user::{AuthUser, Role, UserProfile, UserRecord};

#[cfg(feature = "fake-auth")]
pub use fake::FakeAuth;
