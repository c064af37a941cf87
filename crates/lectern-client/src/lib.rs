//! Lectern client.
//!
//! Ties the catalog types, durable stores and HTTP plumbing together:
//!
//! - [`LibraryApi`]: one method per backend endpoint
//! - [`Session`]: sign-in, cart, checkout and administration flows
//! - [`ClientConfig`]: TOML configuration with environment overrides
//!
//! # Example
//!
//! ```rust,ignore
//! use lectern_client::prelude::*;
//!
//! let config = ClientConfig::resolve(None, &std::env::current_dir()?)?;
//! let mut session = Session::from_config(&config)?;
//! session.boot()?;
//!
//! let notice = session.sign_in(&SignInForm::new("ann@lectern.dev", "secret")).await?;
//! println!("{}", notice.message);
//! ```

mod api;
mod cart;
mod config;
mod error;
mod notice;
mod search;
mod session;

pub use api::{LibraryApi, Report, DEFAULT_REPORT_FILE_NAME};
pub use cart::{CartStore, CART_KEY};
pub use config::{
    generate_default_config, ClientConfig, ClientMode, CONFIG_FILE_NAMES, ENV_BASE_URL,
    ENV_CLIENT_MODE, ENV_STORAGE_DIR,
};
pub use error::ClientError;
pub use notice::{Notice, NoticeKind, DEFAULT_NOTICE_DURATION};
pub use search::{SearchGuard, SearchTicket};
pub use session::{Session, PROFILE_UPDATED_MESSAGE, SIGNED_IN_MESSAGE, SIGNED_UP_MESSAGE};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        ClientConfig, ClientError, ClientMode, LibraryApi, Notice, NoticeKind, Session,
    };
    pub use lectern_auth::{AuthUser, Role};
    pub use lectern_catalog::prelude::*;
}
