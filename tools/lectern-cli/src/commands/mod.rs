//! CLI command implementations.

pub mod auth;
pub mod books;
pub mod cart;
pub mod complectations;
pub mod config;
pub mod orders;
pub mod report;
pub mod users;

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted).
    #[arg(short, long)]
    pub email: Option<String>,

    /// Sign in as the synthetic development user instead.
    #[cfg(feature = "fake-auth")]
    #[arg(long)]
    pub fake: bool,
}

/// Arguments for the signup command.
#[derive(Args)]
pub struct SignupArgs {
    #[arg(short, long)]
    pub email: Option<String>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,
}

/// Arguments for the books command.
#[derive(Args)]
pub struct BooksArgs {
    #[command(subcommand)]
    pub command: BooksCommand,
}

#[derive(Subcommand)]
pub enum BooksCommand {
    /// Search the catalog.
    List {
        /// Free-text search.
        #[arg(short, long)]
        search: Option<String>,

        /// Only books by these author ids.
        #[arg(short, long = "author")]
        authors: Vec<i64>,

        /// Minimum page count.
        #[arg(long, requires = "max")]
        min: Option<u32>,

        /// Maximum page count.
        #[arg(long, requires = "min")]
        max: Option<u32>,

        /// Only available (`true`) or lent out (`false`) books.
        #[arg(long)]
        available: Option<bool>,
    },
    /// Show one book.
    Show {
        /// Book id.
        id: i64,
    },
    /// Show the filter values the catalog offers.
    Filters,
    /// List all authors.
    Authors,
    /// Books currently lent to you.
    Mine,
    /// Upload books from a `;`-delimited CSV file.
    Import {
        /// CSV file path.
        file: PathBuf,
    },
    /// Mark a lent book as returned.
    Return {
        /// Book id.
        id: i64,
    },
    /// Delete a book.
    Delete {
        /// Book id.
        id: i64,

        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Manage a book's complectations.
    Complectation {
        #[command(subcommand)]
        command: ComplectationCommand,
    },
}

/// Which complectation of a book to act on (default: the first).
#[derive(Args)]
pub struct ComplectationTarget {
    /// Complectation id.
    #[arg(short, long, conflicts_with = "index")]
    pub complectation: Option<i64>,

    /// Position as listed by `books show`, starting at 1.
    #[arg(short, long)]
    pub index: Option<usize>,
}

#[derive(Subcommand)]
pub enum ComplectationCommand {
    /// Add a complectation to a book.
    Add {
        /// Book id.
        id: i64,

        #[arg(long)]
        model: String,

        #[arg(long)]
        description: String,

        /// Price, e.g. `12.50`.
        #[arg(long)]
        price: f64,
    },
    /// Edit a complectation. Omitted fields are prompted for.
    Edit {
        /// Book id.
        id: i64,

        #[command(flatten)]
        target: ComplectationTarget,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        price: Option<f64>,
    },
    /// Remove a complectation. The last one of a book cannot be removed.
    Remove {
        /// Book id.
        id: i64,

        #[command(flatten)]
        target: ComplectationTarget,

        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add a book to the cart.
    Add {
        /// Book id.
        id: i64,

        /// Complectation id (default: the book's first).
        #[arg(short, long)]
        complectation: Option<i64>,
    },
    /// Remove a book from the cart.
    Remove {
        /// Book id.
        id: i64,
    },
    /// List the cart.
    List,
    /// Empty the cart.
    Clear,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List orders.
    List {
        /// Comma separated statuses, e.g. `pending,approved`.
        #[arg(short, long)]
        state: Option<String>,
    },
    /// Approve a pending order.
    Approve {
        /// Order id.
        id: i64,
    },
    /// Reject a pending order.
    Reject {
        /// Order id.
        id: i64,
    },
}

/// Arguments for the users command.
#[derive(Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Subcommand)]
pub enum UsersCommand {
    /// List users.
    List,
    /// Delete a user.
    Delete {
        /// User id.
        id: i64,

        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the profile command.
#[derive(Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Change your name or email. Omitted fields are prompted for.
    Edit {
        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,
    },
}

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Output file path (default: the name the server suggests).
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
