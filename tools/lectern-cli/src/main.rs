//! Lectern CLI - Command line client for the library backend.
//!
//! Commands:
//! - `lectern login` / `signup` / `logout` / `whoami` - Account
//! - `lectern books` - Browse and manage the catalog
//! - `lectern cart` / `checkout` - Request books
//! - `lectern orders` - Review orders
//! - `lectern users` / `profile` - Manage users
//! - `lectern report` - Download the analytics report
//! - `lectern config` - Manage configuration

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::{
    BooksArgs, CartArgs, ConfigArgs, LoginArgs, OrdersArgs, ProfileArgs, ReportArgs, SignupArgs,
    UsersArgs,
};

/// Lectern - Browse, request and manage library books
#[derive(Parser)]
#[command(name = "lectern")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in
    Login(LoginArgs),

    /// Create an account
    Signup(SignupArgs),

    /// Sign out and forget the stored token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Browse and manage books
    Books(BooksArgs),

    /// Manage the cart
    Cart(CartArgs),

    /// Order everything in the cart
    Checkout,

    /// List and review orders
    Orders(OrdersArgs),

    /// Manage users
    Users(UsersArgs),

    /// Edit your profile
    Profile(ProfileArgs),

    /// Download the analytics report
    Report(ReportArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let mut ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    init_tracing(cli.verbose, ctx.config.mode.log_filter());

    // Execute command
    let result = match cli.command {
        Commands::Login(args) => commands::auth::login(args, &mut ctx).await,
        Commands::Signup(args) => commands::auth::signup(args, &mut ctx).await,
        Commands::Logout => commands::auth::logout(&mut ctx).await,
        Commands::Whoami => commands::auth::whoami(&mut ctx).await,
        Commands::Books(args) => commands::books::run(args, &mut ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &mut ctx).await,
        Commands::Checkout => commands::cart::checkout(&mut ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &mut ctx).await,
        Commands::Users(args) => commands::users::run(args, &mut ctx).await,
        Commands::Profile(args) => commands::users::profile(args, &mut ctx).await,
        Commands::Report(args) => commands::report::run(args, &mut ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&context::describe_error(&e));
        std::process::exit(1);
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins, then `--verbose`, then the client mode.
fn init_tracing(verbose: bool, mode_filter: &str) {
    let default = if verbose { "debug" } else { mode_filter };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
