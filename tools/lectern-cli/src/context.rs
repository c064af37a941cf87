//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use lectern_client::{ClientConfig, ClientError, Session};

use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Resolved client configuration.
    pub config: ClientConfig,
    /// Config file the configuration came from, if any.
    pub config_file: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    session: Option<Session>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let explicit = config_path.map(PathBuf::from);
        let config_file = explicit.clone().or_else(|| ClientConfig::find(&cwd));
        let config = ClientConfig::resolve(explicit.as_deref(), &cwd)
            .context("Failed to load configuration")?;

        Ok(Self {
            config,
            config_file,
            output,
            cwd,
            session: None,
        })
    }

    /// The client session, opened and rehydrated on first use.
    pub fn session(&mut self) -> Result<&mut Session> {
        if self.session.is_none() {
            let mut session = Session::from_config(&self.config).with_context(|| {
                format!(
                    "Failed to open client state in {}",
                    self.config.storage_dir.display()
                )
            })?;
            session.boot().context("Failed to restore client state")?;
            self.output.debug(&format!(
                "Using {} with state in {}",
                self.config.base_url,
                self.config.storage_dir.display()
            ));
            self.session = Some(session);
        }
        self.session
            .as_mut()
            .context("Client session is not available")
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// Error text for the terminal.
///
/// Client errors show the same message the library would show inline;
/// `--verbose` style detail stays in the log.
pub fn describe_error(e: &anyhow::Error) -> String {
    match e.downcast_ref::<ClientError>() {
        Some(client) => {
            tracing::debug!(error = %format!("{:#}", e), "command failed");
            client.user_message()
        }
        None => format!("{:#}", e),
    }
}
