//! Client configuration.

use crate::ClientError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// File names searched for, nearest directory first.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["lectern.toml", ".lectern.toml"];

pub const ENV_BASE_URL: &str = "LECTERN_BASE_URL";
pub const ENV_CLIENT_MODE: &str = "LECTERN_CLIENT_MODE";
pub const ENV_STORAGE_DIR: &str = "LECTERN_STORAGE_DIR";

/// Build mode of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientMode {
    Development,
    #[default]
    Production,
}

impl ClientMode {
    pub fn is_development(&self) -> bool {
        matches!(self, ClientMode::Development)
    }

    /// Default log filter for this mode.
    pub fn log_filter(&self) -> &'static str {
        match self {
            ClientMode::Development => "debug",
            ClientMode::Production => "warn",
        }
    }
}

impl FromStr for ClientMode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(ClientMode::Development),
            "production" | "prod" => Ok(ClientMode::Production),
            other => Err(ClientError::Config(format!("unknown client mode '{}'", other))),
        }
    }
}

/// Client configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend root URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory holding the durable client state.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    #[serde(default)]
    pub mode: ClientMode,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_storage_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".local").join("share").join("lectern"),
        None => PathBuf::from(".lectern"),
    }
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            storage_dir: default_storage_dir(),
            mode: ClientMode::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Load config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| ClientError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Save config as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ClientError> {
        let path = path.as_ref();
        let content =
            toml::to_string_pretty(self).map_err(|e| ClientError::Config(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| {
            ClientError::Config(format!("failed to write {}: {}", path.display(), e))
        })
    }

    /// Find the nearest config file from `start` upwards.
    pub fn find(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_FILE_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load an explicit file, else the nearest one, else defaults; then apply
    /// environment overrides.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ClientError> {
        let config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::find(cwd) {
                Some(path) => Self::load(path)?,
                None => Self::default(),
            },
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `LECTERN_*` overrides read through `lookup`.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ClientError> {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(mode) = lookup(ENV_CLIENT_MODE).filter(|v| !v.trim().is_empty()) {
            self.mode = mode.parse()?;
        }
        if let Some(dir) = lookup(ENV_STORAGE_DIR).filter(|v| !v.trim().is_empty()) {
            self.storage_dir = PathBuf::from(dir);
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Generate a default lectern.toml config file.
pub fn generate_default_config() -> String {
    r#"# Lectern client configuration

# Library backend root URL
base_url = "http://localhost:8000"

# Where the signed-in user, token and cart are kept
# storage_dir = "/home/me/.local/share/lectern"

# "development" turns on debug logging
mode = "production"

timeout_secs = 30
"#
    .to_string()
}
