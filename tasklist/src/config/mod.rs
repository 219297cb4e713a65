//! Configuration system for the `Tasklist` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/tasklist/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::TransportError;
use crate::api::http::{DEFAULT_REQUEST_TIMEOUT, HttpTaskApi};
use crate::sync::DEFAULT_COMMAND_CAPACITY;

/// Base URL used when neither the CLI, the environment nor the file sets one.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    api: ApiFileConfig,
    ui: UiFileConfig,
}

/// `[api]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ApiFileConfig {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
    command_capacity: Option<usize>,
    timestamp_format: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    // -- API --
    /// Origin (and optional path prefix) of the task service.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,

    // -- UI --
    /// Poll timeout for the TUI event loop.
    pub poll_timeout: Duration,
    /// Capacity of the UI → store command channel.
    pub command_capacity: usize,
    /// Format for the "last synced" time in the status bar (chrono).
    pub timestamp_format: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            poll_timeout: Duration::from_millis(50),
            command_capacity: DEFAULT_COMMAND_CAPACITY,
            timestamp_format: "%H:%M:%S".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read,
    /// or if any config file that exists cannot be parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve from CLI args (and their env fallbacks) alone, ignoring any
    /// config file. Used when the file cannot be loaded.
    #[must_use]
    pub fn from_cli(cli: &CliArgs) -> Self {
        Self::resolve(cli, &ConfigFile::default())
    }

    /// Resolve a `ClientConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            base_url: cli
                .base_url
                .clone()
                .or_else(|| file.api.base_url.clone())
                .unwrap_or(defaults.base_url),
            request_timeout: file
                .api
                .request_timeout_secs
                .map_or(defaults.request_timeout, Duration::from_secs),
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            command_capacity: file
                .ui
                .command_capacity
                .unwrap_or(defaults.command_capacity),
            timestamp_format: cli
                .timestamp_format
                .clone()
                .or_else(|| file.ui.timestamp_format.clone())
                .unwrap_or(defaults.timestamp_format),
        }
    }

    /// Builds the HTTP task client described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidBaseUrl`] if `base_url` is unusable.
    pub fn to_api(&self) -> Result<HttpTaskApi, TransportError> {
        HttpTaskApi::new(&self.base_url, self.request_timeout)
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal task list backed by a REST task service")]
pub struct CliArgs {
    /// Base URL of the task service.
    #[arg(long, env = "TASKLIST_API_URL")]
    pub base_url: Option<String>,

    /// Path to config file (default: `~/.config/tasklist/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Format for the "last synced" time (chrono format string).
    #[arg(long)]
    pub timestamp_format: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKLIST_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/tasklist.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and a missing
/// file is treated as empty config.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("tasklist").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
