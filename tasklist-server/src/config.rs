//! Server settings, resolved from `--flags` (with env fallbacks), the
//! `[server]` table of `~/.config/tasklist-server/config.toml`, and
//! compiled defaults, in that order.
//!
//! Values are checked while resolving: the bind address must parse as a
//! socket address and the body limit must admit the largest valid task.

use std::net::{AddrParseError, SocketAddr};
use std::path::{Path, PathBuf};

use tasklist_proto::task::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};

/// Address the server listens on by default.
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 8000);

/// Default maximum accepted request body size in bytes (16 KB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 16 * 1024;

/// Smallest accepted body limit.
///
/// Both fields at their length limit with every char escaped as `\uXXXX`,
/// plus the JSON envelope.
pub const MIN_BODY_SIZE: usize = (MAX_TITLE_LENGTH + MAX_DESCRIPTION_LENGTH) * 6 + 64;

/// Errors that can occur when loading server configuration.
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

    /// The file is not valid TOML or has unknown keys.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The bind address is not `ip:port`.
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBindAddr {
        /// The rejected value.
        value: String,
        /// Parser error.
        source: AddrParseError,
    },

    /// The body limit would reject valid tasks.
    #[error("max body size {limit} is below the minimum of {MIN_BODY_SIZE} bytes")]
    BodyLimitTooSmall {
        /// The rejected limit.
        limit: usize,
    },
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    server: ServerSection,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ServerSection {
    bind_addr: Option<String>,
    max_body_size: Option<usize>,
}

/// CLI arguments for the task server.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Tasklist REST task server")]
pub struct ServerCliArgs {
    /// Address to listen on, as `ip:port`.
    #[arg(short, long, env = "TASKLIST_SERVER_ADDR")]
    pub bind: Option<String>,

    /// Path to config file (default: `~/.config/tasklist-server/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum accepted request body size in bytes.
    #[arg(long)]
    pub max_body_size: Option<usize>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKLIST_SERVER_LOG")]
    pub log_level: String,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub bind_addr: SocketAddr,
    /// Maximum accepted request body size in bytes.
    pub max_body_size: usize,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit `--config` file is missing,
    /// any file that exists cannot be parsed, or a resolved value is invalid.
    pub fn load(cli: &ServerCliArgs) -> Result<Self, ConfigError> {
        let file = read_file(cli.config.as_deref())?;
        Self::resolve(cli, file)
    }

    fn resolve(cli: &ServerCliArgs, file: FileConfig) -> Result<Self, ConfigError> {
        let bind_addr = match cli.bind.clone().or(file.server.bind_addr) {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidBindAddr { value, source })?,
            None => DEFAULT_BIND_ADDR,
        };

        let max_body_size = cli
            .max_body_size
            .or(file.server.max_body_size)
            .unwrap_or(DEFAULT_MAX_BODY_SIZE);
        if max_body_size < MIN_BODY_SIZE {
            return Err(ConfigError::BodyLimitTooSmall {
                limit: max_body_size,
            });
        }

        Ok(Self {
            bind_addr,
            max_body_size,
            log_level: cli.log_level.clone(),
        })
    }
}

/// Reads the explicit file, or the default one if it exists.
fn read_file(explicit: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => match dirs::config_dir() {
            Some(dir) => (dir.join("tasklist-server").join("config.toml"), false),
            None => return Ok(FileConfig::default()),
        },
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
            Ok(FileConfig::default())
        }
        Err(source) => Err(ConfigError::ReadFile { path, source }),
    }
}
