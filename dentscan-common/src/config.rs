//! Bootstrap configuration loading
//!
//! Settings come from a TOML file resolved in priority order:
//! 1. Explicit path (command-line argument or `DENTSCAN_CONFIG`)
//! 2. Platform config file (`<config dir>/dentscan/config.toml`)
//! 3. Compiled defaults (fallback)
//!
//! A missing file is not fatal: a warning is logged and defaults are used.
//! A file that exists but fails to parse is a configuration error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// HTTP bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory where accepted uploads are kept
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Colon-delimited recommendation table (defaults to the table shipped
    /// with dentscan-web, relative to the workspace root)
    #[serde(default = "default_recommendations_path")]
    pub recommendations_path: PathBuf,

    /// Optional JSON reference dataset
    #[serde(default = "default_dataset_path")]
    pub dataset_path: Option<PathBuf>,

    /// Maximum accepted request body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Seconds a login session stays valid
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Login credentials
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Single-user login credentials
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CredentialsConfig {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("static").join("uploads")
}

fn default_recommendations_path() -> PathBuf {
    PathBuf::from("dentscan-web")
        .join("data")
        .join("infection_types.txt")
}

fn default_dataset_path() -> Option<PathBuf> {
    Some(PathBuf::from("dataset"))
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_session_ttl_secs() -> u64 {
    8 * 60 * 60
}

fn default_username() -> String {
    "Mr. Dento".to_string()
}

fn default_password() -> String {
    "2211".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            upload_dir: default_upload_dir(),
            recommendations_path: default_recommendations_path(),
            dataset_path: default_dataset_path(),
            max_upload_bytes: default_max_upload_bytes(),
            session_ttl_secs: default_session_ttl_secs(),
            credentials: CredentialsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration text; absent keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load a specific file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolve and load configuration
    ///
    /// `explicit` is the command-line/environment path. When it is `None` the
    /// platform config file is tried. Missing files fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let candidate = explicit.map(Path::to_path_buf).or_else(default_config_path);

        match candidate {
            Some(path) if path.exists() => {
                let config = Self::load_file(&path)?;
                info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Some(path) => {
                warn!(
                    "Config file {} not found, using built-in defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            None => {
                warn!("Could not determine config directory, using built-in defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Platform config file path, e.g. `~/.config/dentscan/config.toml` on Linux
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dentscan").join("config.toml"))
}
