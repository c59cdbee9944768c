//! Settings for locating and running the koi CLI
//!
//! Loaded from an optional TOML file:
//!
//! ```toml
//! binary = "/usr/sbin/koi"
//! config_search_paths = ["/etc/koi/koi.conf"]
//! timeout_secs = 3
//! host = "10.0.0.5"
//! port = 42000
//! ```

use crate::error::{KoiError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Daemon configuration files passed to the CLI when they exist
pub const DEFAULT_CONFIG_SEARCH_PATHS: &[&str] = &["/etc/koi/koi.conf"];

pub const DEFAULT_BINARY: &str = "koi";

pub const DEFAULT_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KoiConfig {
    /// Path or name of the koi CLI binary
    pub binary: PathBuf,
    /// Candidate daemon config files, each passed as `-f <file>` if present
    pub config_search_paths: Vec<PathBuf>,
    pub timeout_secs: u64,
    /// Remote host to query instead of the local node
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Default for KoiConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
            config_search_paths: DEFAULT_CONFIG_SEARCH_PATHS
                .iter()
                .map(PathBuf::from)
                .collect(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            host: None,
            port: None,
        }
    }
}

impl KoiConfig {
    /// Settings for a development build of the daemon with its own config files
    pub fn dev(binary: impl Into<PathBuf>, configs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            config_search_paths: configs.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Default location of the client settings file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("koi").join("client.toml"))
    }

    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading client settings from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&content)
    }

    /// Load the given file, else the default settings file if it exists, else defaults
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path).await;
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from_file(&path).await,
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.binary.as_os_str().is_empty() {
            return Err(KoiError::Config("binary must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(KoiError::Config("timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    /// The search paths that exist on disk right now, in search order
    pub fn existing_config_files(&self) -> Vec<PathBuf> {
        self.config_search_paths
            .iter()
            .filter(|p| p.is_file())
            .cloned()
            .collect()
    }
}
