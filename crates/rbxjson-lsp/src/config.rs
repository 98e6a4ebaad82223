//! User configuration for the rbxjson language server.
//!
//! Configuration is stored at `~/.config/rbxjson/config.json` (or the
//! platform equivalent). Command-line flags override it.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Settings read from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Schema file in [`crate::schema::MemorySchema`]'s JSON format.
    pub schema_path: Option<PathBuf>,
    /// A `tracing_subscriber::EnvFilter` directive string, e.g. `rbxjson_lsp=debug`.
    pub log_filter: Option<String>,
}

impl ServerConfig {
    pub fn from_json_str(path: &Path, content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replace settings with the ones given explicitly.
    pub fn with_overrides(mut self, schema_path: Option<PathBuf>, log_filter: Option<String>) -> Self {
        if schema_path.is_some() {
            self.schema_path = schema_path;
        }
        if log_filter.is_some() {
            self.log_filter = log_filter;
        }
        self
    }
}

/// Error loading the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rbxjson").join("config.json"))
}

/// Load the user configuration from disk.
///
/// Returns `Ok(None)` if there is no config file.
pub fn load_config() -> Result<Option<ServerConfig>, ConfigError> {
    let Some(path) = config_path() else {
        debug!("No config directory available");
        return Ok(None);
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<Option<ServerConfig>, ConfigError> {
    if !path.exists() {
        debug!(?path, "Config file does not exist yet");
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = ServerConfig::from_json_str(path, &content)?;

    info!(?path, schema = ?config.schema_path, "Loaded user config");
    Ok(Some(config))
}
