//! Application settings loading from config.toml
//!
//! Every field has a default, so the file is optional. `DATABASE_URL` in the
//! environment (or a `.env` file loaded by the binary) overrides the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

use super::database::DEFAULT_DATABASE_URL;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_VAR: &str = "FINANCE_CONFIG";

/// Config file read when [`CONFIG_PATH_VAR`] is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Settings for the whole application.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// `SQLite` connection URL
    pub database_url: String,
    /// How many change notifications a live query may fall behind before it
    /// coalesces them into a single re-query
    pub change_channel_capacity: usize,
    /// Default row limit for the recent-transactions query
    pub recent_limit: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            change_channel_capacity: 64,
            recent_limit: 10,
        }
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses settings from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if config.change_channel_capacity == 0 {
        return Err(Error::Config {
            message: "change_channel_capacity must be at least 1".to_string(),
        });
    }

    Ok(config)
}

/// Builds the effective configuration for the running process.
///
/// Reads the file named by `FINANCE_CONFIG`, or `config.toml` if it exists, and then
/// applies the `DATABASE_URL` override. A missing default file is not an error; a
/// missing file named explicitly by `FINANCE_CONFIG` is.
pub fn load_app_configuration() -> Result<AppConfig> {
    let mut config = match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) => load_config(path)?,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH)?,
        Err(_) => {
            tracing::info!("No config file found, using defaults");
            AppConfig::default()
        }
    };

    if let Ok(url) = std::env::var("DATABASE_URL") {
        tracing::debug!("DATABASE_URL overrides configured database_url");
        config.database_url = url;
    }

    Ok(config)
}
