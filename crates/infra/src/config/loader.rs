//! Configuration loader
//!
//! Loads the Opsview connection settings from environment variables or a file.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If any is missing, falls back to loading from file
//! 3. The file is `$OPSVIEW_CONFIG`, or `/etc/puppet/opsview.conf` when unset
//! 4. Supports YAML (default), TOML and JSON, detected by file extension
//!
//! ## Environment Variables
//! - `OPSVIEW_URL`: Base URL of the REST API
//! - `OPSVIEW_USERNAME`: API user
//! - `OPSVIEW_PASSWORD`: API password
//! - `OPSVIEW_TIMEOUT`: Request and reload timeout in seconds
//! - `OPSVIEW_CONFIG`: Path of the configuration file
//!
//! A configuration that cannot be loaded is fatal: callers should abort
//! instead of running with partial settings.

use std::path::{Path, PathBuf};

use opsview_domain::constants::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use opsview_domain::{Configuration, OpsviewError, Result};

pub const URL_ENV: &str = "OPSVIEW_URL";
pub const USERNAME_ENV: &str = "OPSVIEW_USERNAME";
pub const PASSWORD_ENV: &str = "OPSVIEW_PASSWORD";
pub const TIMEOUT_ENV: &str = "OPSVIEW_TIMEOUT";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variable is missing, falls back to loading from the config file.
///
/// # Errors
/// Returns `OpsviewError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing or invalid
pub fn load() -> Result<Configuration> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            tracing::debug!(?config, "Resolved configuration");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// All four variables must be present.
///
/// # Errors
/// Returns `OpsviewError::Config` if a variable is missing or has an invalid
/// value.
pub fn load_from_env() -> Result<Configuration> {
    let url = env_var(URL_ENV)?;
    let username = env_var(USERNAME_ENV)?;
    let password = env_var(PASSWORD_ENV)?;
    let timeout = env_var(TIMEOUT_ENV).and_then(|s| {
        s.trim()
            .parse::<u64>()
            .map_err(|e| OpsviewError::Config(format!("Invalid timeout '{}': {}", s, e)))
    })?;

    Configuration::new(url, username, password, timeout)
}

/// Load configuration from a file
///
/// # Arguments
/// * `path` - Optional path to the config file. If `None`, uses
///   [`default_config_path`].
///
/// # Errors
/// Returns `OpsviewError::Config` if:
/// - File not found
/// - File format is invalid
/// - Required fields are missing or invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Configuration> {
    let config_path = path.unwrap_or_else(default_config_path);

    if !config_path.exists() {
        return Err(OpsviewError::Config(format!(
            "Config file not found: {}",
            config_path.display()
        )));
    }

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| OpsviewError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    tracing::debug!(?config, "Resolved configuration");
    Ok(config)
}

/// Path of the configuration file: `$OPSVIEW_CONFIG` or the system default
pub fn default_config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Parse configuration from string content
///
/// Format is detected by file extension: `.toml`, `.json`, anything else is
/// read as YAML.
///
/// # Errors
/// Returns `OpsviewError::Config` if parsing or validation fails.
fn parse_config(contents: &str, path: &Path) -> Result<Configuration> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| OpsviewError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| OpsviewError::Config(format!("Invalid JSON format: {}", e))),
        _ => serde_yaml::from_str(contents)
            .map_err(|e| OpsviewError::Config(format!("Invalid YAML format: {}", e))),
    }
}

/// Get required environment variable
///
/// # Errors
/// Returns `OpsviewError::Config` if the variable is not set or empty.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty()).ok_or_else(|| {
        OpsviewError::Config(format!("Missing required environment variable: {}", key))
    })
}
