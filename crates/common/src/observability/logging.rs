//! Tracing subscriber bootstrap
//!
//! Filter resolution order:
//! 1. An explicit filter in [`LoggingConfig`]
//! 2. `OPSVIEW_LOG`
//! 3. `RUST_LOG`
//! 4. `info`

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted for the log filter
pub const LOG_FILTER_ENV: &str = "OPSVIEW_LOG";

/// Environment variable selecting the output format (`json` or `text`)
pub const LOG_FORMAT_ENV: &str = "OPSVIEW_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    #[error("tracing subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Subscriber settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string; `None` falls back to the environment
    pub filter: Option<String>,
    /// Emit newline-delimited JSON instead of human-readable lines
    pub json: bool,
    /// Include the event target (module path) in each line
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: None, json: false, with_target: true }
    }
}

impl LoggingConfig {
    /// Read `OPSVIEW_LOG` and `OPSVIEW_LOG_FORMAT`
    pub fn from_env() -> Self {
        let filter = std::env::var(LOG_FILTER_ENV).ok().filter(|value| !value.trim().is_empty());
        let json = std::env::var(LOG_FORMAT_ENV)
            .map(|value| value.trim().eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Self { filter, json, ..Self::default() }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Build the `EnvFilter` this configuration resolves to
    pub fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        match &self.filter {
            Some(filter) => EnvFilter::try_new(filter).map_err(|err| LoggingError::InvalidFilter {
                filter: filter.clone(),
                message: err.to_string(),
            }),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
        }
    }
}

/// Install the global subscriber
///
/// Returns an error instead of panicking when a subscriber is already set,
/// so tests and embedding applications can call it unconditionally.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = config.env_filter()?;
    let builder =
        tracing_subscriber::fmt().with_env_filter(filter).with_target(config.with_target);

    let result = if config.json { builder.json().try_init() } else { builder.try_init() };

    result.map_err(|err| LoggingError::AlreadyInitialized(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_filter_is_used() {
        let config = LoggingConfig::default().with_filter("opsview_infra=debug");
        assert!(config.env_filter().is_ok());
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        let config = LoggingConfig::default().with_filter("opsview_infra=loud");
        let err = config.env_filter().unwrap_err();
        assert!(matches!(err, LoggingError::InvalidFilter { .. }));
        assert!(err.to_string().contains("opsview_infra=loud"));
    }

    #[test]
    fn test_builder_methods() {
        let config = LoggingConfig::default().json(true).with_filter("warn");
        assert!(config.json);
        assert_eq!(config.filter.as_deref(), Some("warn"));
        assert!(config.with_target);
    }

    #[test]
    fn test_second_init_fails_without_panicking() {
        let config = LoggingConfig::default().with_filter("warn");
        let _ = init(&config);
        assert!(matches!(init(&config), Err(LoggingError::AlreadyInitialized(_))));
    }
}
