//! Connection settings for the Opsview REST API
//!
//! A [`Configuration`] is resolved once at startup and shared read-only
//! (`Arc<Configuration>`) by the session, gateway and reload layers.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{OpsviewError, Result};
use crate::utils::redact::mask_secret;

/// Server URL, credentials and per-request timeout
///
/// Deserialization goes through [`RawConfiguration`] so that missing keys and
/// invalid values surface as a single [`OpsviewError::Config`] message.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfiguration")]
pub struct Configuration {
    /// Base URL of the REST API, without trailing slash
    /// (e.g. `https://opsview.example.com/rest`)
    pub url: String,
    pub username: String,
    pub password: String,
    /// Timeout in whole seconds, applied to each request and to reload polling
    pub timeout: u64,
}

/// Unvalidated shape of the configuration document
#[derive(Debug, Default, Deserialize)]
pub struct RawConfiguration {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Option<u64>,
}

impl TryFrom<RawConfiguration> for Configuration {
    type Error = OpsviewError;

    fn try_from(raw: RawConfiguration) -> Result<Self> {
        match (raw.url, raw.username, raw.password, raw.timeout) {
            (Some(url), Some(username), Some(password), Some(timeout)) => {
                Self::new(url, username, password, timeout)
            }
            _ => Err(OpsviewError::Config(
                "Config file must contain url, username, password and timeout fields".to_string(),
            )),
        }
    }
}

impl Configuration {
    /// Build and validate a configuration
    ///
    /// # Errors
    /// Returns `OpsviewError::Config` if any field is empty, the URL is not an
    /// absolute http(s) URL, or the timeout is zero.
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        timeout: u64,
    ) -> Result<Self> {
        let url = url.into().trim().trim_end_matches('/').to_string();
        let config =
            Self { url, username: username.into(), password: password.into(), timeout };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants: all four fields present and non-empty
    ///
    /// # Errors
    /// Returns `OpsviewError::Config` describing the first violated field.
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(OpsviewError::Config("url must not be empty".to_string()));
        }
        let parsed = url::Url::parse(&self.url)
            .map_err(|e| OpsviewError::Config(format!("Invalid url '{}': {}", self.url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(OpsviewError::Config(format!(
                "Unsupported url scheme '{}', expected http or https",
                parsed.scheme()
            )));
        }
        if self.username.trim().is_empty() {
            return Err(OpsviewError::Config("username must not be empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(OpsviewError::Config("password must not be empty".to_string()));
        }
        if self.timeout == 0 {
            return Err(OpsviewError::Config("timeout must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Timeout as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Absolute URL for an endpoint path relative to the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &mask_secret(&self.password))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_trailing_slash() {
        let config = Configuration::new("https://opsview.local/rest/", "admin", "pw", 30).unwrap();
        assert_eq!(config.url, "https://opsview.local/rest");
        assert_eq!(config.endpoint("login"), "https://opsview.local/rest/login");
        assert_eq!(config.endpoint("/reload"), "https://opsview.local/rest/reload");
    }

    #[test]
    fn request_timeout_is_whole_seconds() {
        let config = Configuration::new("http://localhost", "admin", "pw", 45).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(45));
    }

    #[test]
    fn rejects_empty_fields() {
        assert!(matches!(
            Configuration::new("", "admin", "pw", 30),
            Err(OpsviewError::Config(_))
        ));
        assert!(matches!(
            Configuration::new("http://localhost", " ", "pw", 30),
            Err(OpsviewError::Config(_))
        ));
        assert!(matches!(
            Configuration::new("http://localhost", "admin", "", 30),
            Err(OpsviewError::Config(_))
        ));
        assert!(matches!(
            Configuration::new("http://localhost", "admin", "pw", 0),
            Err(OpsviewError::Config(_))
        ));
    }

    #[test]
    fn rejects_non_http_urls() {
        let err = Configuration::new("ftp://opsview.local", "admin", "pw", 30).unwrap_err();
        assert!(err.to_string().contains("scheme"));

        let err = Configuration::new("not a url", "admin", "pw", 30).unwrap_err();
        assert!(err.to_string().contains("Invalid url"));
    }

    #[test]
    fn deserialize_reports_missing_fields() {
        let err = serde_json::from_str::<Configuration>(r#"{"url": "http://localhost"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("must contain url, username, password and timeout"));
    }

    #[test]
    fn deserialize_validates_values() {
        let json = r#"{"url": "http://localhost/", "username": "admin", "password": "pw", "timeout": 0}"#;
        let err = serde_json::from_str::<Configuration>(json).unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn debug_masks_password() {
        let config = Configuration::new("http://localhost", "admin", "s3cret", 30).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("xxxxxx"));
    }
}
