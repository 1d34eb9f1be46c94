//! API-specific error types
//!
//! Provides error classification for gateway operations. The category decides
//! whether a failure degrades the circuit breaker.

use std::time::Duration;

use opsview_domain::OpsviewError;
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Login rejected or 401/403 response
    Authentication,
    /// Rate limiting (429)
    RateLimit,
    /// Server errors (5xx)
    Server,
    /// Client errors (4xx except auth)
    Client,
    /// Network/connection errors and timeouts
    Network,
    /// Response body could not be parsed
    Decode,
    /// Lookup succeeded but matched nothing
    NotFound,
    /// Caller supplied invalid arguments; nothing was sent
    Caller,
    /// Client setup errors
    Config,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Could not parse the JSON response from Opsview: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Did not specify a {0} name to look up")]
    MissingName(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::Client(_) => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Decode(_) => ApiErrorCategory::Decode,
            Self::NotFound(_) => ApiErrorCategory::NotFound,
            Self::MissingName(_) => ApiErrorCategory::Caller,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Whether this failure came from a bad exchange with the server and
    /// must mark the circuit breaker degraded
    pub fn degrades_circuit(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::Authentication
                | ApiErrorCategory::RateLimit
                | ApiErrorCategory::Server
                | ApiErrorCategory::Client
                | ApiErrorCategory::Network
                | ApiErrorCategory::Decode
        )
    }

    /// Whether a batch caller may log this failure and carry on with the next
    /// resource. Caller errors, empty lookups and setup errors are not
    /// transient.
    pub fn is_transient(&self) -> bool {
        self.degrades_circuit()
    }
}

impl From<OpsviewError> for ApiError {
    fn from(err: OpsviewError) -> Self {
        match err {
            OpsviewError::Network(message) => Self::Network(message),
            OpsviewError::Auth(message) => Self::Auth(message),
            OpsviewError::Config(message) => Self::Config(message),
            OpsviewError::Decode(message) => Self::Decode(message),
            OpsviewError::NotFound(message) | OpsviewError::InvalidInput(message) => {
                Self::Client(message)
            }
            OpsviewError::Internal(message) => Self::Server(message),
        }
    }
}
