//! Observability primitives
//!
//! - Logging setup (logging/)
//!
//! Library code only emits `tracing` events. Installing a subscriber is left
//! to binaries and demos through [`logging::init`].

pub mod logging;

pub use logging::{init, LoggingConfig, LoggingError, LOG_FILTER_ENV, LOG_FORMAT_ENV};
