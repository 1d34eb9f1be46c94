//! Shared runtime building blocks for the Opsview client crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `runtime`: async infrastructure (circuit breaker, session token cache)
//! - `observability`: tracing subscriber setup for binaries and demos

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod auth;
#[cfg(feature = "runtime")]
pub mod resilience;

// Observability tier
// --------------------------------------------------------------
#[cfg(feature = "observability")]
pub mod observability;

#[cfg(feature = "runtime")]
pub use auth::{SessionToken, TokenManager, TokenSource};
#[cfg(feature = "observability")]
pub use observability::{LoggingConfig, LoggingError};
#[cfg(feature = "runtime")]
pub use resilience::{CircuitBreaker, CircuitBreakerMetrics, CircuitState};
