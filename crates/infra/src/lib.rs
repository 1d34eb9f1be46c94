//! # Opsview Infrastructure
//!
//! I/O side of the Opsview configuration client.
//!
//! This crate contains:
//! - Configuration loading (environment, YAML/TOML/JSON files)
//! - HTTP transport
//! - REST gateway, session login, reload coordinator and resource adapter
//!
//! ## Architecture
//! - Domain types come from `opsview-domain`
//! - Circuit breaker, token cache and logging setup come from `opsview-common`
//! - Contains all "impure" code (network and filesystem)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{
    AccessTokenProvider, ApiClient, ApiClientBuilder, ApiError, ApiErrorCategory, LoginClient,
    PropertySnapshot, ReloadApi, ReloadCoordinator, ResourceAdapter, SessionManager,
};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
