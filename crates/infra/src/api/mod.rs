//! Opsview REST API client
//!
//! # Architecture
//!
//! - [`auth`]: login exchange and process-lifetime session token
//! - [`client`]: REST gateway (`put`, `get`, `get_single`, `get_all`, reload
//!   endpoints) guarded by a shared circuit breaker
//! - [`reload`]: trigger-and-poll reload coordinator
//! - [`resource`]: per-resource snapshot staging that ends in a `put`
//! - [`errors`]: gateway error classification
//!
//! Requests are single attempts. A failed exchange degrades the circuit
//! breaker and later guarded calls are skipped until a success resets it.

pub mod auth;
pub mod client;
pub mod errors;
pub mod reload;
pub mod resource;

pub use auth::{AccessTokenProvider, LoginClient, SessionManager};
pub use client::{ApiClient, ApiClientBuilder};
pub use errors::{ApiError, ApiErrorCategory};
pub use reload::{ReloadApi, ReloadCoordinator};
pub use resource::{PropertySnapshot, ResourceAdapter};
