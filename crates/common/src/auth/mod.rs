//! Session token infrastructure
//!
//! The Opsview API authenticates every request with a session token obtained
//! once per process from a login exchange. This module holds the
//! protocol-agnostic half of that flow:
//!
//! - **[`traits`]**: [`TokenSource`], the seam a concrete login client implements
//! - **[`types`]**: [`SessionToken`], a token wrapper that never prints its value
//! - **[`token_manager`]**: [`TokenManager`], which caches the first successful
//!   token and serializes concurrent first-time logins
//!
//! ```text
//! ┌─────────────────┐
//! │  TokenManager   │  cache + single-flight
//! └────────┬────────┘
//!          │
//!          └──► TokenSource  (login exchange, implemented in opsview-infra)
//! ```
//!
//! Tokens are never refreshed. A server-side expiry surfaces as an
//! authentication failure on the next request.

pub mod token_manager;
pub mod traits;
pub mod types;

pub use token_manager::TokenManager;
pub use traits::TokenSource;
pub use types::SessionToken;
