//! # Opsview Domain
//!
//! Domain types for the Opsview configuration client.
//!
//! This crate contains:
//! - Connection configuration and its validation
//! - Reload status, call outcome and resource presence types
//! - Domain error types and Result definitions
//! - Wire-level constants
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::redact::mask_secret;
