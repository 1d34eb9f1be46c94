//! Configuration loading
//!
//! This module provides utilities for loading the Opsview connection
//! settings from environment variables and files.

pub mod loader;

// Re-export commonly used items
pub use loader::{default_config_path, load, load_from_env, load_from_file};
