//! Client constants
//!
//! Wire-level names and defaults shared by the loader, gateway and reload
//! coordinator.

// Configuration
pub const DEFAULT_CONFIG_PATH: &str = "/etc/puppet/opsview.conf";
pub const CONFIG_PATH_ENV: &str = "OPSVIEW_CONFIG";

// Authentication headers attached to every authenticated request
pub const USERNAME_HEADER: &str = "X-Opsview-Username";
pub const TOKEN_HEADER: &str = "X-Opsview-Token";

// REST endpoints, relative to the configured base URL
pub const LOGIN_ENDPOINT: &str = "login";
pub const RELOAD_ENDPOINT: &str = "reload";
pub const CONFIG_ENDPOINT: &str = "config";

// Query parameters used by config lookups
pub const NAME_FILTER_PARAM: &str = "s.name";
pub const ROWS_PARAM: &str = "rows";
pub const ROWS_ALL: &str = "all";

// Reload polling
pub const RELOAD_POLL_INTERVAL_SECS: u64 = 2;
