//! Wire and outcome types shared by the gateway, coordinator and adapter

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::serde::{int_or_string, opaque_string};

/// Snapshot of the server's reload state (`GET /reload`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadStatus {
    /// 0 when idle, nonzero while a reload runs on the server
    #[serde(default, deserialize_with = "int_or_string")]
    pub server_status: i64,
    /// Opaque marker that changes every time a reload finishes
    #[serde(rename = "lastupdated", default, deserialize_with = "opaque_string")]
    pub last_updated: Option<String>,
}

impl ReloadStatus {
    pub fn new(server_status: i64, last_updated: impl Into<String>) -> Self {
        Self { server_status, last_updated: Some(last_updated.into()) }
    }

    pub fn is_idle(&self) -> bool {
        self.server_status == 0
    }

    /// True when `self` proves a reload ran since `baseline` was taken:
    /// the server is idle again and the update marker moved
    pub fn completed_since(&self, baseline: &ReloadStatus) -> bool {
        self.is_idle() && self.last_updated != baseline.last_updated
    }
}

/// Result of an operation guarded by the circuit breaker
///
/// `Skipped` is not an error: the call was not attempted, usually because the
/// server is already known to be unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome<T> {
    Done(T),
    Skipped,
}

impl<T> CallOutcome<T> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// The value if the call ran, `None` if it was skipped
    pub fn done(self) -> Option<T> {
        match self {
            Self::Done(value) => Some(value),
            Self::Skipped => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> CallOutcome<U> {
        match self {
            Self::Done(value) => CallOutcome::Done(f(value)),
            Self::Skipped => CallOutcome::Skipped,
        }
    }
}

/// Terminal state of one reload coordinator run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The server went idle with a new update marker
    Completed,
    /// The deadline passed before completion was observed
    TimedOut,
    /// Another reload was already running; nothing was triggered
    AlreadyInProgress,
    /// The circuit breaker was degraded; nothing was sent
    Skipped,
}

crate::impl_status_conversions!(ReloadOutcome {
    Completed => "completed",
    TimedOut => "timed_out",
    AlreadyInProgress => "already_in_progress",
    Skipped => "skipped",
});

/// Desired presence of a managed resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ensure {
    #[default]
    Present,
    Absent,
}

crate::impl_status_conversions!(Ensure {
    Present => "present",
    Absent => "absent",
});

/// Envelope returned by `GET /config/{type}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigList {
    pub list: Vec<Map<String, Value>>,
}

/// Body of `POST /login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful `POST /login` response
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
