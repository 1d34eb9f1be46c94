//! Degraded-server circuit breaker
//!
//! The breaker is a counter of consecutive failed exchanges: zero means
//! healthy, anything above zero means degraded. Every mutation is a single
//! atomic operation on that counter, so a concurrent `is_degraded()` never
//! observes a half-applied update.
//!
//! Handles are cheap to clone and share the same state. Each client owns
//! (or is handed) its breaker instead of reading a process global, which
//! keeps tests isolated from each other.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// No failure recorded since the last success
    Healthy,
    /// At least one failure recorded; guarded calls are skipped
    Degraded,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Healthy => write!(f, "HEALTHY"),
            CircuitState::Degraded => write!(f, "DEGRADED"),
        }
    }
}

/// Point-in-time view of the breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerMetrics {
    pub state: CircuitState,
    /// Failures recorded since the last success
    pub failure_count: u64,
    /// Healthy → degraded transitions over the breaker's lifetime
    pub trips: u64,
    /// Degraded → healthy transitions over the breaker's lifetime
    pub recoveries: u64,
}

/// Shared healthy/degraded flag
#[derive(Clone, Default)]
pub struct CircuitBreaker {
    failure_count: Arc<AtomicU64>,
    trips: Arc<AtomicU64>,
    recoveries: Arc<AtomicU64>,
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("state", &self.state())
            .field("failure_count", &self.failure_count.load(Ordering::Acquire))
            .finish()
    }
}

impl CircuitBreaker {
    /// Create a breaker in the healthy state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether guarded operations should be skipped
    pub fn is_degraded(&self) -> bool {
        self.failure_count.load(Ordering::Acquire) > 0
    }

    pub fn state(&self) -> CircuitState {
        if self.is_degraded() {
            CircuitState::Degraded
        } else {
            CircuitState::Healthy
        }
    }

    /// Record a failed exchange
    ///
    /// The counter only grows while failures keep arriving; it saturates
    /// instead of wrapping back to healthy.
    pub fn mark_degraded(&self) {
        let previous = self
            .failure_count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| Some(n.saturating_add(1)))
            .unwrap_or_else(|n| n);

        if previous == 0 {
            self.trips.fetch_add(1, Ordering::Relaxed);
            warn!("Circuit breaker degraded: server marked unreachable");
        } else {
            debug!(failure_count = previous.saturating_add(1), "Circuit breaker already degraded");
        }
    }

    /// Record a fully successful exchange, resetting the breaker to healthy
    pub fn mark_healthy(&self) {
        let previous = self.failure_count.swap(0, Ordering::AcqRel);
        if previous > 0 {
            self.recoveries.fetch_add(1, Ordering::Relaxed);
            info!(failure_count = previous, "Circuit breaker reset to healthy");
        }
    }

    pub fn metrics(&self) -> CircuitBreakerMetrics {
        CircuitBreakerMetrics {
            state: self.state(),
            failure_count: self.failure_count.load(Ordering::Acquire),
            trips: self.trips.load(Ordering::Relaxed),
            recoveries: self.recoveries.load(Ordering::Relaxed),
        }
    }
}
