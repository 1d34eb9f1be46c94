//! Resilience primitives
//!
//! - **Circuit Breaker**: a shared "server unreachable" flag. Once tripped by
//!   a failed exchange, guarded operations become no-ops until an explicit
//!   success clears it.
//!
//! There is deliberately no retry layer here: every exchange gets a single
//! best-effort attempt and its failure is recorded in the breaker.

pub mod circuit_breaker;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerMetrics, CircuitState};
