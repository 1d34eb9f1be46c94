//! Integration tests for the circuit breaker and session token cache
//!
//! Exercises the two primitives together the way the API client uses them:
//! a failed login degrades the shared breaker, a later success clears it.

#![cfg(feature = "runtime")]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use opsview_common::auth::{SessionToken, TokenManager, TokenSource};
use opsview_common::resilience::{CircuitBreaker, CircuitState};

#[derive(Debug, thiserror::Error)]
#[error("server unreachable")]
struct Unreachable;

/// Login source that fails while `down` is set and degrades the breaker
struct FlakyLogin {
    down: Arc<AtomicBool>,
    breaker: CircuitBreaker,
}

#[async_trait]
impl TokenSource for FlakyLogin {
    type Error = Unreachable;

    async fn fetch_token(&self) -> Result<SessionToken, Self::Error> {
        if self.down.load(Ordering::SeqCst) {
            self.breaker.mark_degraded();
            return Err(Unreachable);
        }
        Ok(SessionToken::new("abc123"))
    }
}

/// Validates that breaker state is shared between a login source and its
/// owner.
///
/// # Test Steps
/// 1. Start with the server down and attempt a login
/// 2. Verify the breaker observed through another handle is degraded
/// 3. Bring the server back and log in again
/// 4. Mark the breaker healthy after the successful exchange
/// 5. Confirm two exchanges and one recovery were recorded
#[test]
fn test_login_failure_degrades_shared_breaker() {
    let breaker = CircuitBreaker::new();
    let down = Arc::new(AtomicBool::new(true));
    let manager = TokenManager::new(FlakyLogin { down: Arc::clone(&down), breaker: breaker.clone() });

    tokio_test::block_on(async {
        assert!(manager.get_access_token().await.is_err());
        assert_eq!(breaker.state(), CircuitState::Degraded);

        down.store(false, Ordering::SeqCst);
        let token = manager.get_access_token().await.unwrap();
        assert_eq!(token.as_str(), "abc123");
        breaker.mark_healthy();
    });

    let metrics = breaker.metrics();
    assert_eq!(metrics.state, CircuitState::Healthy);
    assert_eq!(metrics.trips, 1);
    assert_eq!(metrics.recoveries, 1);
    assert_eq!(manager.exchange_count(), 2);
}

/// Validates that a cached token survives a later breaker trip.
///
/// The cache only ever holds one token; degradation of the server does not
/// evict it.
#[tokio::test]
async fn test_cached_token_survives_degradation() {
    let breaker = CircuitBreaker::new();
    let down = Arc::new(AtomicBool::new(false));
    let manager = TokenManager::new(FlakyLogin { down: Arc::clone(&down), breaker: breaker.clone() });

    let first = manager.get_access_token().await.unwrap();

    down.store(true, Ordering::SeqCst);
    breaker.mark_degraded();

    let second = manager.get_access_token().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.exchange_count(), 1);
    assert!(breaker.is_degraded());
}
