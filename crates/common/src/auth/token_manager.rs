//! Session token cache
//!
//! Holds at most one token for the lifetime of the manager:
//! - First caller performs the login exchange; concurrent callers wait on the
//!   same lock and then reuse its result
//! - A failed exchange caches nothing, so the next caller tries again
//! - No refresh and no expiry tracking

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::traits::TokenSource;
use super::types::SessionToken;

/// Caches the token produced by a [`TokenSource`]
pub struct TokenManager<S: TokenSource> {
    source: S,
    // Held across the exchange so only one login is ever in flight.
    current: Mutex<Option<SessionToken>>,
    exchanges: AtomicU64,
}

impl<S: TokenSource> TokenManager<S> {
    pub fn new(source: S) -> Self {
        Self { source, current: Mutex::new(None), exchanges: AtomicU64::new(0) }
    }

    /// Return the cached token, logging in first if there is none
    ///
    /// # Errors
    ///
    /// Propagates the source's error when the login exchange fails. The
    /// failure is not cached.
    pub async fn get_access_token(&self) -> Result<SessionToken, S::Error> {
        let mut current = self.current.lock().await;

        if let Some(token) = current.as_ref() {
            debug!("Reusing cached session token");
            return Ok(token.clone());
        }

        let attempt = self.exchanges.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(attempt, "No cached session token, logging in");

        match self.source.fetch_token().await {
            Ok(token) => {
                *current = Some(token.clone());
                info!(attempt, "Session token acquired");
                Ok(token)
            }
            Err(err) => {
                warn!(attempt, error = %err, "Login exchange failed");
                Err(err)
            }
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.lock().await.is_some()
    }

    /// Number of login exchanges attempted so far
    pub fn exchange_count(&self) -> u64 {
        self.exchanges.load(Ordering::Relaxed)
    }
}

impl<S: TokenSource + std::fmt::Debug> std::fmt::Debug for TokenManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("source", &self.source)
            .field("exchanges", &self.exchange_count())
            .finish_non_exhaustive()
    }
}
