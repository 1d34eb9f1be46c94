//! Reload coordinator
//!
//! Runs one "reload and wait" cycle against the server:
//!
//! ```text
//! Idle ──degraded──────────────► Skipped
//!   │
//!   ├──baseline busy───────────► AlreadyInProgress
//!   │
//!   └──baseline idle─► Triggering ─► Polling ──idle + new marker──► Completed
//!                                       │
//!                                       └──deadline passed────────► TimedOut
//! ```
//!
//! The trigger (`POST /reload`) is spawned as its own task because the server
//! may hold that request open until the reload finishes. Polling never waits
//! on it; the task is joined, within a grace period, before `run` returns.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use opsview_common::resilience::CircuitBreaker;
use opsview_domain::constants::RELOAD_POLL_INTERVAL_SECS;
use opsview_domain::{ReloadOutcome, ReloadStatus};
use reqwest::StatusCode;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::client::ApiClient;
use super::errors::ApiError;

/// Reload endpoints the coordinator drives
#[async_trait]
pub trait ReloadApi: Send + Sync {
    async fn reload_status(&self) -> Result<ReloadStatus, ApiError>;

    async fn trigger_reload(&self) -> Result<StatusCode, ApiError>;
}

#[async_trait]
impl ReloadApi for ApiClient {
    async fn reload_status(&self) -> Result<ReloadStatus, ApiError> {
        ApiClient::reload_status(self).await
    }

    async fn trigger_reload(&self) -> Result<StatusCode, ApiError> {
        ApiClient::trigger_reload(self).await
    }
}

type TriggerHandle = JoinHandle<Result<StatusCode, ApiError>>;

/// Triggers a server reload and waits, bounded by a timeout, for it to finish
pub struct ReloadCoordinator {
    api: Arc<dyn ReloadApi>,
    breaker: CircuitBreaker,
    timeout: Duration,
    poll_interval: Duration,
    join_grace: Duration,
}

impl ReloadCoordinator {
    /// `timeout` bounds the polling phase; the trigger gets the same amount of
    /// grace afterwards unless overridden
    pub fn new(api: Arc<dyn ReloadApi>, breaker: CircuitBreaker, timeout: Duration) -> Self {
        Self {
            api,
            breaker,
            timeout,
            poll_interval: Duration::from_secs(RELOAD_POLL_INTERVAL_SECS),
            join_grace: timeout,
        }
    }

    /// Coordinator sharing the client's breaker and configured timeout
    pub fn for_client(client: Arc<ApiClient>) -> Self {
        let breaker = client.breaker().clone();
        let timeout = client.config().request_timeout();
        Self::new(client, breaker, timeout)
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// How long to wait for the trigger task once polling has ended
    pub fn with_join_grace(mut self, grace: Duration) -> Self {
        self.join_grace = grace;
        self
    }

    /// Run one reload cycle
    ///
    /// # Errors
    ///
    /// Returns the failure of the baseline status read, or of a status read
    /// while polling. A timeout is an outcome, not an error.
    #[instrument(skip(self), fields(timeout_secs = self.timeout.as_secs()))]
    pub async fn run(&self) -> Result<ReloadOutcome, ApiError> {
        if self.breaker.is_degraded() {
            warn!("Problem talking to Opsview server; not reloading Opsview config");
            return Ok(ReloadOutcome::Skipped);
        }

        let baseline = self.api.reload_status().await?;
        debug!(
            server_status = baseline.server_status,
            last_updated = ?baseline.last_updated,
            "Reload baseline"
        );

        if !baseline.is_idle() {
            info!(
                server_status = baseline.server_status,
                "Opsview reload already in progress; not triggering another"
            );
            return Ok(ReloadOutcome::AlreadyInProgress);
        }

        let api = Arc::clone(&self.api);
        let trigger: TriggerHandle = tokio::spawn(async move { api.trigger_reload().await });
        info!("Opsview reload triggered");

        let polled = self.poll(&baseline).await;
        self.join_trigger(trigger).await;

        let outcome = polled?;
        match outcome {
            ReloadOutcome::TimedOut => {
                self.breaker.mark_degraded();
                warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "Opsview reload did not complete within the configured timeout"
                );
            }
            ReloadOutcome::Completed => {
                // Only put/get successes reset the breaker; a completed reload
                // leaves it as it was.
                info!("Opsview reload completed");
            }
            ReloadOutcome::AlreadyInProgress | ReloadOutcome::Skipped => {}
        }

        Ok(outcome)
    }

    /// Sample the status until it proves a reload ran since `baseline`, or the
    /// deadline passes. The first sample is taken one interval in.
    async fn poll(&self, baseline: &ReloadStatus) -> Result<ReloadOutcome, ApiError> {
        // A timeout too large to represent never expires
        let deadline = Instant::now().checked_add(self.timeout);
        let mut reads: u32 = 0;

        loop {
            tokio::time::sleep(self.poll_interval).await;

            let status = self.api.reload_status().await?;
            reads += 1;
            debug!(
                reads,
                server_status = status.server_status,
                last_updated = ?status.last_updated,
                "Polled reload status"
            );

            if status.completed_since(baseline) {
                return Ok(ReloadOutcome::Completed);
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Ok(ReloadOutcome::TimedOut);
            }
        }
    }

    async fn join_trigger(&self, mut trigger: TriggerHandle) {
        match tokio::time::timeout(self.join_grace, &mut trigger).await {
            Ok(Ok(Ok(status))) => debug!(%status, "Reload trigger finished"),
            Ok(Ok(Err(err))) => warn!(error = %err, "Reload trigger request failed"),
            Ok(Err(err)) => warn!(error = %err, "Reload trigger task did not finish"),
            Err(_) => {
                trigger.abort();
                warn!(
                    grace_secs = self.join_grace.as_secs(),
                    "Reload trigger still running after grace period; aborting"
                );
                if let Err(err) = trigger.await {
                    debug!(error = %err, "Reload trigger task aborted");
                }
            }
        }
    }
}
