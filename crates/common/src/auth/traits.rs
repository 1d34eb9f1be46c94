//! Trait seams for session authentication

use async_trait::async_trait;

use super::types::SessionToken;

/// Performs one login exchange and yields a fresh session token
///
/// Implementations make exactly one attempt per call. Caching and
/// concurrency control are the [`TokenManager`](super::TokenManager)'s job.
#[async_trait]
pub trait TokenSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn fetch_token(&self) -> Result<SessionToken, Self::Error>;
}
