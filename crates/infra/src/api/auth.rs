//! Session authentication for the Opsview REST API
//!
//! `POST {url}/login` exchanges the configured credentials for a session
//! token. The token is cached by [`SessionManager`] for the life of the
//! process and sent on every request in the `X-Opsview-Token` header.

use std::sync::Arc;

use async_trait::async_trait;
use opsview_common::auth::{SessionToken, TokenManager, TokenSource};
use opsview_common::resilience::CircuitBreaker;
use opsview_domain::constants::LOGIN_ENDPOINT;
use opsview_domain::{mask_secret, Configuration, LoginRequest, LoginResponse};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use tracing::{debug, instrument, warn};

use super::errors::ApiError;
use crate::http::HttpClient;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid session token, authenticating first if needed
    async fn access_token(&self) -> Result<String, ApiError>;
}

/// Performs the login exchange
///
/// A failed exchange marks the shared circuit breaker degraded.
#[derive(Debug, Clone)]
pub struct LoginClient {
    http: HttpClient,
    config: Arc<Configuration>,
    breaker: CircuitBreaker,
}

impl LoginClient {
    pub fn new(http: HttpClient, config: Arc<Configuration>, breaker: CircuitBreaker) -> Self {
        Self { http, config, breaker }
    }

    async fn login(&self) -> Result<SessionToken, ApiError> {
        let url = self.config.endpoint(LOGIN_ENDPOINT);
        let body =
            LoginRequest { username: &self.config.username, password: &self.config.password };

        let request = self
            .http
            .request(Method::POST, &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .timeout(self.config.request_timeout())
            .json(&body);

        let response = self.http.send(request).await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read login response: {}", e)))?;

        if status != StatusCode::OK {
            return Err(ApiError::Auth(format!("Login failed: {} returned status {}", url, status)));
        }

        let parsed: LoginResponse = serde_json::from_str(&text)
            .map_err(|e| ApiError::Decode(format!("login response: {}", e)))?;

        if parsed.token.is_empty() {
            return Err(ApiError::Decode("login response carried an empty token".to_string()));
        }

        Ok(SessionToken::new(parsed.token))
    }
}

#[async_trait]
impl TokenSource for LoginClient {
    type Error = ApiError;

    #[instrument(skip(self), fields(username = %self.config.username))]
    async fn fetch_token(&self) -> Result<SessionToken, ApiError> {
        debug!(url = %self.config.url, "Logging in to Opsview");

        match self.login().await {
            Ok(token) => Ok(token),
            Err(err) => {
                self.breaker.mark_degraded();
                warn!(
                    error = %err,
                    password = %mask_secret(&self.config.password),
                    "Problem getting token from Opsview server"
                );
                Err(err)
            }
        }
    }
}

/// Process-lifetime session: one login, then the cached token
pub struct SessionManager {
    tokens: TokenManager<LoginClient>,
}

impl SessionManager {
    pub fn new(login: LoginClient) -> Self {
        Self { tokens: TokenManager::new(login) }
    }

    /// Cached token, logging in first if there is none
    ///
    /// # Errors
    ///
    /// Returns the login failure. Nothing is cached on failure, so the next
    /// call authenticates again.
    pub async fn token(&self) -> Result<SessionToken, ApiError> {
        self.tokens.get_access_token().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated().await
    }

    /// Number of login exchanges performed
    pub fn exchange_count(&self) -> u64 {
        self.tokens.exchange_count()
    }
}

#[async_trait]
impl AccessTokenProvider for SessionManager {
    async fn access_token(&self) -> Result<String, ApiError> {
        Ok(self.token().await?.into_inner())
    }
}
