//! REST gateway for the Opsview configuration API
//!
//! Every call attaches the `X-Opsview-Username` / `X-Opsview-Token` headers
//! and the configured timeout. `put` and `get` are guarded by the circuit
//! breaker: while it is degraded they return [`CallOutcome::Skipped`] without
//! touching the network. A failed exchange degrades the breaker; a fully
//! successful one resets it.

use std::sync::Arc;
use std::time::Duration;

use opsview_common::resilience::CircuitBreaker;
use opsview_domain::constants::{
    CONFIG_ENDPOINT, NAME_FILTER_PARAM, RELOAD_ENDPOINT, ROWS_ALL, ROWS_PARAM, TOKEN_HEADER,
    USERNAME_HEADER,
};
use opsview_domain::{CallOutcome, ConfigList, Configuration, ReloadStatus};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::auth::{AccessTokenProvider, LoginClient, SessionManager};
use super::errors::ApiError;
use crate::http::HttpClient;

/// API client bound to one Opsview server
pub struct ApiClient {
    http: HttpClient,
    config: Arc<Configuration>,
    auth: Arc<dyn AccessTokenProvider>,
    breaker: CircuitBreaker,
}

impl ApiClient {
    /// Create a client that logs in with the configured credentials
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: Arc<Configuration>, breaker: CircuitBreaker) -> Result<Self, ApiError> {
        Self::builder().config(config).breaker(breaker).build()
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn config(&self) -> &Arc<Configuration> {
        &self.config
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Push one configuration object: `PUT {url}/config/{type}`
    ///
    /// # Errors
    ///
    /// Returns the exchange failure after marking the breaker degraded.
    #[instrument(skip(self, body), fields(resource_type = %resource_type))]
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        resource_type: &str,
        body: &T,
    ) -> Result<CallOutcome<Value>, ApiError> {
        if self.skip_when_degraded("put") {
            return Ok(CallOutcome::Skipped);
        }

        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Client(format!("Failed to serialize body: {}", e)))?;
        let url = self.config.endpoint(&config_path(resource_type));

        let ack: Value = self.exchange(Method::PUT, &url, &[], Some(&body)).await?;
        info!("PUT request successful");
        Ok(CallOutcome::Done(ack))
    }

    /// Read configuration objects: `GET {url}/config/{type}?{query}`
    ///
    /// # Errors
    ///
    /// Returns the exchange failure after marking the breaker degraded. An
    /// unparsable body is returned as [`ApiError::Decode`].
    #[instrument(skip(self), fields(resource_type = %resource_type))]
    pub async fn get(
        &self,
        resource_type: &str,
        query: &[(&str, &str)],
    ) -> Result<CallOutcome<Value>, ApiError> {
        self.get_as(resource_type, query).await
    }

    /// Look up one object by name: `GET {url}/config/{type}?s.name={name}&rows=all`
    ///
    /// # Errors
    ///
    /// - [`ApiError::MissingName`] when `name` is absent or empty; nothing is sent
    /// - [`ApiError::NotFound`] when the server returns an empty list
    /// - any exchange failure, as for [`get`](Self::get)
    #[instrument(skip(self), fields(resource_type = %resource_type))]
    pub async fn get_single(
        &self,
        resource_type: &str,
        name: Option<&str>,
    ) -> Result<CallOutcome<Value>, ApiError> {
        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(ApiError::MissingName(resource_type.to_lowercase())),
        };

        let query = [(NAME_FILTER_PARAM, name), (ROWS_PARAM, ROWS_ALL)];
        let listing = match self.get_as::<ConfigList>(resource_type, &query).await? {
            CallOutcome::Done(listing) => listing,
            CallOutcome::Skipped => return Ok(CallOutcome::Skipped),
        };

        match listing.list.into_iter().next() {
            Some(object) => Ok(CallOutcome::Done(Value::Object(object))),
            None => Err(ApiError::NotFound(format!(
                "{} '{}' not found",
                resource_type.to_lowercase(),
                name
            ))),
        }
    }

    /// Read every object of a type: `GET {url}/config/{type}?rows=all`
    ///
    /// # Errors
    ///
    /// As for [`get`](Self::get).
    #[instrument(skip(self), fields(resource_type = %resource_type))]
    pub async fn get_all(&self, resource_type: &str) -> Result<CallOutcome<Vec<Value>>, ApiError> {
        let outcome = self.get_as::<ConfigList>(resource_type, &[(ROWS_PARAM, ROWS_ALL)]).await?;
        Ok(outcome.map(|listing| listing.list.into_iter().map(Value::Object).collect()))
    }

    /// Current reload state: `GET {url}/reload`
    ///
    /// Not guarded by the breaker; the reload coordinator checks it once per
    /// run. A failure degrades the breaker, but success does not reset it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Auth`] on 401/403, or the transport/decode failure.
    #[instrument(skip(self))]
    pub async fn reload_status(&self) -> Result<ReloadStatus, ApiError> {
        let url = self.config.endpoint(RELOAD_ENDPOINT);

        let result = async {
            let response = self.send(Method::GET, &url, &[], None, self.timeout()).await?;
            Self::read_json::<ReloadStatus>(response, &url).await
        }
        .await;

        if let Err(err) = &result {
            self.record_failure("reload_status", err);
        }
        result
    }

    /// Ask the server to reload: `POST {url}/reload`
    ///
    /// The response is only logged. The request may legitimately run for as
    /// long as the reload itself, so its deadline is twice the configured
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns the transport failure; the breaker is not touched.
    #[instrument(skip(self))]
    pub async fn trigger_reload(&self) -> Result<StatusCode, ApiError> {
        let url = self.config.endpoint(RELOAD_ENDPOINT);
        let response =
            self.send(Method::POST, &url, &[], None, self.timeout().saturating_mul(2)).await?;

        let status = response.status();
        info!(%status, "Reload request answered");
        Ok(status)
    }

    fn timeout(&self) -> Duration {
        self.config.request_timeout()
    }

    fn skip_when_degraded(&self, operation: &'static str) -> bool {
        if self.breaker.is_degraded() {
            warn!(operation, "Problem talking to Opsview server; ignoring Opsview config");
            return true;
        }
        false
    }

    fn record_failure(&self, operation: &'static str, err: &ApiError) {
        if err.degrades_circuit() {
            self.breaker.mark_degraded();
        }
        warn!(operation, error = %err, "Problem talking to Opsview server");
    }

    async fn get_as<T: DeserializeOwned>(
        &self,
        resource_type: &str,
        query: &[(&str, &str)],
    ) -> Result<CallOutcome<T>, ApiError> {
        if self.skip_when_degraded("get") {
            return Ok(CallOutcome::Skipped);
        }

        let url = self.config.endpoint(&config_path(resource_type));
        let parsed = self.exchange(Method::GET, &url, query, None).await?;
        debug!("GET request successful");
        Ok(CallOutcome::Done(parsed))
    }

    /// One guarded round trip: any failure degrades the breaker, a parsed
    /// response resets it
    async fn exchange<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let operation = if method == Method::PUT { "put" } else { "get" };

        let result = async {
            let response = self.send(method, url, query, body, self.timeout()).await?;
            Self::read_json::<T>(response, url).await
        }
        .await;

        match &result {
            Ok(_) => self.breaker.mark_healthy(),
            Err(err) => self.record_failure(operation, err),
        }
        result
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<Response, ApiError> {
        let token = self.auth.access_token().await?;

        debug!(%method, url = %url, "Opsview request");

        let mut request = self
            .http
            .request(method, url)
            .header(USERNAME_HEADER, &self.config.username)
            .header(TOKEN_HEADER, token)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        match tokio::time::timeout(timeout, self.http.send(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(err)) => Err(ApiError::from(err)),
            Err(_) => Err(ApiError::Timeout(timeout)),
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, ApiError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(Self::map_status_error(status, url, text));
        }

        // An empty acknowledgement reads as JSON null
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| ApiError::Decode(format!("{}: {}", url, e)))
    }

    fn map_status_error(status: StatusCode, url: &str, body: String) -> ApiError {
        let message = if body.is_empty() {
            format!("{} returned status {}", url, status)
        } else {
            format!("{} returned status {}: {}", url, status, body)
        };

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            ApiError::Auth(format!("Login failed: {}", message))
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            ApiError::RateLimit(message)
        } else if status.is_server_error() {
            ApiError::Server(message)
        } else if status.is_client_error() {
            ApiError::Client(message)
        } else {
            ApiError::Network(message)
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("breaker", &self.breaker)
            .finish_non_exhaustive()
    }
}

/// `config/{type}` with the type lower-cased (`Host` → `config/host`)
fn config_path(resource_type: &str) -> String {
    format!("{}/{}", CONFIG_ENDPOINT, resource_type.to_lowercase())
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<Arc<Configuration>>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
    breaker: Option<CircuitBreaker>,
    http: Option<HttpClient>,
}

impl ApiClientBuilder {
    /// Set the connection configuration
    pub fn config(mut self, config: Arc<Configuration>) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the authentication provider (defaults to a login session)
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Share an existing circuit breaker
    pub fn breaker(mut self, breaker: CircuitBreaker) -> Self {
        self.breaker = Some(breaker);
        self
    }

    /// Override the HTTP transport
    pub fn http(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is missing or the HTTP client
    /// cannot be created
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config =
            self.config.ok_or_else(|| ApiError::Config("Configuration not set".to_string()))?;
        let breaker = self.breaker.unwrap_or_default();

        let http = match self.http {
            Some(http) => http,
            // Per-call deadlines are enforced in `send`; the transport only
            // needs to outlast the longest of them, the reload trigger.
            None => HttpClient::builder()
                .timeout(config.request_timeout().saturating_mul(2))
                .build()
                .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {}", e)))?,
        };

        let auth = match self.auth {
            Some(auth) => auth,
            None => Arc::new(SessionManager::new(LoginClient::new(
                http.clone(),
                Arc::clone(&config),
                breaker.clone(),
            ))),
        };

        Ok(ApiClient { http, config, auth, breaker })
    }
}
