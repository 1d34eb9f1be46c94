//! Shared helpers for the wiremock-backed integration tests

use std::sync::Arc;

use opsview_common::resilience::CircuitBreaker;
use opsview_domain::Configuration;
use opsview_infra::ApiClient;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "deadbeefcafe";

/// Configuration pointing at `{server}/rest`
pub fn config_for(server: &MockServer, timeout: u64) -> Arc<Configuration> {
    config_at(&server.uri(), timeout)
}

/// Configuration pointing at `{base}/rest`
pub fn config_at(base: &str, timeout: u64) -> Arc<Configuration> {
    Arc::new(
        Configuration::new(format!("{}/rest", base), "admin", "initial", timeout)
            .expect("valid test configuration"),
    )
}

/// Client that logs in through the real session layer
pub fn client_for(server: &MockServer) -> (Arc<ApiClient>, CircuitBreaker) {
    client_with(config_for(server, 5))
}

pub fn client_with(config: Arc<Configuration>) -> (Arc<ApiClient>, CircuitBreaker) {
    let breaker = CircuitBreaker::new();
    let client = ApiClient::new(config, breaker.clone()).expect("api client");
    (Arc::new(client), breaker)
}

/// Accept logins, expecting exactly `times` of them
pub async fn mount_login(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/rest/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": TOKEN })))
        .expect(times)
        .mount(server)
        .await;
}
