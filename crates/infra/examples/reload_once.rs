//! Example: Reloading an Opsview server once
//!
//! Loads the connection settings, pushes nothing, and runs a single
//! trigger-and-wait reload cycle.
//!
//! # Setup
//!
//! 1. Point the client at a server, either with environment variables: ```bash
//!    export OPSVIEW_URL=https://opsview.example.com/rest
//!    export OPSVIEW_USERNAME=admin OPSVIEW_PASSWORD=initial OPSVIEW_TIMEOUT=60 ```
//!
//!    or with a YAML file named by `OPSVIEW_CONFIG` (default
//!    `/etc/puppet/opsview.conf`).
//!
//! 2. Run this example: ```bash OPSVIEW_LOG=debug cargo run -p opsview-infra
//!    --example reload_once ```

use std::sync::Arc;

use anyhow::Context;
use opsview_common::observability::{self, LoggingConfig};
use opsview_common::resilience::CircuitBreaker;
use opsview_infra::config;
use opsview_infra::{ApiClient, ReloadCoordinator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init(&LoggingConfig::from_env())?;

    let configuration = Arc::new(config::load().context("loading Opsview configuration")?);
    println!("Opsview reload");
    println!("==============\n");
    println!("  URL:     {}", configuration.url);
    println!("  Timeout: {}s\n", configuration.timeout);

    let client = Arc::new(ApiClient::new(configuration, CircuitBreaker::new())?);
    let outcome = ReloadCoordinator::for_client(Arc::clone(&client)).run().await?;

    println!("Outcome: {outcome}");
    println!("Breaker: {}", client.breaker().state());

    Ok(())
}
