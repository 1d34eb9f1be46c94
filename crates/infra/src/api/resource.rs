//! Per-resource property staging
//!
//! A [`ResourceAdapter`] holds the in-memory snapshot for one managed object.
//! `create` / `delete` / `exists` only touch the snapshot; `flush` is the
//! single point where it is serialized and pushed with `PUT`.

use opsview_domain::{CallOutcome, Ensure};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::client::ApiClient;
use super::errors::ApiError;

/// Desired (or observed) state of one configuration object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySnapshot {
    pub ensure: Ensure,
    pub properties: Map<String, Value>,
}

impl PropertySnapshot {
    pub fn absent() -> Self {
        Self { ensure: Ensure::Absent, properties: Map::new() }
    }

    pub fn present(properties: Map<String, Value>) -> Self {
        Self { ensure: Ensure::Present, properties }
    }
}

/// Staging area for one object of one resource type
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceAdapter {
    resource_type: String,
    snapshot: PropertySnapshot,
}

impl ResourceAdapter {
    /// Adapter for an object not known to exist yet
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self::with_snapshot(resource_type, PropertySnapshot::absent())
    }

    pub fn with_snapshot(resource_type: impl Into<String>, snapshot: PropertySnapshot) -> Self {
        Self { resource_type: resource_type.into(), snapshot }
    }

    /// One adapter per object the server currently has of `resource_type`
    ///
    /// # Errors
    ///
    /// Returns the gateway failure; see [`ApiClient::get_all`].
    pub async fn instances(
        client: &ApiClient,
        resource_type: &str,
    ) -> Result<CallOutcome<Vec<Self>>, ApiError> {
        let outcome = client.get_all(resource_type).await?;
        Ok(outcome.map(|objects| {
            objects
                .into_iter()
                .filter_map(|object| match object {
                    Value::Object(properties) => Some(Self::with_snapshot(
                        resource_type,
                        PropertySnapshot::present(properties),
                    )),
                    other => {
                        debug!(entry = %other, "Ignoring non-object entry in config list");
                        None
                    }
                })
                .collect()
        }))
    }

    /// Adapter for the named object, absent if the server has no such object
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingName`] for an empty name, or any gateway failure
    /// other than not-found.
    pub async fn fetch(
        client: &ApiClient,
        resource_type: &str,
        name: &str,
    ) -> Result<CallOutcome<Self>, ApiError> {
        match client.get_single(resource_type, Some(name)).await {
            Ok(outcome) => Ok(outcome.map(|object| {
                let properties = match object {
                    Value::Object(properties) => properties,
                    _ => Map::new(),
                };
                Self::with_snapshot(resource_type, PropertySnapshot::present(properties))
            })),
            Err(ApiError::NotFound(_)) => Ok(CallOutcome::Done(Self::new(resource_type))),
            Err(err) => Err(err),
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn snapshot(&self) -> &PropertySnapshot {
        &self.snapshot
    }

    /// `name` property, if staged
    pub fn name(&self) -> Option<&str> {
        self.snapshot.properties.get("name").and_then(Value::as_str)
    }

    /// Mark present and stage every desired property that has a value
    pub fn create(&mut self, desired: Map<String, Value>) {
        self.snapshot.ensure = Ensure::Present;
        for (property, value) in desired {
            if !value.is_null() {
                self.snapshot.properties.insert(property, value);
            }
        }
    }

    pub fn delete(&mut self) {
        self.snapshot.ensure = Ensure::Absent;
    }

    pub fn exists(&self) -> bool {
        self.snapshot.ensure == Ensure::Present
    }

    /// Push the staged properties
    ///
    /// Absent objects are not sent. A failed exchange has already degraded
    /// the breaker and been logged by the gateway; it is reported here as
    /// `Skipped` so a batch of resources keeps going.
    ///
    /// # Errors
    ///
    /// Only non-transient failures (such as client setup errors) are returned.
    pub async fn flush(&self, client: &ApiClient) -> Result<CallOutcome<Value>, ApiError> {
        if !self.exists() {
            debug!(resource_type = %self.resource_type, "Not pushing absent resource");
            return Ok(CallOutcome::Skipped);
        }

        match client.put(&self.resource_type, &self.snapshot.properties).await {
            Ok(outcome) => Ok(outcome),
            Err(err) if err.is_transient() => {
                warn!(
                    resource_type = %self.resource_type,
                    name = self.name().unwrap_or_default(),
                    error = %err,
                    "Problem sending data to Opsview server"
                );
                Ok(CallOutcome::Skipped)
            }
            Err(err) => Err(err),
        }
    }
}
