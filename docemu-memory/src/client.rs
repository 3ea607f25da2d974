//! The in-memory client handing out emulated containers.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

use docemu_core::{
    container::{ClientBuilder, ContainerFactory},
    error::{EmulatorResult, ensure_not_blank},
    identifier::DEFAULT_IDENTIFIER_PROPERTY,
};

use crate::container::InMemoryContainer;

type ContainerMap = DashMap<(String, String), InMemoryContainer>;

/// Resolves named [`InMemoryContainer`]s without any network access.
///
/// The first request for a `(database, container)` pair creates an empty container; later
/// requests for the same pair return a handle to that same container, so data written
/// through one handle is visible through the others. Clones of the client share their
/// containers.
///
/// # Example
///
/// ```ignore
/// use docemu::{prelude::*, memory::InMemoryClient};
///
/// let client = InMemoryClient::builder().build().await?;
/// let persons = client.container("people", "persons")?;
///
/// persons.upsert(person, None).await?;
/// assert_eq!(client.container("people", "persons")?.query::<Person>().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryClient {
    containers: Arc<ContainerMap>,
    identifier_property: String,
}

impl InMemoryClient {
    /// Creates a client whose containers key items by `"id"`.
    pub fn new() -> Self {
        Self {
            containers: Arc::new(ContainerMap::new()),
            identifier_property: DEFAULT_IDENTIFIER_PROPERTY.to_string(),
        }
    }

    /// Creates a builder for constructing a client with custom options.
    pub fn builder() -> InMemoryClientBuilder {
        InMemoryClientBuilder::default()
    }

    /// Number of containers handed out so far.
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }
}

impl Default for InMemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerFactory for InMemoryClient {
    type Container = InMemoryContainer;

    fn container(&self, database_id: &str, container_id: &str) -> EmulatorResult<InMemoryContainer> {
        ensure_not_blank("database_id", database_id)?;
        ensure_not_blank("container_id", container_id)?;

        let key = (database_id.to_string(), container_id.to_string());

        if let Some(existing) = self.containers.get(&key) {
            return Ok(existing.value().clone());
        }

        let created = InMemoryContainer::builder(container_id)
            .with_identifier_property(self.identifier_property.as_str())
            .build()?;

        // A concurrent caller may have won the race; keep whichever landed first.
        let container = self.containers
            .entry(key)
            .or_insert(created)
            .value()
            .clone();

        debug!(database = database_id, container = container_id, "resolved in-memory container");

        Ok(container)
    }
}

/// Builder for constructing [`InMemoryClient`] instances.
///
/// # Example
///
/// ```ignore
/// use docemu::{prelude::*, memory::InMemoryClient};
///
/// let client = InMemoryClient::builder()
///     .with_identifier_property("key")
///     .build()
///     .await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryClientBuilder {
    identifier_property: Option<String>,
}

impl InMemoryClientBuilder {
    /// Sets the property name every container keys items by on create and upsert.
    pub fn with_identifier_property(mut self, property: impl Into<String>) -> Self {
        self.identifier_property = Some(property.into());
        self
    }
}

#[async_trait]
impl ClientBuilder for InMemoryClientBuilder {
    type Client = InMemoryClient;

    /// Builds the client.
    ///
    /// Fails with `InvalidArgument` if the configured identifier property is blank.
    async fn build(self) -> EmulatorResult<Self::Client> {
        let identifier_property = self.identifier_property
            .unwrap_or_else(|| DEFAULT_IDENTIFIER_PROPERTY.to_string());

        ensure_not_blank("identifier_property", &identifier_property)?;

        Ok(InMemoryClient {
            identifier_property,
            ..InMemoryClient::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docemu_core::{
        container::{ItemContainer, PartitionKey},
        error::EmulatorError,
        response::StatusCode,
    };
    use serde_json::{Value, json};

    #[test]
    fn test_blank_names_are_rejected() {
        let client = InMemoryClient::new();

        assert!(matches!(client.container("", "persons"), Err(EmulatorError::InvalidArgument(_))));
        assert!(matches!(client.container("people", "  "), Err(EmulatorError::InvalidArgument(_))));
        assert_eq!(client.container_count(), 0);
    }

    #[tokio::test]
    async fn test_same_name_shares_items() {
        let client = InMemoryClient::new();

        let first = client.container("people", "persons").unwrap();
        first.create(json!({ "id": "foo" }), None).await.unwrap();

        let second = client.container("people", "persons").unwrap();
        let read = second.read::<Value>("foo", PartitionKey::None).await.unwrap();
        assert_eq!(read.status_code(), StatusCode::Ok);
        assert_eq!(second.id(), "persons");

        let other_database = client.container("archive", "persons").unwrap();
        let missing = other_database.read::<Value>("foo", PartitionKey::None).await.unwrap();
        assert_eq!(missing.status_code(), StatusCode::NotFound);
        assert_eq!(client.container_count(), 2);
    }

    #[tokio::test]
    async fn test_builder_configures_identifier_property() {
        let client = InMemoryClient::builder()
            .with_identifier_property("key")
            .build()
            .await
            .unwrap();

        let container = client.container("db", "things").unwrap();
        assert_eq!(container.identifier_property(), "key");

        container.create(json!({ "id": "ignored", "key": "k1" }), None).await.unwrap();
        assert!(container.store().contains_key("k1"));

        assert!(matches!(
            InMemoryClient::builder().with_identifier_property(" ").build().await,
            Err(EmulatorError::InvalidArgument(_))
        ));
    }
}
