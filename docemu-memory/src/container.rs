//! The in-memory container emulator.
//!
//! [`InMemoryContainer`] implements [`ItemContainer`] on top of a [`DocumentStore`]. CRUD
//! and query operations behave like a real container; streaming, batch, change feed,
//! script, throughput and management operations fail with
//! [`EmulatorError::Unsupported`].

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace, warn};

use docemu_core::{
    container::{ContainerProperties, ItemContainer, PartitionKey},
    error::{EmulatorError, EmulatorResult, ensure_not_blank},
    feed::FeedIterator,
    identifier::{DEFAULT_IDENTIFIER_PROPERTY, resolve_identifier},
    item::Item,
    query::QuerySnapshot,
    response::{FeedResponse, ItemResponse, StatusCode},
};

use crate::store::DocumentStore;

/// An emulated document container.
///
/// Cloning yields another handle to the same items. Partition keys are accepted and
/// ignored: the container holds a single logical partition.
///
/// `create` and `upsert` key items with [`resolve_identifier`] using the container's
/// identifier property (`"id"` unless configured otherwise); `read`, `replace` and
/// `delete` take the key explicitly.
///
/// # Example
///
/// ```ignore
/// use docemu::{prelude::*, memory::InMemoryContainer};
///
/// let container = InMemoryContainer::new("persons")?;
///
/// let person = Person { id: "foo".into(), first_name: "Foo".into(), last_name: "Bar".into() };
/// assert_eq!(container.create(person.clone(), None).await?.status_code(), StatusCode::Created);
/// assert_eq!(container.create(person, None).await?.status_code(), StatusCode::Conflict);
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryContainer {
    id: String,
    identifier_property: String,
    store: DocumentStore,
}

impl InMemoryContainer {
    /// Creates an empty container keyed by the `"id"` property.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::InvalidArgument`] if `id` is empty or whitespace.
    pub fn new(id: &str) -> EmulatorResult<Self> {
        Self::builder(id).build()
    }

    /// Creates a builder for a container with custom options.
    pub fn builder(id: &str) -> InMemoryContainerBuilder {
        InMemoryContainerBuilder::new(id)
    }

    /// The property name items are keyed by on create and upsert.
    pub fn identifier_property(&self) -> &str {
        &self.identifier_property
    }

    /// The underlying store.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    fn unsupported<R>(&self, operation: &str) -> EmulatorResult<R> {
        warn!(container = %self.id, operation, "operation not supported by the in-memory container");

        Err(EmulatorError::unsupported(operation))
    }

    fn respond<T>(&self, operation: &str, key: &str, response: ItemResponse<T>) -> EmulatorResult<ItemResponse<T>> {
        debug!(
            container = %self.id,
            operation,
            key,
            status = %response.status_code(),
            "item operation"
        );

        Ok(response)
    }
}

#[async_trait]
impl ItemContainer for InMemoryContainer {
    fn id(&self) -> &str {
        &self.id
    }

    fn database_id(&self) -> EmulatorResult<&str> {
        self.unsupported("database_id")
    }

    async fn create<T: Item>(
        &self,
        item: T,
        _partition_key: Option<PartitionKey>,
    ) -> EmulatorResult<ItemResponse<T>> {
        let key = resolve_identifier(Some(&item), &self.identifier_property);

        let response = if self.store.try_add(key.as_str(), item.clone()) {
            ItemResponse::new(item, StatusCode::Created)
        } else {
            ItemResponse::empty(StatusCode::Conflict)
        };

        self.respond("create", &key, response)
    }

    async fn read<T: Item>(
        &self,
        id: &str,
        _partition_key: PartitionKey,
    ) -> EmulatorResult<ItemResponse<T>> {
        let response = match self.store.try_get::<T>(id) {
            Some(item) => ItemResponse::ok(item),
            None => ItemResponse::not_found(),
        };

        self.respond("read", id, response)
    }

    async fn replace<T: Item>(
        &self,
        item: T,
        id: &str,
        _partition_key: Option<PartitionKey>,
    ) -> EmulatorResult<ItemResponse<T>> {
        // Existence check and write are separate steps; a concurrent delete can slip in.
        let response = if self.store.contains_key(id) {
            self.store.upsert(id, item.clone());
            ItemResponse::ok(item)
        } else {
            ItemResponse::not_found()
        };

        self.respond("replace", id, response)
    }

    async fn upsert<T: Item>(
        &self,
        item: T,
        _partition_key: Option<PartitionKey>,
    ) -> EmulatorResult<ItemResponse<T>> {
        let key = resolve_identifier(Some(&item), &self.identifier_property);

        self.store.upsert(key.as_str(), item.clone());

        self.respond("upsert", &key, ItemResponse::ok(item))
    }

    async fn delete<T: Item>(
        &self,
        id: &str,
        _partition_key: PartitionKey,
    ) -> EmulatorResult<ItemResponse<T>> {
        let response = match self.store.try_remove::<T>(id) {
            Some(item) => ItemResponse::new(item, StatusCode::NoContent),
            None => ItemResponse::not_found(),
        };

        self.respond("delete", id, response)
    }

    async fn read_many<T: Item>(
        &self,
        items: Vec<(String, PartitionKey)>,
    ) -> EmulatorResult<FeedResponse<T>> {
        let found = items
            .iter()
            .filter_map(|(id, _)| self.store.try_get::<T>(id))
            .collect::<Vec<_>>();

        debug!(
            container = %self.id,
            requested = items.len(),
            found = found.len(),
            "read many"
        );

        Ok(FeedResponse::new(found))
    }

    fn query<T: Item>(&self) -> QuerySnapshot<T> {
        let snapshot = QuerySnapshot::new(self.store.snapshot_of_type::<T>());

        trace!(container = %self.id, count = snapshot.len(), "took query snapshot");

        snapshot
    }

    async fn query_text<T: Item>(&self, _query_text: &str) -> EmulatorResult<Box<dyn FeedIterator<T>>> {
        self.unsupported("query_text")
    }

    async fn create_item_stream(
        &self,
        _payload: Vec<u8>,
        _partition_key: PartitionKey,
    ) -> EmulatorResult<ItemResponse<Vec<u8>>> {
        self.unsupported("create_item_stream")
    }

    async fn read_item_stream(
        &self,
        _id: &str,
        _partition_key: PartitionKey,
    ) -> EmulatorResult<ItemResponse<Vec<u8>>> {
        self.unsupported("read_item_stream")
    }

    async fn replace_item_stream(
        &self,
        _payload: Vec<u8>,
        _id: &str,
        _partition_key: PartitionKey,
    ) -> EmulatorResult<ItemResponse<Vec<u8>>> {
        self.unsupported("replace_item_stream")
    }

    async fn upsert_item_stream(
        &self,
        _payload: Vec<u8>,
        _partition_key: PartitionKey,
    ) -> EmulatorResult<ItemResponse<Vec<u8>>> {
        self.unsupported("upsert_item_stream")
    }

    async fn delete_item_stream(
        &self,
        _id: &str,
        _partition_key: PartitionKey,
    ) -> EmulatorResult<ItemResponse<Vec<u8>>> {
        self.unsupported("delete_item_stream")
    }

    async fn patch<T: Item>(
        &self,
        _id: &str,
        _partition_key: PartitionKey,
        _operations: Vec<Value>,
    ) -> EmulatorResult<ItemResponse<T>> {
        self.unsupported("patch")
    }

    async fn execute_transactional_batch(
        &self,
        _partition_key: PartitionKey,
        _operations: Vec<Value>,
    ) -> EmulatorResult<FeedResponse<Value>> {
        self.unsupported("execute_transactional_batch")
    }

    async fn change_feed<T: Item>(&self) -> EmulatorResult<Box<dyn FeedIterator<T>>> {
        self.unsupported("change_feed")
    }

    async fn start_change_feed_processor(&self, _processor_name: &str) -> EmulatorResult<()> {
        self.unsupported("start_change_feed_processor")
    }

    async fn read_conflicts(&self) -> EmulatorResult<Vec<Value>> {
        self.unsupported("read_conflicts")
    }

    async fn execute_stored_procedure<T: Item>(
        &self,
        _procedure_id: &str,
        _partition_key: PartitionKey,
        _arguments: Vec<Value>,
    ) -> EmulatorResult<ItemResponse<T>> {
        self.unsupported("execute_stored_procedure")
    }

    async fn read_throughput(&self) -> EmulatorResult<Option<u32>> {
        self.unsupported("read_throughput")
    }

    async fn replace_throughput(&self, _throughput: u32) -> EmulatorResult<Option<u32>> {
        self.unsupported("replace_throughput")
    }

    async fn feed_ranges(&self) -> EmulatorResult<Vec<String>> {
        self.unsupported("feed_ranges")
    }

    async fn read_container(&self) -> EmulatorResult<ItemResponse<ContainerProperties>> {
        self.unsupported("read_container")
    }

    async fn replace_container(
        &self,
        _properties: ContainerProperties,
    ) -> EmulatorResult<ItemResponse<ContainerProperties>> {
        self.unsupported("replace_container")
    }

    async fn delete_container(&self) -> EmulatorResult<ItemResponse<ContainerProperties>> {
        self.unsupported("delete_container")
    }
}

/// Builder for constructing [`InMemoryContainer`] instances.
#[derive(Debug, Clone)]
pub struct InMemoryContainerBuilder {
    id: String,
    identifier_property: String,
}

impl InMemoryContainerBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            identifier_property: DEFAULT_IDENTIFIER_PROPERTY.to_string(),
        }
    }

    /// Sets the property name items are keyed by on create and upsert.
    pub fn with_identifier_property(mut self, property: impl Into<String>) -> Self {
        self.identifier_property = property.into();
        self
    }

    /// Builds the container.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::InvalidArgument`] if the id or the identifier property is
    /// empty or whitespace.
    pub fn build(self) -> EmulatorResult<InMemoryContainer> {
        ensure_not_blank("id", &self.id)?;
        ensure_not_blank("identifier_property", &self.identifier_property)?;

        Ok(InMemoryContainer {
            id: self.id,
            identifier_property: self.identifier_property,
            store: DocumentStore::new(),
        })
    }
}
