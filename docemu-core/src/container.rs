//! Container abstraction shared by emulated and networked implementations.
//!
//! Code under test is written against [`ItemContainer`] and obtains containers through a
//! [`ContainerFactory`]. In tests the factory is the in-memory client; elsewhere it is a
//! networked client. The trait therefore covers the whole item surface of a container,
//! including operations that the in-memory emulator rejects with
//! [`EmulatorError::Unsupported`](crate::error::EmulatorError::Unsupported).
//!
//! # Example
//!
//! ```ignore
//! use docemu::prelude::*;
//!
//! async fn rename<C: ItemContainer>(container: &C, id: &str, name: &str) -> EmulatorResult<bool> {
//!     let response = container.read::<Person>(id, PartitionKey::None).await?;
//!
//!     let Some(mut person) = response.into_resource() else {
//!         return Ok(false);
//!     };
//!
//!     person.first_name = name.to_string();
//!
//!     let replaced = container.replace(person, id, None).await?;
//!     Ok(replaced.status_code() == StatusCode::Ok)
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::EmulatorResult,
    feed::FeedIterator,
    item::Item,
    query::QuerySnapshot,
    response::{FeedResponse, ItemResponse},
};

/// The logical partition an operation targets.
///
/// Accepted by every item operation for compatibility with partitioned stores. The
/// in-memory emulator keeps a single logical partition per container and ignores it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PartitionKey {
    /// No partition key value.
    #[default]
    None,
    /// A string partition key value.
    Value(String),
}

impl From<&str> for PartitionKey {
    fn from(value: &str) -> Self {
        PartitionKey::Value(value.to_string())
    }
}

impl From<String> for PartitionKey {
    fn from(value: String) -> Self {
        PartitionKey::Value(value)
    }
}

/// Management-plane description of a container.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContainerProperties {
    pub id: String,
    pub partition_key_path: String,
}

/// The item surface of a document container.
///
/// Expected outcomes (not found, conflict) are reported through the status code of the
/// returned response. An `Err` means the call itself was wrong or is not supported.
///
/// No operation takes a cancellation token. To cancel, drop the returned future; the
/// in-memory implementation completes without suspending, so there is nothing left to
/// interrupt once it is polled.
#[async_trait]
pub trait ItemContainer: Send + Sync {
    /// The container's name.
    fn id(&self) -> &str;

    /// The id of the database owning this container.
    fn database_id(&self) -> EmulatorResult<&str>;

    /// Inserts `item` under its resolved identifier.
    ///
    /// Responds [`Created`](crate::response::StatusCode::Created) with the item, or
    /// [`Conflict`](crate::response::StatusCode::Conflict) without a resource if the key
    /// is taken.
    async fn create<T: Item>(
        &self,
        item: T,
        partition_key: Option<PartitionKey>,
    ) -> EmulatorResult<ItemResponse<T>>;

    /// Reads the item stored under `id` as a `T`.
    ///
    /// Responds [`NotFound`](crate::response::StatusCode::NotFound) when nothing is
    /// stored under `id` or the stored value is not a `T`.
    async fn read<T: Item>(
        &self,
        id: &str,
        partition_key: PartitionKey,
    ) -> EmulatorResult<ItemResponse<T>>;

    /// Overwrites the item stored under `id`. Never creates.
    async fn replace<T: Item>(
        &self,
        item: T,
        id: &str,
        partition_key: Option<PartitionKey>,
    ) -> EmulatorResult<ItemResponse<T>>;

    /// Inserts or overwrites `item` under its resolved identifier.
    async fn upsert<T: Item>(
        &self,
        item: T,
        partition_key: Option<PartitionKey>,
    ) -> EmulatorResult<ItemResponse<T>>;

    /// Removes the `T` stored under `id` and returns it.
    async fn delete<T: Item>(
        &self,
        id: &str,
        partition_key: PartitionKey,
    ) -> EmulatorResult<ItemResponse<T>>;

    /// Reads several items in one call. Missing ids are skipped.
    async fn read_many<T: Item>(
        &self,
        items: Vec<(String, PartitionKey)>,
    ) -> EmulatorResult<FeedResponse<T>>;

    /// Takes a snapshot of every `T` currently stored.
    fn query<T: Item>(&self) -> QuerySnapshot<T>;

    /// Runs a textual query.
    async fn query_text<T: Item>(&self, query_text: &str) -> EmulatorResult<Box<dyn FeedIterator<T>>>;

    async fn create_item_stream(
        &self,
        payload: Vec<u8>,
        partition_key: PartitionKey,
    ) -> EmulatorResult<ItemResponse<Vec<u8>>>;

    async fn read_item_stream(
        &self,
        id: &str,
        partition_key: PartitionKey,
    ) -> EmulatorResult<ItemResponse<Vec<u8>>>;

    async fn replace_item_stream(
        &self,
        payload: Vec<u8>,
        id: &str,
        partition_key: PartitionKey,
    ) -> EmulatorResult<ItemResponse<Vec<u8>>>;

    async fn upsert_item_stream(
        &self,
        payload: Vec<u8>,
        partition_key: PartitionKey,
    ) -> EmulatorResult<ItemResponse<Vec<u8>>>;

    async fn delete_item_stream(
        &self,
        id: &str,
        partition_key: PartitionKey,
    ) -> EmulatorResult<ItemResponse<Vec<u8>>>;

    /// Applies partial updates (JSON patch operations) to a stored item.
    async fn patch<T: Item>(
        &self,
        id: &str,
        partition_key: PartitionKey,
        operations: Vec<Value>,
    ) -> EmulatorResult<ItemResponse<T>>;

    /// Executes a group of operations atomically within one partition.
    async fn execute_transactional_batch(
        &self,
        partition_key: PartitionKey,
        operations: Vec<Value>,
    ) -> EmulatorResult<FeedResponse<Value>>;

    /// Iterates over changes made to the container.
    async fn change_feed<T: Item>(&self) -> EmulatorResult<Box<dyn FeedIterator<T>>>;

    /// Starts a named processor that consumes the change feed in the background.
    async fn start_change_feed_processor(&self, processor_name: &str) -> EmulatorResult<()>;

    /// Lists write conflicts recorded by multi-region replication.
    async fn read_conflicts(&self) -> EmulatorResult<Vec<Value>>;

    /// Runs a server-side stored procedure.
    async fn execute_stored_procedure<T: Item>(
        &self,
        procedure_id: &str,
        partition_key: PartitionKey,
        arguments: Vec<Value>,
    ) -> EmulatorResult<ItemResponse<T>>;

    async fn read_throughput(&self) -> EmulatorResult<Option<u32>>;

    async fn replace_throughput(&self, throughput: u32) -> EmulatorResult<Option<u32>>;

    async fn feed_ranges(&self) -> EmulatorResult<Vec<String>>;

    async fn read_container(&self) -> EmulatorResult<ItemResponse<ContainerProperties>>;

    async fn replace_container(
        &self,
        properties: ContainerProperties,
    ) -> EmulatorResult<ItemResponse<ContainerProperties>>;

    async fn delete_container(&self) -> EmulatorResult<ItemResponse<ContainerProperties>>;
}

/// Resolves named containers.
///
/// # Example
///
/// ```ignore
/// struct PersonRepository<C: ItemContainer> {
///     container: C,
///     feeds: FeedIteratorFactory,
/// }
///
/// impl<C: ItemContainer> PersonRepository<C> {
///     fn new<F>(factory: &F, feeds: FeedIteratorFactory) -> EmulatorResult<Self>
///     where
///         F: ContainerFactory<Container = C>,
///     {
///         Ok(Self { container: factory.container("people", "persons")?, feeds })
///     }
/// }
/// ```
pub trait ContainerFactory: Send + Sync {
    type Container: ItemContainer;

    /// Returns the container `container_id` of database `database_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::InvalidArgument`](crate::error::EmulatorError::InvalidArgument)
    /// if either name is empty or whitespace.
    fn container(&self, database_id: &str, container_id: &str) -> EmulatorResult<Self::Container>;
}

/// Factory trait for creating client instances.
#[async_trait]
pub trait ClientBuilder {
    type Client: ContainerFactory;

    async fn build(self) -> EmulatorResult<Self::Client>;
}
