//! Main docemu crate: an in-memory stand-in for a document database container.
//!
//! Application code is written against the [`ItemContainer`](container::ItemContainer) and
//! [`ContainerFactory`](container::ContainerFactory) traits. Production wiring hands it a
//! networked client; tests hand it an [`InMemoryClient`](memory::InMemoryClient) and run
//! entirely offline. This crate re-exports the core types, the in-memory backend and the
//! `Identifiable` derive.
//!
//! # Features
//!
//! - **Faithful CRUD semantics** - Create conflicts on duplicates, replace never creates, delete returns the removed item
//! - **Typed queries** - Snapshot every item of one type and filter, sort and page it in memory
//! - **Feed iteration** - The same `has_more_results` / `read_next` loop a networked store uses
//! - **Compile-time keys** - `#[derive(Identifiable)]` replaces runtime member lookup
//!
//! # Quick Start
//!
//! ```ignore
//! use docemu::{prelude::*, memory::InMemoryClient};
//!
//! #[derive(Debug, Clone, Identifiable)]
//! pub struct Person {
//!     pub id: String,
//!     pub first_name: String,
//!     pub last_name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> EmulatorResult<()> {
//!     let client = InMemoryClient::builder().build().await?;
//!     let persons = client.container("people", "persons")?;
//!
//!     let person = Person {
//!         id: "foo".to_string(),
//!         first_name: "Foo".to_string(),
//!         last_name: "Bar".to_string(),
//!     };
//!
//!     let created = persons.create(person, None).await?;
//!     assert_eq!(created.status_code(), StatusCode::Created);
//!
//!     let mut feed = FeedIteratorFactory::SinglePage.feed_iterator(
//!         persons.query::<Person>().filter(|p| p.last_name == "Bar"),
//!     );
//!
//!     while feed.has_more_results() {
//!         for person in feed.read_next().await? {
//!             println!("{} {}", person.first_name, person.last_name);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Paging
//!
//! Swapping the factory for [`FeedIteratorFactory::paged`](feed::FeedIteratorFactory::paged)
//! makes every query answer in fixed-size pages with continuation tokens. Code that loops on
//! `has_more_results` keeps working unchanged.
//!
//! ```ignore
//! let feeds = FeedIteratorFactory::paged(2)?;
//! let mut feed = feeds.feed_iterator(persons.query::<Person>());
//!
//! let first = feed.read_next().await?;
//! assert_eq!(first.count(), 2);
//! assert_eq!(first.continuation_token(), Some("2"));
//! ```
//!
//! # Backends
//!
//! - [`memory`] - The in-memory container emulator

pub mod prelude;

pub use docemu_core::{container, error, feed, identifier, item, page, query, response};

pub use bson;
pub use serde_json;

pub use docemu_macros::Identifiable;

/// The in-memory container emulator.
pub mod memory {
    pub use docemu_memory::{
        DocumentStore, InMemoryClient, InMemoryClientBuilder, InMemoryContainer, InMemoryContainerBuilder,
    };
}
