//! In-memory document container emulator for docemu.
//!
//! This crate provides a thread-safe, in-memory implementation of the `ItemContainer` and
//! `ContainerFactory` traits. It never touches the network and is meant for exercising
//! code written against a document store in unit and integration tests.
//!
//! # Features
//!
//! - **Thread-safe access** - Per-key atomic operations on a sharded concurrent map
//! - **Type-erased storage** - One container can hold items of several types at once
//! - **Faithful status codes** - Conflict on duplicate create, not found on missing replace and delete
//! - **Explicit gaps** - Operations that are not emulated fail with `Unsupported` instead of doing nothing
//!
//! # Quick Start
//!
//! ```ignore
//! use docemu::{prelude::*, memory::InMemoryClient};
//!
//! #[derive(Debug, Clone, Identifiable)]
//! pub struct Person {
//!     pub id: String,
//!     pub name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> EmulatorResult<()> {
//!     let client = InMemoryClient::builder().build().await?;
//!     let persons = client.container("people", "persons")?;
//!
//!     let person = Person { id: "foo".to_string(), name: "Alice".to_string() };
//!     persons.create(person, None).await?;
//!
//!     let read = persons.read::<Person>("foo", PartitionKey::None).await?;
//!     assert_eq!(read.status_code(), StatusCode::Ok);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docemu_memory;

pub mod client;
pub mod container;
pub mod store;

pub use client::{InMemoryClient, InMemoryClientBuilder};
pub use container::{InMemoryContainer, InMemoryContainerBuilder};
pub use store::DocumentStore;
