//! Convenient re-exports of commonly used types from docemu.
//!
//! ```ignore
//! use docemu::prelude::*;
//! ```
//!
//! This provides access to:
//! - The `Identifiable` trait and its derive
//! - Container, factory and client builder traits
//! - Responses, status codes and query snapshots
//! - Feed iterators and the error type

pub use docemu_core::{
    identifier::{Identifiable, resolve_identifier},
    item::{Item, ItemExt},
    container::{ItemContainer, ContainerFactory, ClientBuilder, PartitionKey},
    response::{ItemResponse, FeedResponse, StatusCode},
    query::QuerySnapshot,
    feed::{FeedIterator, FeedIteratorFactory, feed_stream},
    error::{EmulatorError, EmulatorResult},
};

pub use docemu_macros::Identifiable;
