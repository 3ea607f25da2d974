//! Core abstractions for an in-memory document container emulator.
//!
//! This crate is the core of the docemu project and provides:
//!
//! - **Item traits** ([`item`]) - The bound every stored value satisfies, and type erasure for heterogeneous storage
//! - **Identifier resolution** ([`identifier`]) - Case-insensitive key discovery with a UUID fallback
//! - **Container abstraction** ([`container`]) - The item surface shared by emulated and networked containers
//! - **Responses** ([`response`]) - Status-code-bearing envelopes for item operations and feed pages
//! - **Query snapshots** ([`query`]) - Point-in-time, type-filtered views of a container
//! - **Feed iteration** ([`feed`]) - Single-page and paginated iterators, and the factory choosing between them
//! - **Pagination** ([`page`]) - Offset pagination over materialized result sets
//! - **Error handling** ([`error`]) - Usage errors and result types
//!
//! # Example
//!
//! ```ignore
//! use docemu::prelude::*;
//!
//! #[derive(Debug, Clone, Identifiable)]
//! pub struct Person {
//!     pub id: String,
//!     pub first_name: String,
//! }
//!
//! let response = container.create(person, None).await?;
//! assert_eq!(response.status_code(), StatusCode::Created);
//! ```

#[allow(unused_extern_crates)]
extern crate self as docemu_core;

pub mod container;
pub mod error;
pub mod feed;
pub mod identifier;
pub mod item;
pub mod page;
pub mod query;
pub mod response;
