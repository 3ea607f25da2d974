//! Status-code-bearing response envelopes.
//!
//! Every item operation returns an [`ItemResponse`], and every feed page an
//! [`FeedResponse`]. Expected outcomes such as a missing item or a duplicate create are
//! encoded in the [`StatusCode`], never raised as errors, so callers branch on
//! `status_code()` the same way they would against a networked store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The subset of HTTP status codes produced by container operations.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200: the item was read, replaced or upserted, or a feed page was read.
    Ok,
    /// 201: the item was created.
    Created,
    /// 204: the item was deleted.
    NoContent,
    /// 404: no item of the requested type exists under the key.
    NotFound,
    /// 409: an item already exists under the key.
    Conflict,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NoContent => 204,
            StatusCode::NotFound => 404,
            StatusCode::Conflict => 409,
        }
    }

    /// Returns `true` for the 2xx codes.
    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Ok | StatusCode::Created | StatusCode::NoContent)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NoContent => "No Content",
            StatusCode::NotFound => "Not Found",
            StatusCode::Conflict => "Conflict",
        };

        write!(f, "{} {}", self.as_u16(), reason)
    }
}

/// The result of a single item operation.
///
/// Immutable once constructed. The resource is present on success and absent for
/// [`StatusCode::NotFound`] and [`StatusCode::Conflict`].
///
/// # Example
///
/// ```ignore
/// let response = container.read::<Person>("foo", PartitionKey::None).await?;
///
/// match response.status_code() {
///     StatusCode::Ok => println!("found {:?}", response.resource()),
///     StatusCode::NotFound => println!("no such person"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ItemResponse<T> {
    resource: Option<T>,
    status_code: StatusCode,
}

impl<T> ItemResponse<T> {
    /// Creates a response carrying `resource`.
    pub fn new(resource: T, status_code: StatusCode) -> Self {
        Self { resource: Some(resource), status_code }
    }

    /// Creates a response with no resource.
    pub fn empty(status_code: StatusCode) -> Self {
        Self { resource: None, status_code }
    }

    /// Shorthand for an [`StatusCode::Ok`] response carrying `resource`.
    pub fn ok(resource: T) -> Self {
        Self::new(resource, StatusCode::Ok)
    }

    /// Shorthand for an empty [`StatusCode::NotFound`] response.
    pub fn not_found() -> Self {
        Self::empty(StatusCode::NotFound)
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    pub fn resource(&self) -> Option<&T> {
        self.resource.as_ref()
    }

    /// Consumes the response and returns the resource, if any.
    pub fn into_resource(self) -> Option<T> {
        self.resource
    }

    /// The request units charged for the operation. Always zero in memory.
    pub fn request_charge(&self) -> f64 {
        0.0
    }
}

/// One page of query results.
///
/// Dereferences to the page's items, so a page can be iterated directly.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedResponse<T> {
    items: Vec<T>,
    status_code: StatusCode,
    continuation_token: Option<String>,
}

impl<T> FeedResponse<T> {
    /// Creates a final page with status [`StatusCode::Ok`] and no continuation token.
    pub fn new(items: Vec<T>) -> Self {
        Self { items, status_code: StatusCode::Ok, continuation_token: None }
    }

    /// Sets the token a paginating caller would send to fetch the next page.
    pub fn with_continuation_token(mut self, token: Option<String>) -> Self {
        self.continuation_token = token;
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    /// Number of items in this page.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn continuation_token(&self) -> Option<&str> {
        self.continuation_token.as_deref()
    }

    pub fn resource(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page and returns its items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn request_charge(&self) -> f64 {
        0.0
    }
}

impl<T> std::ops::Deref for FeedResponse<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T> IntoIterator for FeedResponse<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a FeedResponse<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
