//! Identifier resolution for stored items.
//!
//! Containers key every item by a string identifier. The identifier is read from the item
//! through the [`Identifiable`] capability, which exposes string-valued members by name.
//! Lookups are case-insensitive, so an item with an `Id` field answers to `"id"`.
//!
//! When an item has no usable member with the requested name (missing, not a string, or
//! blank after trimming), [`resolve_identifier`] fabricates a fresh UUID instead of failing.
//!
//! # Example
//!
//! ```ignore
//! use docemu::prelude::*;
//!
//! #[derive(Clone, Identifiable)]
//! struct Person {
//!     id: String,
//!     first_name: String,
//! }
//!
//! let person = Person { id: "foo".into(), first_name: "Foo".into() };
//! assert_eq!(resolve_identifier(Some(&person), "ID"), "foo");
//! ```

use bson::{Bson, Document as BsonDocument};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The member name used to key items when none is configured.
pub const DEFAULT_IDENTIFIER_PROPERTY: &str = "id";

/// Returns `true` if two member names are equal ignoring case.
///
/// Folds full Unicode lowercase, so `"Ämne"` matches `"ämne"`.
pub fn names_match(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

/// Exposes string-valued members of an item by name.
///
/// Implementations must match `name` case-insensitively (see [`names_match`], which the
/// derive uses) and return `None` for members
/// that do not exist or do not hold a string. Whitespace handling is left to the
/// resolver.
///
/// Use `#[derive(Identifiable)]` for structs; every named `String` or `Option<String>`
/// field becomes addressable by its field name.
pub trait Identifiable {
    /// Returns the string value of the member called `name`, if there is one.
    fn property(&self, name: &str) -> Option<&str>;
}

impl<T: Identifiable + ?Sized> Identifiable for &T {
    fn property(&self, name: &str) -> Option<&str> {
        (**self).property(name)
    }
}

impl<T: Identifiable + ?Sized> Identifiable for Box<T> {
    fn property(&self, name: &str) -> Option<&str> {
        (**self).property(name)
    }
}

impl Identifiable for Map<String, Value> {
    fn property(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| names_match(key, name))
            .and_then(|(_, value)| value.as_str())
    }
}

impl Identifiable for Value {
    fn property(&self, name: &str) -> Option<&str> {
        self.as_object()
            .and_then(|object| object.property(name))
    }
}

impl Identifiable for BsonDocument {
    fn property(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| names_match(key, name))
            .and_then(|(_, value)| match value {
                Bson::String(value) => Some(value.as_str()),
                _ => None,
            })
    }
}

/// Generates a fresh, globally unique identifier.
pub fn new_identifier() -> String {
    Uuid::new_v4().to_string()
}

/// Derives the storage key for `item`.
///
/// Returns the value of the member named `property_name` when it exists and is not blank,
/// otherwise a freshly generated UUID. Never fails.
pub fn resolve_identifier<T>(item: Option<&T>, property_name: &str) -> String
where
    T: Identifiable + ?Sized,
{
    item.and_then(|item| item.property(property_name))
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(new_identifier)
}
