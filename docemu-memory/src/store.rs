//! Concurrent, type-erased item storage.
//!
//! [`DocumentStore`] maps string keys to items of any [`Item`] type. Each individual
//! operation is atomic with respect to the others, so concurrent creates for the same key
//! cannot both succeed and concurrent upserts cannot lose an update.

use dashmap::{DashMap, mapref::entry::Entry};
use std::sync::Arc;

use docemu_core::item::{AnyItem, IntoAnyItem, Item};

/// Thread-safe in-memory item storage.
///
/// `DocumentStore` is cloneable and uses an `Arc`-wrapped map, so clones share the same
/// items. It never evicts: items leave the store only through [`try_remove`](Self::try_remove)
/// or by being overwritten.
///
/// Values are stored without a static type. Typed accessors treat a value of another type
/// exactly like a missing one.
///
/// # Example
///
/// ```ignore
/// let store = DocumentStore::new();
///
/// assert!(store.try_add("foo", json!({ "id": "foo" })));
/// assert!(!store.try_add("foo", json!({ "id": "foo" })));
///
/// assert!(store.try_get::<Value>("foo").is_some());
/// assert!(store.try_get::<Person>("foo").is_none());
/// ```
#[derive(Default, Clone, Debug)]
pub struct DocumentStore {
    items: Arc<DashMap<String, Box<dyn AnyItem>>>,
}

impl DocumentStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self { items: Arc::new(DashMap::new()) }
    }

    /// Inserts `item` only if nothing is stored under `key`.
    ///
    /// Returns whether the insertion happened.
    pub fn try_add<T: Item>(&self, key: impl Into<String>, item: T) -> bool {
        match self.items.entry(key.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(item.into_any_item());
                true
            }
        }
    }

    /// Inserts or overwrites the value under `key`, whatever its type.
    pub fn upsert<T: Item>(&self, key: impl Into<String>, item: T) {
        self.items.insert(key.into(), item.into_any_item());
    }

    /// Removes and returns the value under `key` if it is a `T`.
    ///
    /// A value of another type is left in place.
    pub fn try_remove<T: Item>(&self, key: &str) -> Option<T> {
        self.items
            .remove_if(key, |_, stored| (**stored).is::<T>())
            .and_then(|(_, stored)| stored.cloned::<T>())
    }

    /// Returns a copy of the value under `key` if it is a `T`.
    pub fn try_get<T: Item>(&self, key: &str) -> Option<T> {
        self.items
            .get(key)
            .and_then(|entry| entry.value().cloned::<T>())
    }

    /// Returns `true` if any value is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// Copies out every stored value whose runtime type is `T`.
    ///
    /// The order is the map's iteration order and carries no meaning.
    pub fn snapshot_of_type<T: Item>(&self) -> Vec<T> {
        self.items
            .iter()
            .filter_map(|entry| entry.value().cloned::<T>())
            .collect()
    }

    /// Number of stored values of any type.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docemu_core::identifier::Identifiable;
    use serde_json::{Value, json};
    use std::thread;

    #[derive(Debug, Clone, PartialEq)]
    struct Tag(String);

    impl Identifiable for Tag {
        fn property(&self, _name: &str) -> Option<&str> {
            None
        }
    }

    #[test]
    fn test_try_add_only_inserts_once() {
        let store = DocumentStore::new();

        assert!(store.try_add("foo", json!({ "n": 1 })));
        assert!(!store.try_add("foo", json!({ "n": 2 })));
        assert_eq!(store.try_get::<Value>("foo"), Some(json!({ "n": 1 })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_upsert_overwrites_across_types() {
        let store = DocumentStore::new();

        store.upsert("foo", json!({ "n": 1 }));
        store.upsert("foo", Tag("bar".into()));

        assert_eq!(store.try_get::<Value>("foo"), None);
        assert_eq!(store.try_get::<Tag>("foo"), Some(Tag("bar".into())));
    }

    #[test]
    fn test_try_remove_respects_type() {
        let store = DocumentStore::new();
        store.upsert("foo", Tag("bar".into()));

        assert_eq!(store.try_remove::<Value>("foo"), None);
        assert!(store.contains_key("foo"));

        assert_eq!(store.try_remove::<Tag>("foo"), Some(Tag("bar".into())));
        assert!(!store.contains_key("foo"));
        assert_eq!(store.try_remove::<Tag>("foo"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_snapshot_filters_by_type() {
        let store = DocumentStore::new();
        store.upsert("a", json!(1));
        store.upsert("b", Tag("x".into()));
        store.upsert("c", json!(2));

        let mut values = store.snapshot_of_type::<Value>();
        values.sort_by_key(|v| v.as_i64());

        assert_eq!(values, vec![json!(1), json!(2)]);
        assert_eq!(store.snapshot_of_type::<Tag>(), vec![Tag("x".into())]);
    }

    #[test]
    fn test_concurrent_try_add_has_single_winner() {
        let store = DocumentStore::new();

        let winners = (0..16)
            .map(|n| {
                let store = store.clone();
                thread::spawn(move || store.try_add("contended", json!(n)))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|added| *added)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(store.len(), 1);
    }
}
