//! Point-in-time query snapshots.
//!
//! A [`QuerySnapshot`] is the materialized answer to a query: every item of the requested
//! type that was in the container at the instant of the call. Mutations made afterwards
//! are not reflected. Narrowing happens in-process over the materialized sequence.
//!
//! ```ignore
//! let adults = container
//!     .query::<Person>()
//!     .filter(|p| p.age >= 18)
//!     .sort_by_key(|p| p.last_name.clone())
//!     .take(10);
//!
//! let mut feed = FeedIteratorFactory::SinglePage.feed_iterator(adults);
//! ```

use std::cmp::Ordering;

/// A read-only, type-filtered view of a container's contents.
///
/// The order of items is the store's iteration order unless changed with
/// [`sort_by`](QuerySnapshot::sort_by) or [`sort_by_key`](QuerySnapshot::sort_by_key).
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySnapshot<T> {
    items: Vec<T>,
}

impl<T> QuerySnapshot<T> {
    /// Wraps an already materialized sequence.
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Keeps only the items matching `predicate`.
    pub fn filter<P>(mut self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        self.items.retain(|item| predicate(item));
        self
    }

    /// Orders the items with a comparator. The sort is stable.
    pub fn sort_by<F>(mut self, compare: F) -> Self
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.items.sort_by(compare);
        self
    }

    /// Orders the items by a key. The sort is stable.
    pub fn sort_by_key<K, F>(mut self, key: F) -> Self
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.items.sort_by_key(key);
        self
    }

    /// Drops the first `count` items.
    pub fn skip(mut self, count: usize) -> Self {
        self.items.drain(..count.min(self.items.len()));
        self
    }

    /// Keeps at most `count` items.
    pub fn take(mut self, count: usize) -> Self {
        self.items.truncate(count);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if the snapshot holds at least one item.
    pub fn any(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for QuerySnapshot<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> FromIterator<T> for QuerySnapshot<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect() }
    }
}

impl<T> IntoIterator for QuerySnapshot<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a QuerySnapshot<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
