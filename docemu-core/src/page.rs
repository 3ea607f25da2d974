//! Offset pagination over materialized result sets.
//!
//! [`PaginationParams`] slices a snapshot into fixed-size pages. It backs the
//! [`PagedFeedIterator`](crate::feed::PagedFeedIterator), which serves query results the
//! way a networked store would: several pages linked by continuation tokens.

use serde::{Deserialize, Serialize};
use std::cmp::min;

use crate::error::{EmulatorError, EmulatorResult};

/// A single page of paginated results.
///
/// # Example
///
/// ```ignore
/// let items: Vec<i32> = (1..=25).collect();
/// let page = PaginationParams::new(3, 10)?.paginate(&items);
///
/// assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
/// assert_eq!(page.next_page, None);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// The items contained in this page.
    pub items: Vec<T>,
    /// Total count of items across all pages.
    pub count: usize,
    /// The next page number, if more pages exist.
    pub next_page: Option<usize>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self { items: Vec::new(), count: 0, next_page: None }
    }
}

/// Which page to cut and how large pages are. Pages are 1-indexed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    /// The page number (1-indexed).
    pub page: usize,
    /// Number of items per page.
    pub per_page: usize,
}

impl PaginationParams {
    /// Creates new pagination parameters.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::InvalidArgument`] if `page` or `per_page` is zero, or if
    /// the page's offset does not fit in a `usize`.
    pub fn new(page: usize, per_page: usize) -> EmulatorResult<Self> {
        if page == 0 {
            return Err(EmulatorError::invalid_argument("page numbers start at 1"));
        }

        if per_page == 0 {
            return Err(EmulatorError::invalid_argument("page size must be greater than zero"));
        }

        if (page - 1).checked_mul(per_page).is_none() {
            return Err(EmulatorError::invalid_argument(format!(
                "page {page} is out of range for a page size of {per_page}"
            )));
        }

        Ok(Self { page, per_page })
    }

    /// The first page for the given page size.
    pub fn first(per_page: usize) -> EmulatorResult<Self> {
        Self::new(1, per_page)
    }

    /// Number of items to skip to reach this page.
    ///
    /// Saturates at `usize::MAX` for parameters built by hand past that point.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// The parameters for page `page` with the same page size.
    pub fn with_page(self, page: usize) -> Self {
        Self { page: page.max(1), ..self }
    }

    /// Cuts this page out of `items`.
    ///
    /// Returns an empty page when `items` is empty or the offset lies beyond its end.
    pub fn paginate<T: Clone>(&self, items: &[T]) -> Page<T> {
        if items.is_empty() || self.offset() >= items.len() {
            return Page::default();
        }

        let offset = self.offset();
        let end = min(offset.saturating_add(self.per_page), items.len());

        Page {
            items: items[offset..end].to_vec(),
            count: items.len(),
            next_page: (end < items.len()).then(|| self.page.saturating_add(1)),
        }
    }
}
