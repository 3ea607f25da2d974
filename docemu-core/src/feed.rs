//! Feed iteration over query snapshots.
//!
//! Query results are consumed page by page through the [`FeedIterator`] protocol:
//!
//! ```ignore
//! let mut feed = factory.feed_iterator(container.query::<Person>());
//!
//! while feed.has_more_results() {
//!     for person in feed.read_next().await? {
//!         println!("{}", person.first_name);
//!     }
//! }
//! ```
//!
//! Two implementations exist behind the same trait, and [`FeedIteratorFactory`] selects one
//! at composition time:
//!
//! - [`SinglePageFeedIterator`] returns the entire snapshot on the first read and is then
//!   exhausted. This is what tests normally want.
//! - [`PagedFeedIterator`] serves the snapshot in fixed-size pages linked by continuation
//!   tokens, like a networked store does.
//!
//! Calling [`read_next`](FeedIterator::read_next) on an exhausted iterator fails with
//! [`EmulatorError::FeedExhausted`].

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::num::NonZeroUsize;
use tracing::trace;

use crate::{
    error::{EmulatorError, EmulatorResult},
    page::PaginationParams,
    query::QuerySnapshot,
    response::FeedResponse,
};

/// Page-at-a-time access to query results.
#[async_trait]
pub trait FeedIterator<T>: Send
where
    T: Send + 'static,
{
    /// Returns `true` while another call to [`read_next`](FeedIterator::read_next) would
    /// yield items.
    fn has_more_results(&self) -> bool;

    /// Reads the next page.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::FeedExhausted`] when every page has already been read.
    async fn read_next(&mut self) -> EmulatorResult<FeedResponse<T>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedState {
    Ready,
    Exhausted,
}

/// A feed iterator that yields the whole snapshot as one page.
///
/// Starts `Ready`, with `has_more_results` reporting whether the snapshot holds anything.
/// The first read returns every item and moves to `Exhausted`, even when the page is
/// empty. There is no way back.
#[derive(Debug)]
pub struct SinglePageFeedIterator<T> {
    query: QuerySnapshot<T>,
    has_more_results: bool,
    state: FeedState,
}

impl<T> SinglePageFeedIterator<T> {
    pub fn new(query: QuerySnapshot<T>) -> Self {
        let has_more_results = query.any();

        Self { query, has_more_results, state: FeedState::Ready }
    }
}

#[async_trait]
impl<T> FeedIterator<T> for SinglePageFeedIterator<T>
where
    T: Send + 'static,
{
    fn has_more_results(&self) -> bool {
        self.has_more_results
    }

    async fn read_next(&mut self) -> EmulatorResult<FeedResponse<T>> {
        if self.state == FeedState::Exhausted {
            return Err(EmulatorError::FeedExhausted);
        }

        let items = std::mem::take(&mut self.query).into_vec();
        self.state = FeedState::Exhausted;
        self.has_more_results = false;

        trace!(count = items.len(), "read single feed page");

        Ok(FeedResponse::new(items))
    }
}

/// A feed iterator that serves the snapshot in pages of a fixed size.
///
/// Each page except the last carries a continuation token (the next page number) that
/// can be handed to [`PagedFeedIterator::resume`] to pick up where a previous iterator
/// stopped.
#[derive(Debug)]
pub struct PagedFeedIterator<T> {
    items: Vec<T>,
    next: Option<PaginationParams>,
}

impl<T> PagedFeedIterator<T> {
    pub fn new(query: QuerySnapshot<T>, page_size: NonZeroUsize) -> Self {
        Self {
            items: query.into_vec(),
            next: Some(PaginationParams { page: 1, per_page: page_size.get() }),
        }
    }

    /// Creates an iterator positioned at the page named by `continuation_token`.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::InvalidArgument`] if the token is not a page number
    /// greater than zero, or names a page whose offset overflows.
    pub fn resume(
        query: QuerySnapshot<T>,
        page_size: NonZeroUsize,
        continuation_token: &str,
    ) -> EmulatorResult<Self> {
        let page = continuation_token
            .trim()
            .parse::<usize>()
            .map_err(|_| {
                EmulatorError::invalid_argument(format!(
                    "malformed continuation token '{continuation_token}'"
                ))
            })?;

        let params = PaginationParams::new(page, page_size.get())?;

        Ok(Self { items: query.into_vec(), next: Some(params) })
    }
}

#[async_trait]
impl<T> FeedIterator<T> for PagedFeedIterator<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn has_more_results(&self) -> bool {
        match self.next {
            Some(params) => params.offset() < self.items.len(),
            None => false,
        }
    }

    async fn read_next(&mut self) -> EmulatorResult<FeedResponse<T>> {
        let params = self.next.take().ok_or(EmulatorError::FeedExhausted)?;
        let page = params.paginate(&self.items);

        self.next = page.next_page.map(|next| params.with_page(next));

        trace!(
            page = params.page,
            count = page.items.len(),
            total = page.count,
            "read paged feed page"
        );

        Ok(
            FeedResponse::new(page.items)
                .with_continuation_token(page.next_page.map(|next| next.to_string()))
        )
    }
}

/// Produces feed iterators for query snapshots.
///
/// Exactly one of the two variants is chosen when the application is composed. Test
/// setups use [`SinglePage`](FeedIteratorFactory::SinglePage), everything else uses
/// [`Paged`](FeedIteratorFactory::Paged). Callers written against [`FeedIterator`] work
/// unchanged with either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedIteratorFactory {
    /// Every query is answered with a single page.
    #[default]
    SinglePage,
    /// Queries are answered in pages of `page_size` items.
    Paged {
        page_size: NonZeroUsize,
    },
}

impl FeedIteratorFactory {
    /// Creates a [`FeedIteratorFactory::Paged`] factory.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::InvalidArgument`] if `page_size` is zero.
    pub fn paged(page_size: usize) -> EmulatorResult<Self> {
        NonZeroUsize::new(page_size)
            .map(|page_size| FeedIteratorFactory::Paged { page_size })
            .ok_or_else(|| EmulatorError::invalid_argument("page size must be greater than zero"))
    }

    /// Returns a feed iterator over `query`.
    pub fn feed_iterator<T>(&self, query: QuerySnapshot<T>) -> Box<dyn FeedIterator<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        match self {
            FeedIteratorFactory::SinglePage => Box::new(SinglePageFeedIterator::new(query)),
            FeedIteratorFactory::Paged { page_size } => Box::new(PagedFeedIterator::new(query, *page_size)),
        }
    }
}

async fn next_page<T>(
    mut iterator: Box<dyn FeedIterator<T>>,
) -> EmulatorResult<Option<(Vec<T>, Box<dyn FeedIterator<T>>)>>
where
    T: Send + 'static,
{
    if !iterator.has_more_results() {
        return Ok(None);
    }

    let page = iterator.read_next().await?;

    Ok(Some((page.into_items(), iterator)))
}

/// Flattens a feed iterator into a stream of items, reading pages while
/// `has_more_results` holds.
pub fn feed_stream<T>(iterator: Box<dyn FeedIterator<T>>) -> BoxStream<'static, EmulatorResult<T>>
where
    T: Send + 'static,
{
    stream::try_unfold(iterator, next_page)
        .map_ok(|items| stream::iter(items.into_iter().map(Ok::<T, EmulatorError>)))
        .try_flatten()
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(count: usize) -> QuerySnapshot<usize> {
        (1..=count).collect()
    }

    #[tokio::test]
    async fn test_single_page_returns_everything_then_exhausts() {
        let mut feed = FeedIteratorFactory::SinglePage.feed_iterator(snapshot(3));
        assert!(feed.has_more_results());

        let page = feed.read_next().await.unwrap();
        assert_eq!(page.resource(), &[1, 2, 3]);
        assert_eq!(page.continuation_token(), None);
        assert!(!feed.has_more_results());

        assert_eq!(feed.read_next().await.unwrap_err(), EmulatorError::FeedExhausted);
    }

    #[tokio::test]
    async fn test_single_page_over_empty_snapshot() {
        let mut feed = SinglePageFeedIterator::new(snapshot(0));
        assert!(!feed.has_more_results());

        let page = feed.read_next().await.unwrap();
        assert_eq!(page.count(), 0);
        assert!(matches!(feed.read_next().await, Err(EmulatorError::FeedExhausted)));
    }

    #[tokio::test]
    async fn test_paged_iterator_links_pages() {
        let mut feed = FeedIteratorFactory::paged(2).unwrap().feed_iterator(snapshot(5));
        let mut pages = Vec::new();

        while feed.has_more_results() {
            let page = feed.read_next().await.unwrap();
            pages.push((page.continuation_token().map(str::to_string), page.into_items()));
        }

        assert_eq!(
            pages,
            vec![
                (Some("2".to_string()), vec![1, 2]),
                (Some("3".to_string()), vec![3, 4]),
                (None, vec![5]),
            ]
        );
        assert!(matches!(feed.read_next().await, Err(EmulatorError::FeedExhausted)));
    }

    #[tokio::test]
    async fn test_paged_iterator_resumes_from_token() {
        let page_size = NonZeroUsize::new(2).unwrap();
        let mut feed = PagedFeedIterator::resume(snapshot(5), page_size, "3").unwrap();

        let page = feed.read_next().await.unwrap();
        assert_eq!(page.resource(), &[5]);
        assert!(!feed.has_more_results());

        assert!(matches!(
            PagedFeedIterator::resume(snapshot(5), page_size, "next"),
            Err(EmulatorError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_paged_iterator_rejects_out_of_range_token() {
        let page_size = NonZeroUsize::new(2).unwrap();

        assert!(matches!(
            PagedFeedIterator::resume(snapshot(1), page_size, &usize::MAX.to_string()),
            Err(EmulatorError::InvalidArgument(_))
        ));

        let mut feed = PagedFeedIterator::resume(snapshot(1), NonZeroUsize::MIN, &usize::MAX.to_string()).unwrap();
        assert!(!feed.has_more_results());
        assert_eq!(feed.read_next().await.unwrap().count(), 0);
    }

    #[test]
    fn test_paged_factory_rejects_zero_page_size() {
        assert!(matches!(FeedIteratorFactory::paged(0), Err(EmulatorError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_feed_stream_yields_every_item() {
        for factory in [FeedIteratorFactory::SinglePage, FeedIteratorFactory::paged(2).unwrap()] {
            let items = feed_stream(factory.feed_iterator(snapshot(5)))
                .try_collect::<Vec<_>>()
                .await
                .unwrap();

            assert_eq!(items, vec![1, 2, 3, 4, 5]);
        }
    }
}
