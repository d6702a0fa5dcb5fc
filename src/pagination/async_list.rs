//! Asynchronous lazy paged list

use super::slice::{AsyncSliceView, ItemStream, SlicePlan, SliceRange};
use super::state::{ListOptions, PageBuffer};
use crate::error::{Error, Result};
use crate::fetch::AsyncPageFetcher;
use crate::types::{Cursor, Page};
use futures::stream;
use tracing::{debug, trace, warn};

/// Async mirror of [`LazyPagedList`](super::LazyPagedList)
///
/// Same state machine; the page fetch is the only suspension point and the
/// buffer is only touched after the fetch has resolved. Dropping a pending
/// operation therefore leaves the list exactly as it was before the fetch.
///
/// Every growing operation takes `&mut self`: the list is not meant to be
/// driven from several tasks at once. Wrap it in a `tokio::sync::Mutex` when
/// it has to be shared.
pub struct AsyncLazyPagedList<F: AsyncPageFetcher> {
    fetcher: F,
    state: PageBuffer<F::Item>,
}

impl<F: AsyncPageFetcher> AsyncLazyPagedList<F> {
    /// Create a list with no limit and the default page size
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            state: PageBuffer::default(),
        }
    }

    /// Create a list with a limit and/or page size
    pub fn with_options(fetcher: F, options: ListOptions) -> Result<Self> {
        Ok(Self {
            fetcher,
            state: PageBuffer::new(options)?,
        })
    }

    /// Create a list whose first page has already been fetched
    pub fn from_first_page(fetcher: F, first: Page<F::Item>, options: ListOptions) -> Result<Self> {
        let mut state = PageBuffer::new(options)?;
        state.absorb(first)?;
        Ok(Self { fetcher, state })
    }

    /// Grow the buffer until `index` is buffered, the limit is reached, or
    /// the source is exhausted
    pub async fn ensure(&mut self, index: usize) -> Result<()> {
        while let Some(request) = self.state.next_request(index) {
            debug!(
                "Fetching page (cursor: {}, page_size: {}, buffered: {})",
                request.cursor.as_ref().map_or("<start>", Cursor::as_str),
                request.page_size,
                self.state.len()
            );

            let page = match self
                .fetcher
                .fetch(request.cursor.as_ref(), request.page_size)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        "Page fetch failed, buffer left at {} items: {}",
                        self.state.len(),
                        e
                    );
                    return Err(e);
                }
            };

            let appended = self.state.absorb(page)?;
            debug!(
                "Appended {} items (buffered: {}, exhausted: {})",
                appended,
                self.state.len(),
                self.state.is_exhausted()
            );
        }
        trace!("Index {} needs no fetch", index);
        Ok(())
    }

    async fn ensure_all(&mut self) -> Result<()> {
        while self.state.next_request_to_end().is_some() {
            let buffered = self.state.len();
            self.ensure(buffered).await?;
        }
        Ok(())
    }

    /// Item at `index`, `None` past the final length
    pub async fn lookup(&mut self, index: usize) -> Result<Option<&F::Item>> {
        self.ensure(index).await?;
        Ok(self.state.get(index))
    }

    /// Item at `index`
    pub async fn get(&mut self, index: usize) -> Result<&F::Item> {
        self.ensure(index).await?;
        let len = self.state.len();
        self.state
            .get(index)
            .ok_or_else(|| Error::out_of_range(index, len))
    }

    /// Number of items in the list (eager)
    pub async fn len(&mut self) -> Result<usize> {
        self.ensure_all().await?;
        Ok(self.state.len())
    }

    /// Check if the list has no items; fetches at most until the first item
    pub async fn is_empty(&mut self) -> Result<bool> {
        self.ensure(0).await?;
        Ok(self.state.is_empty())
    }

    /// Slice the list
    ///
    /// Unsupported ranges fail before anything is fetched.
    pub fn slice(&mut self, range: impl Into<SliceRange>) -> Result<AsyncSliceView<'_, F>> {
        let plan = SlicePlan::resolve(
            range.into(),
            self.state.known_len(),
            self.state.limit().is_some(),
        )?;
        Ok(AsyncSliceView::new(self, plan))
    }

    /// Items buffered so far, without fetching
    pub fn buffer(&self) -> &[F::Item] {
        self.state.items()
    }

    /// Number of items buffered so far
    pub fn buffered(&self) -> usize {
        self.state.len()
    }

    /// Final length once no further growth is possible
    pub fn known_len(&self) -> Option<usize> {
        self.state.known_len()
    }

    /// Check if the source reported its last page
    pub fn is_exhausted(&self) -> bool {
        self.state.is_exhausted()
    }

    /// Check if more items may still be fetched
    pub fn has_next(&self) -> bool {
        self.state.has_next()
    }

    /// Limit fixed at construction
    pub fn limit(&self) -> Option<usize> {
        self.state.limit()
    }

    /// Page size requested per fetch
    pub fn page_size(&self) -> usize {
        self.state.page_size()
    }

    /// Cursor of the next page to fetch
    pub fn cursor(&self) -> Option<&Cursor> {
        self.state.cursor()
    }

    /// Number of successful fetches
    pub fn fetch_count(&self) -> usize {
        self.state.fetch_count()
    }

    /// Get the fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

impl<F> AsyncLazyPagedList<F>
where
    F: AsyncPageFetcher,
    F::Item: Clone,
{
    /// Stream the list from the first item, fetching pages as needed
    ///
    /// Yields `Err` once if a fetch fails and then ends. A new stream
    /// replays the buffer before fetching anything new.
    pub fn stream(&mut self) -> ItemStream<'_, F::Item> {
        Box::pin(stream::try_unfold((self, 0usize), |(list, index)| async move {
            let item = list.lookup(index).await?.cloned();
            Ok::<_, Error>(item.map(|item| (item, (list, index + 1))))
        }))
    }

    /// Fetch everything and return it as a vector
    pub async fn collect_all(&mut self) -> Result<Vec<F::Item>> {
        self.ensure_all().await?;
        Ok(self.state.items().to_vec())
    }
}

impl<F: AsyncPageFetcher> std::fmt::Debug for AsyncLazyPagedList<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncLazyPagedList")
            .field("buffered", &self.state.len())
            .field("limit", &self.state.limit())
            .field("page_size", &self.state.page_size())
            .field("exhausted", &self.state.is_exhausted())
            .finish_non_exhaustive()
    }
}
