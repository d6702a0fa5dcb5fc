//! Synchronous lazy paged list

use super::slice::{SlicePlan, SliceRange, SliceView};
use super::state::{ListOptions, PageBuffer};
use crate::error::{Error, Result};
use crate::fetch::PageFetcher;
use crate::types::{Cursor, Page};
use std::cell::RefCell;
use std::iter::FusedIterator;
use tracing::{debug, trace, warn};

/// A cursor-paginated source presented as one lazily grown list
///
/// Pages are fetched on demand, strictly in cursor order, and never twice.
/// The buffer lives behind a `RefCell` so any number of iterators and slice
/// views can share one list and one fetch history. The fetcher is never
/// called while the buffer is borrowed.
///
/// ```rust,ignore
/// use pagewise::fetch::StaticPages;
/// use pagewise::pagination::{LazyPagedList, ListOptions};
///
/// let list = LazyPagedList::with_options(
///     StaticPages::new((0..100).collect::<Vec<u32>>()),
///     ListOptions::new().limit(3),
/// )?;
/// assert_eq!(list.get(2)?, 2);
/// assert_eq!(list.len()?, 3);
/// ```
pub struct LazyPagedList<F: PageFetcher> {
    fetcher: F,
    state: RefCell<PageBuffer<F::Item>>,
}

impl<F: PageFetcher> LazyPagedList<F> {
    /// Create a list with no limit and the default page size
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            state: RefCell::new(PageBuffer::default()),
        }
    }

    /// Create a list with a limit and/or page size
    pub fn with_options(fetcher: F, options: ListOptions) -> Result<Self> {
        Ok(Self {
            fetcher,
            state: RefCell::new(PageBuffer::new(options)?),
        })
    }

    /// Create a list whose first page has already been fetched
    pub fn from_first_page(fetcher: F, first: Page<F::Item>, options: ListOptions) -> Result<Self> {
        let mut state = PageBuffer::new(options)?;
        state.absorb(first)?;
        Ok(Self {
            fetcher,
            state: RefCell::new(state),
        })
    }

    /// Grow the buffer until `index` is buffered, the limit is reached, or
    /// the source is exhausted
    ///
    /// On a failed fetch the buffer and cursor stay as they were after the
    /// last successful page, so calling again resumes from the same cursor.
    pub fn ensure(&self, index: usize) -> Result<()> {
        loop {
            let request = self.state.borrow().next_request(index);
            let Some(request) = request else {
                trace!("Index {} needs no fetch", index);
                return Ok(());
            };

            debug!(
                "Fetching page (cursor: {}, page_size: {}, buffered: {})",
                request.cursor.as_ref().map_or("<start>", Cursor::as_str),
                request.page_size,
                self.buffered()
            );

            let page = match self.fetcher.fetch(request.cursor.as_ref(), request.page_size) {
                Ok(page) => page,
                Err(e) => {
                    warn!("Page fetch failed, buffer left at {} items: {}", self.buffered(), e);
                    return Err(e);
                }
            };

            let appended = self.state.borrow_mut().absorb(page)?;
            debug!(
                "Appended {} items (buffered: {}, exhausted: {})",
                appended,
                self.buffered(),
                self.is_exhausted()
            );
        }
    }

    /// Grow until exhausted or the limit is reached
    fn ensure_all(&self) -> Result<()> {
        loop {
            let buffered = self.buffered();
            if !self.has_next() {
                return Ok(());
            }
            self.ensure(buffered)?;
        }
    }

    /// Number of items in the list (eager)
    ///
    /// Fetches every remaining page up to the limit. Calling it again does
    /// not fetch anything.
    pub fn len(&self) -> Result<usize> {
        self.ensure_all()?;
        Ok(self.buffered())
    }

    /// Check if the list has no items; fetches at most until the first item
    pub fn is_empty(&self) -> Result<bool> {
        self.ensure(0)?;
        Ok(self.buffered() == 0)
    }

    /// Slice the list
    ///
    /// The view reads through this list with its page size unchanged.
    /// Unsupported ranges fail before anything is fetched.
    pub fn slice(&self, range: impl Into<SliceRange>) -> Result<SliceView<'_, F>> {
        let plan = SlicePlan::resolve(range.into(), self.known_len(), self.limit().is_some())?;
        Ok(SliceView::new(self, plan))
    }

    /// Number of items buffered so far
    pub fn buffered(&self) -> usize {
        self.state.borrow().len()
    }

    /// Final length once no further growth is possible
    pub fn known_len(&self) -> Option<usize> {
        self.state.borrow().known_len()
    }

    /// Check if the source reported its last page
    pub fn is_exhausted(&self) -> bool {
        self.state.borrow().is_exhausted()
    }

    /// Check if more items may still be fetched
    pub fn has_next(&self) -> bool {
        self.state.borrow().has_next()
    }

    /// Limit fixed at construction
    pub fn limit(&self) -> Option<usize> {
        self.state.borrow().limit()
    }

    /// Page size requested per fetch
    pub fn page_size(&self) -> usize {
        self.state.borrow().page_size()
    }

    /// Cursor of the next page to fetch
    pub fn cursor(&self) -> Option<Cursor> {
        self.state.borrow().cursor().cloned()
    }

    /// Number of successful fetches
    pub fn fetch_count(&self) -> usize {
        self.state.borrow().fetch_count()
    }

    /// Get the fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

impl<F> LazyPagedList<F>
where
    F: PageFetcher,
    F::Item: Clone,
{
    /// Item at `index`, `None` past the final length
    pub fn lookup(&self, index: usize) -> Result<Option<F::Item>> {
        self.ensure(index)?;
        Ok(self.state.borrow().get(index).cloned())
    }

    /// Item at `index`
    pub fn get(&self, index: usize) -> Result<F::Item> {
        match self.lookup(index)? {
            Some(item) => Ok(item),
            None => Err(Error::out_of_range(index, self.buffered())),
        }
    }

    /// Iterate the list, fetching pages as positions are reached
    ///
    /// Each call starts from the first item and replays the buffer before
    /// fetching anything new.
    pub fn iter(&self) -> Iter<'_, F> {
        Iter {
            list: self,
            index: 0,
            done: false,
        }
    }

    /// Items buffered so far, without fetching
    pub fn buffered_items(&self) -> Vec<F::Item> {
        self.state.borrow().items().to_vec()
    }

    /// Fetch everything and return it as a vector
    pub fn to_vec(&self) -> Result<Vec<F::Item>> {
        self.ensure_all()?;
        Ok(self.buffered_items())
    }
}

impl<F: PageFetcher> std::fmt::Debug for LazyPagedList<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("LazyPagedList")
            .field("buffered", &state.len())
            .field("limit", &state.limit())
            .field("page_size", &state.page_size())
            .field("exhausted", &state.is_exhausted())
            .finish_non_exhaustive()
    }
}

impl<'a, F> IntoIterator for &'a LazyPagedList<F>
where
    F: PageFetcher,
    F::Item: Clone,
{
    type Item = Result<F::Item>;
    type IntoIter = Iter<'a, F>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`LazyPagedList`]
///
/// Yields `Err` once if a fetch fails and then ends.
pub struct Iter<'a, F: PageFetcher> {
    list: &'a LazyPagedList<F>,
    index: usize,
    done: bool,
}

impl<F> Iterator for Iter<'_, F>
where
    F: PageFetcher,
    F::Item: Clone,
{
    type Item = Result<F::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.list.lookup(self.index) {
            Ok(Some(item)) => {
                self.index += 1;
                Some(Ok(item))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let buffered = self.list.buffered().saturating_sub(self.index);
        let upper = self
            .list
            .known_len()
            .or(self.list.limit())
            .map(|len| len.saturating_sub(self.index));
        (buffered, upper)
    }
}

impl<F> FusedIterator for Iter<'_, F>
where
    F: PageFetcher,
    F::Item: Clone,
{
}
