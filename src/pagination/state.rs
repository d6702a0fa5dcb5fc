//! Pagination state shared by the sync and async lists
//!
//! [`PageBuffer`] is the whole growth algorithm minus the actual fetch:
//! [`PageBuffer::next_request`] says which page (if any) must be fetched
//! before an index can be read, and [`PageBuffer::absorb`] appends the page
//! once the fetch has succeeded. The two list types only differ in how they
//! wait for the fetch in between.

use crate::error::{Error, Result};
use crate::types::{Cursor, FetchRequest, Page, DEFAULT_PAGE_SIZE};

/// Construction options for a paged list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Maximum number of items the list will ever surface
    pub limit: Option<usize>,
    /// Explicit page size, overrides the limit-derived one
    pub page_size: Option<usize>,
    /// Page size used when none is given explicitly
    pub default_page_size: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: None,
            page_size: None,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListOptions {
    /// Create default options (no limit, default page size)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limit
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set an explicit page size
    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Replace the default page size
    #[must_use]
    pub fn default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size;
        self
    }

    /// Page size the list will request
    ///
    /// Without an explicit page size a limited list never asks for more than
    /// its limit on the first call.
    pub fn effective_page_size(&self) -> Result<usize> {
        let page_size = match (self.page_size, self.limit) {
            (Some(size), _) => size,
            (None, Some(limit)) => self.default_page_size.min(limit.max(1)),
            (None, None) => self.default_page_size,
        };
        if page_size == 0 {
            return Err(Error::invalid_operation("page size must be at least 1"));
        }
        Ok(page_size)
    }
}

/// Buffer, cursor and fetch bookkeeping of one paged list
#[derive(Debug, Clone)]
pub struct PageBuffer<T> {
    items: Vec<T>,
    cursor: Option<Cursor>,
    exhausted: bool,
    limit: Option<usize>,
    page_size: usize,
    fetches: usize,
}

impl<T> Default for PageBuffer<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
            exhausted: false,
            limit: None,
            page_size: DEFAULT_PAGE_SIZE,
            fetches: 0,
        }
    }
}

impl<T> PageBuffer<T> {
    /// Create an empty buffer, nothing fetched yet
    pub fn new(options: ListOptions) -> Result<Self> {
        Ok(Self {
            items: Vec::new(),
            cursor: None,
            exhausted: false,
            limit: options.limit,
            page_size: options.effective_page_size()?,
            fetches: 0,
        })
    }

    /// Items buffered so far
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Item at `index` if it is already buffered
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Number of items buffered so far
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing is buffered yet
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cursor of the next page to fetch
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Check if the source reported its last page
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Maximum number of items this list will surface
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Page size requested per fetch
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of successful fetches
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    /// Check if growing the buffer is still possible
    pub fn has_next(&self) -> bool {
        !self.exhausted && self.limit.map_or(true, |limit| self.items.len() < limit)
    }

    /// Final length, once no further growth is possible
    pub fn known_len(&self) -> Option<usize> {
        (!self.has_next()).then_some(self.items.len())
    }

    /// Size of the next request, capped so the limit is never overshot
    pub fn request_size(&self) -> usize {
        match self.limit {
            Some(limit) => self.page_size.min(limit.saturating_sub(self.items.len())),
            None => self.page_size,
        }
    }

    /// The fetch required before `index` can be read
    ///
    /// `None` when the index is already buffered or when no fetch could ever
    /// reach it (exhausted source or limit reached).
    pub fn next_request(&self, index: usize) -> Option<FetchRequest> {
        if index < self.items.len() || !self.has_next() {
            return None;
        }
        Some(FetchRequest::new(self.cursor.clone(), self.request_size()))
    }

    /// The fetch required to reach the end of the list, if any
    pub fn next_request_to_end(&self) -> Option<FetchRequest> {
        self.next_request(self.items.len())
    }

    /// Append a fetched page and advance the cursor
    ///
    /// Items beyond the limit are dropped. Returns how many items were
    /// appended. A page that links back to the cursor it was fetched with is
    /// rejected, leaving the buffer untouched.
    pub fn absorb(&mut self, page: Page<T>) -> Result<usize> {
        if page.next.is_some() && page.next == self.cursor {
            return Err(Error::invalid_operation(format!(
                "page links back to its own cursor '{}'",
                self.cursor.as_ref().map_or("", Cursor::as_str)
            )));
        }

        let mut items = page.items;
        if let Some(limit) = self.limit {
            items.truncate(limit.saturating_sub(self.items.len()));
        }
        let appended = items.len();

        self.items.extend(items);
        self.exhausted = page.next.is_none();
        self.cursor = page.next;
        self.fetches += 1;
        Ok(appended)
    }
}
