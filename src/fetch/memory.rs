//! In-memory page source

use super::types::{AsyncPageFetcher, PageFetcher};
use crate::error::{Error, Result};
use crate::types::{Cursor, FetchRequest, Page};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use tracing::trace;

/// Serves a fixed vector of items as cursor-linked pages
///
/// The cursor is the offset of the next item. An optional server-side cap
/// limits how many items a page carries regardless of the requested size,
/// the way real APIs clamp `page[size]`. Every request is recorded.
#[derive(Debug)]
pub struct StaticPages<T> {
    items: Vec<T>,
    max_page_len: Option<usize>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl<T: Clone> StaticPages<T> {
    /// Serve `items`, honoring the requested page size
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            max_page_len: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Never serve more than `len` items per page
    #[must_use]
    pub fn with_max_page_len(mut self, len: usize) -> Self {
        self.max_page_len = Some(len);
        self
    }

    /// Total number of items at the source
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// All requests received so far, in order
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requested page sizes, in order
    pub fn requested_sizes(&self) -> Vec<usize> {
        self.requests().iter().map(|r| r.page_size).collect()
    }

    /// Number of fetches served
    pub fn fetch_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn serve(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<T>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(FetchRequest::new(cursor.cloned(), page_size));

        let offset = match cursor {
            Some(c) => c
                .as_str()
                .parse::<usize>()
                .map_err(|_| Error::decode(format!("invalid offset cursor '{c}'")))?,
            None => 0,
        };
        let offset = offset.min(self.items.len());
        let len = self.max_page_len.map_or(page_size, |max| max.min(page_size));
        let end = (offset + len).min(self.items.len());

        trace!("Serving items {}..{} of {}", offset, end, self.items.len());

        let next = (end < self.items.len()).then(|| Cursor::new(end.to_string()));
        Ok(Page::new(self.items[offset..end].to_vec(), next))
    }
}

impl<T: Clone> PageFetcher for StaticPages<T> {
    type Item = T;

    fn fetch(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<T>> {
        self.serve(cursor, page_size)
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> AsyncPageFetcher for StaticPages<T> {
    type Item = T;

    async fn fetch(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<T>> {
        self.serve(cursor, page_size)
    }
}
