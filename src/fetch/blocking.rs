//! Blocking adapter for asynchronous fetchers
//!
//! Lets a [`LazyPagedList`](crate::pagination::LazyPagedList) run on top of
//! an [`AsyncPageFetcher`] such as the HTTP fetcher.

use super::types::{AsyncPageFetcher, PageFetcher};
use crate::error::Result;
use crate::types::{Cursor, Page};
use tokio::runtime::{Builder, Runtime};

/// Runs an async fetcher to completion on a private current-thread runtime
///
/// Must not be used from inside another tokio runtime: `block_on` panics
/// when nested.
pub struct BlockingFetcher<F> {
    fetcher: F,
    runtime: Runtime,
}

impl<F: AsyncPageFetcher> BlockingFetcher<F> {
    /// Wrap an async fetcher
    pub fn new(fetcher: F) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { fetcher, runtime })
    }

    /// Get the wrapped fetcher
    pub fn inner(&self) -> &F {
        &self.fetcher
    }
}

impl<F: AsyncPageFetcher> PageFetcher for BlockingFetcher<F> {
    type Item = F::Item;

    fn fetch(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<Self::Item>> {
        self.runtime.block_on(self.fetcher.fetch(cursor, page_size))
    }
}

impl<F> std::fmt::Debug for BlockingFetcher<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingFetcher").finish_non_exhaustive()
    }
}
