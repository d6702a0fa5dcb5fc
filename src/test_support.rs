//! Shared helpers for unit tests

use crate::error::{Error, Result};
use crate::fetch::{AsyncPageFetcher, PageFetcher};
use crate::types::{Cursor, FetchRequest, Page};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Wraps a fetcher and fails selected attempts before they reach it
pub(crate) struct Flaky<F> {
    inner: F,
    fail_on: Mutex<Vec<usize>>,
    attempts: AtomicUsize,
    error: fn() -> Error,
}

impl<F> Flaky<F> {
    pub(crate) fn new(inner: F) -> Self {
        Self {
            inner,
            fail_on: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            error: || Error::http_status(503, "service unavailable"),
        }
    }

    /// Fail the given zero-based attempt (counting failed attempts too)
    pub(crate) fn fail_on_attempt(self, attempt: usize) -> Self {
        self.fail_on.lock().unwrap().push(attempt);
        self
    }

    pub(crate) fn with_error(mut self, error: fn() -> Error) -> Self {
        self.error = error;
        self
    }

    pub(crate) fn inner(&self) -> &F {
        &self.inner
    }

    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.lock().unwrap().contains(&attempt) {
            return Err((self.error)());
        }
        Ok(())
    }
}

impl<F: PageFetcher> PageFetcher for Flaky<F> {
    type Item = F::Item;

    fn fetch(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<F::Item>> {
        self.check()?;
        self.inner.fetch(cursor, page_size)
    }
}

#[async_trait]
impl<F: AsyncPageFetcher> AsyncPageFetcher for Flaky<F> {
    type Item = F::Item;

    async fn fetch(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<F::Item>> {
        self.check()?;
        self.inner.fetch(cursor, page_size).await
    }
}

/// Numbers `0..n` as test items
pub(crate) fn numbers(n: usize) -> Vec<usize> {
    (0..n).collect()
}

/// Serves pre-built pages one after another, ignoring the requested size
///
/// Page `i` links to page `i + 1` through the cursor `"i+1"`; the last page
/// has no next cursor.
pub(crate) struct ScriptedPages<T> {
    pages: Vec<Vec<T>>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl<T: Clone> ScriptedPages<T> {
    pub(crate) fn new(pages: Vec<Vec<T>>) -> Self {
        Self {
            pages,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn serve(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<T>> {
        self.requests
            .lock()
            .unwrap()
            .push(FetchRequest::new(cursor.cloned(), page_size));
        let index = cursor.map_or(0, |c| c.as_str().parse::<usize>().unwrap());
        let next = (index + 1 < self.pages.len()).then(|| Cursor::new((index + 1).to_string()));
        Ok(Page::new(self.pages[index].clone(), next))
    }
}

impl<T: Clone> PageFetcher for ScriptedPages<T> {
    type Item = T;

    fn fetch(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<T>> {
        self.serve(cursor, page_size)
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> AsyncPageFetcher for ScriptedPages<T> {
    type Item = T;

    async fn fetch(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<T>> {
        self.serve(cursor, page_size)
    }
}
