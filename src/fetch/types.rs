//! Fetcher traits and the item mapping adapter

use crate::error::{Error, Result};
use crate::types::{Cursor, Page};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Blocking source of cursor-linked pages
///
/// `fetch` is called with `None` for the first page and afterwards with the
/// cursor returned by the previous page. Implementations must not retry:
/// failures go straight back to the list that asked.
pub trait PageFetcher {
    /// Raw item type carried by the pages
    type Item;

    /// Fetch one page of at most `page_size` items
    fn fetch(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<Self::Item>>;

    /// Map every item of every page through `mapper`
    fn map_items<M>(self, mapper: M) -> Mapped<Self, M>
    where
        Self: Sized,
        M: ItemMapper<Self::Item>,
    {
        Mapped::new(self, mapper)
    }
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    type Item = F::Item;

    fn fetch(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<Self::Item>> {
        (**self).fetch(cursor, page_size)
    }
}

impl<F: PageFetcher + ?Sized> PageFetcher for Box<F> {
    type Item = F::Item;

    fn fetch(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<Self::Item>> {
        (**self).fetch(cursor, page_size)
    }
}

/// Asynchronous source of cursor-linked pages
///
/// Same contract as [`PageFetcher`]. The returned future is the only place
/// where an [`AsyncLazyPagedList`](crate::pagination::AsyncLazyPagedList)
/// suspends.
#[async_trait]
pub trait AsyncPageFetcher: Send + Sync {
    /// Raw item type carried by the pages
    type Item: Send;

    /// Fetch one page of at most `page_size` items
    async fn fetch(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<Self::Item>>;
}

#[async_trait]
impl<F: AsyncPageFetcher + ?Sized> AsyncPageFetcher for std::sync::Arc<F> {
    type Item = F::Item;

    async fn fetch(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<Self::Item>> {
        (**self).fetch(cursor, page_size).await
    }
}

// ============================================================================
// Item Mapping
// ============================================================================

/// Converts a raw item into a domain value
pub trait ItemMapper<R> {
    /// Domain value produced by the mapper
    type Output;

    /// Map a single raw item
    fn map(&self, raw: R) -> Result<Self::Output>;
}

impl<R, T, F> ItemMapper<R> for F
where
    F: Fn(R) -> Result<T>,
{
    type Output = T;

    fn map(&self, raw: R) -> Result<T> {
        self(raw)
    }
}

/// Mapper that deserializes JSON items into `T`
pub struct FromJson<T>(PhantomData<fn() -> T>);

impl<T> FromJson<T> {
    /// Create a JSON mapper
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for FromJson<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for FromJson<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FromJson<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromJson")
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned> ItemMapper<Value> for FromJson<T> {
    type Output = T;

    fn map(&self, raw: Value) -> Result<T> {
        serde_json::from_value(raw).map_err(|e| Error::decode(e.to_string()))
    }
}

/// Fetcher adapter that maps every item of a page
///
/// A mapping failure fails the whole page, so a list never sees half of a
/// page.
#[derive(Debug, Clone)]
pub struct Mapped<F, M> {
    fetcher: F,
    mapper: M,
}

impl<F, M> Mapped<F, M> {
    /// Wrap a fetcher with a mapper
    pub fn new(fetcher: F, mapper: M) -> Self {
        Self { fetcher, mapper }
    }

    /// Get the wrapped fetcher
    pub fn inner(&self) -> &F {
        &self.fetcher
    }
}

impl<F, M> PageFetcher for Mapped<F, M>
where
    F: PageFetcher,
    M: ItemMapper<F::Item>,
{
    type Item = M::Output;

    fn fetch(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<Self::Item>> {
        let page = self.fetcher.fetch(cursor, page_size)?;
        page.try_map(|raw| self.mapper.map(raw))
    }
}

#[async_trait]
impl<F, M> AsyncPageFetcher for Mapped<F, M>
where
    F: AsyncPageFetcher,
    M: ItemMapper<F::Item> + Send + Sync,
    M::Output: Send,
{
    type Item = M::Output;

    async fn fetch(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<Self::Item>> {
        let page = self.fetcher.fetch(cursor, page_size).await?;
        page.try_map(|raw| self.mapper.map(raw))
    }
}
