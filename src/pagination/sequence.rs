//! Common interface of lazily fetched sequences

use super::list::LazyPagedList;
use super::slice::{SliceRange, SliceView};
use crate::error::Result;
use crate::fetch::PageFetcher;

/// Boxed iterator over sequence items
pub type SequenceIter<'a, T> = Box<dyn Iterator<Item = Result<T>> + 'a>;

/// Indexed, sliceable view of a sequence that is fetched on demand
///
/// Implemented by [`LazyPagedList`] and its [`SliceView`]s so callers can
/// treat a whole list and a window of it the same way.
pub trait LazySequence {
    /// Item type
    type Item;

    /// Slice type produced by [`LazySequence::slice`]
    type Slice<'s>: LazySequence<Item = Self::Item>
    where
        Self: 's;

    /// Item at `index`, fetching as needed
    fn get(&self, index: usize) -> Result<Self::Item>;

    /// Number of items (eager)
    fn len(&self) -> Result<usize>;

    /// Check if the sequence has no items
    fn is_empty(&self) -> Result<bool>;

    /// Iterate from the first item
    fn iter(&self) -> SequenceIter<'_, Self::Item>;

    /// Window over `range`
    fn slice(&self, range: SliceRange) -> Result<Self::Slice<'_>>;
}

impl<F> LazySequence for LazyPagedList<F>
where
    F: PageFetcher,
    F::Item: Clone,
{
    type Item = F::Item;
    type Slice<'s> = SliceView<'s, F> where Self: 's;

    fn get(&self, index: usize) -> Result<F::Item> {
        LazyPagedList::get(self, index)
    }

    fn len(&self) -> Result<usize> {
        LazyPagedList::len(self)
    }

    fn is_empty(&self) -> Result<bool> {
        LazyPagedList::is_empty(self)
    }

    fn iter(&self) -> SequenceIter<'_, F::Item> {
        Box::new(LazyPagedList::iter(self))
    }

    fn slice(&self, range: SliceRange) -> Result<SliceView<'_, F>> {
        LazyPagedList::slice(self, range)
    }
}

impl<'a, F> LazySequence for SliceView<'a, F>
where
    F: PageFetcher,
    F::Item: Clone,
{
    type Item = F::Item;
    type Slice<'s> = SliceView<'a, F> where Self: 's;

    fn get(&self, index: usize) -> Result<F::Item> {
        SliceView::get(self, index)
    }

    fn len(&self) -> Result<usize> {
        SliceView::len(self)
    }

    fn is_empty(&self) -> Result<bool> {
        SliceView::is_empty(self)
    }

    fn iter(&self) -> SequenceIter<'_, F::Item> {
        Box::new(SliceView::iter(self))
    }

    fn slice(&self, range: SliceRange) -> Result<SliceView<'a, F>> {
        SliceView::slice(self, range)
    }
}
