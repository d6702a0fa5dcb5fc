//! Pagination module
//!
//! Turns a cursor-linked page source into one lazily grown list.
//!
//! # Overview
//!
//! - [`LazyPagedList`] - blocking list, fetches pages as indices are reached
//! - [`AsyncLazyPagedList`] - the same list with the fetch as a suspension point
//! - [`SliceView`] / [`AsyncSliceView`] - windows that read through their parent
//! - [`PageBuffer`] - the state machine both lists drive
//! - [`LazySequence`] - interface shared by lists and slice views
//!
//! A list is bounded by an optional limit. When a limit is set and no page
//! size is given, the page size shrinks to the limit so a small bounded list
//! costs exactly one request. Slicing never changes the page size.

mod async_list;
mod list;
mod sequence;
mod slice;
mod state;

pub use async_list::AsyncLazyPagedList;
pub use list::{Iter, LazyPagedList};
pub use sequence::{LazySequence, SequenceIter};
pub use slice::{AsyncSliceView, ItemStream, SliceIter, SlicePlan, SliceRange, SliceView};
pub use state::{ListOptions, PageBuffer};
