//! Page fetcher module
//!
//! The narrow interface between the pagination engine and whatever serves
//! the pages.
//!
//! # Overview
//!
//! - [`PageFetcher`] - blocking fetch of one page for a cursor
//! - [`AsyncPageFetcher`] - the same contract with the fetch as a suspension point
//! - [`ItemMapper`] / [`Mapped`] - turn raw items into domain values page by page
//! - [`BlockingFetcher`] - drive an async fetcher from synchronous code
//! - [`StaticPages`] - in-memory source, cursor is the offset of the next item

mod blocking;
mod memory;
mod types;

pub use blocking::BlockingFetcher;
pub use memory::StaticPages;
pub use types::{AsyncPageFetcher, FromJson, ItemMapper, Mapped, PageFetcher};
