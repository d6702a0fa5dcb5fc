// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pagewise
//!
//! Lazy, cursor-driven pagination: a paginated source presented as one
//! indexable, sliceable list that fetches pages only when they are needed.
//!
//! ## Features
//!
//! - **Lazy growth**: pages are fetched in cursor order, only up to the index asked for
//! - **Limits**: a bounded list never requests more items than it will surface
//! - **Slices**: windows over a list that read through its buffer
//! - **Sync and async**: [`LazyPagedList`] and [`AsyncLazyPagedList`] share one state machine
//! - **JSON:API transport**: [`http::JsonApiFetcher`] follows `links.next` cursors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewise::http::{HttpClient, HttpClientConfig, JsonApiFetcher};
//! use pagewise::{AsyncLazyPagedList, ListOptions, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = HttpClientConfig::builder()
//!         .base_url("https://api.up.com.au/api/v1")
//!         .token("up:yeah:...")
//!         .build();
//!     let client = Arc::new(HttpClient::with_config(config)?);
//!
//!     // Only the first 5 transactions; a single request of page[size]=5
//!     let fetcher = JsonApiFetcher::new(client, "transactions");
//!     let mut list = AsyncLazyPagedList::with_options(fetcher, ListOptions::new().limit(5))?;
//!
//!     println!("{}", list.get(0).await?);
//!     println!("{} items", list.len().await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  LazyPagedList · AsyncLazyPagedList · SliceView (async too)  │
//! │  get · len · iter / stream · slice                           │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ next_request / absorb
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │               PageBuffer (shared state machine)              │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ fetch(cursor, page_size)
//! ┌──────────────┬───────────────┴────┬──────────────────────────┐
//! │ StaticPages  │ JsonApiFetcher     │ Mapped / BlockingFetcher │
//! └──────────────┴────────────────────┴──────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Cursors, pages and shared constants
pub mod types;

/// Page fetcher interface and adapters
pub mod fetch;

/// Lazy paged lists and slice views
pub mod pagination;

/// HTTP transport for JSON:API endpoints
pub mod http;

/// Client settings
pub mod config;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod test_support;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use fetch::{AsyncPageFetcher, PageFetcher};
pub use pagination::{
    AsyncLazyPagedList, AsyncSliceView, LazyPagedList, LazySequence, ListOptions, SliceRange,
    SliceView,
};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
