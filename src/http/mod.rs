//! HTTP module
//!
//! Connects the pagination engine to JSON:API style REST endpoints.
//!
//! # Features
//!
//! - **Single-shot requests**: no retry or backoff, failures go back to the list
//! - **Bearer authentication**: token from the client configuration
//! - **Rate limit pass-through**: `X-RateLimit-Remaining` is recorded and a
//!   429 becomes [`Error::RateLimitExceeded`](crate::Error::RateLimitExceeded)
//! - **Cursor = next link**: [`JsonApiFetcher`] follows `links.next`

mod client;
mod fetcher;
mod filters;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use fetcher::{decode_page, with_page_size, JsonApiFetcher};
pub use filters::Filters;
