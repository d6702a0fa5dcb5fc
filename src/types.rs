//! Common types used throughout pagewise
//!
//! This module contains the page and cursor types shared by the fetchers,
//! the pagination engine and the HTTP glue.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Number of items requested per page when no page size is given
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Response header carrying the number of requests left in the quota
pub const RATE_LIMIT_HEADER: &str = "X-RateLimit-Remaining";

/// Query parameter carrying the requested page size
pub const PAGE_SIZE_PARAM: &str = "page[size]";

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// Cursor
// ============================================================================

/// Opaque continuation token identifying the next page
///
/// The engine never looks inside a cursor. For the HTTP fetcher it is the
/// `links.next` URL, for the in-memory fetcher an offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Create a cursor from any token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the raw token
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Cursor {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for Cursor {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

// ============================================================================
// Page
// ============================================================================

/// One fetch worth of items plus the cursor of the following page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in server order
    pub items: Vec<T>,
    /// Cursor of the next page, `None` once the source is exhausted
    pub next: Option<Cursor>,
}

impl<T> Page<T> {
    /// Create a page that links to another one
    pub fn new(items: Vec<T>, next: Option<Cursor>) -> Self {
        Self { items, next }
    }

    /// Create the final page of a source
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }

    /// Check if this is the final page
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page carries no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Convert every item, keeping the cursor
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(Page {
            items,
            next: self.next,
        })
    }
}

// ============================================================================
// Fetch Request
// ============================================================================

/// Parameters of a single page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Cursor to resume from, `None` for the first page
    pub cursor: Option<Cursor>,
    /// Number of items asked for
    pub page_size: usize,
}

impl FetchRequest {
    /// Create a fetch request
    pub fn new(cursor: Option<Cursor>, page_size: usize) -> Self {
        Self { cursor, page_size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_roundtrip() {
        let cursor = Cursor::new("https://api.example.com/items?page[after]=abc");
        assert_eq!(
            cursor.as_str(),
            "https://api.example.com/items?page[after]=abc"
        );
        assert_eq!(cursor.to_string(), cursor.clone().into_inner());

        let json = serde_json::to_string(&Cursor::from("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }

    #[test]
    fn test_page_last() {
        let page = Page::last(vec![1, 2, 3]);
        assert!(page.is_last());
        assert_eq!(page.len(), 3);

        let page: Page<i32> = Page::new(vec![], Some(Cursor::from("next")));
        assert!(!page.is_last());
        assert!(page.is_empty());
    }

    #[test]
    fn test_page_try_map_keeps_cursor() {
        let page = Page::new(vec!["1", "2"], Some(Cursor::from("c2")));
        let mapped: Page<u32> = page.try_map(str::parse).unwrap();
        assert_eq!(mapped.items, vec![1, 2]);
        assert_eq!(mapped.next, Some(Cursor::from("c2")));

        let page = Page::last(vec!["1", "x"]);
        assert!(page.try_map(str::parse::<u32>).is_err());
    }
}
