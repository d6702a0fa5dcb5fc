//! Page fetcher for JSON:API list endpoints
//!
//! A page is a document with the items under `data` and the URL of the
//! following page under `links.next` (`null` on the last page). The next
//! URL is the cursor.

use super::client::HttpClient;
use super::filters::Filters;
use crate::error::{Error, Result};
use crate::fetch::AsyncPageFetcher;
use crate::types::{Cursor, Page, PAGE_SIZE_PARAM};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Fetches pages of raw JSON items from one endpoint
#[derive(Debug, Clone)]
pub struct JsonApiFetcher {
    client: Arc<HttpClient>,
    endpoint: String,
    filters: Filters,
}

impl JsonApiFetcher {
    /// Fetch from `endpoint`, relative to the client's base URL
    pub fn new(client: Arc<HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            filters: Filters::new(),
        }
    }

    /// Send these filters with the first request
    #[must_use]
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// Get the endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get the client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

#[async_trait]
impl AsyncPageFetcher for JsonApiFetcher {
    type Item = Value;

    async fn fetch(&self, cursor: Option<&Cursor>, page_size: usize) -> Result<Page<Value>> {
        let body: Value = match cursor {
            None => {
                let mut query = self.filters.to_query();
                query.push((PAGE_SIZE_PARAM.to_string(), page_size.to_string()));
                self.client.get_json(&self.endpoint, &query).await?
            }
            Some(cursor) => {
                let url = with_page_size(cursor.as_str(), page_size)?;
                self.client.get_json(url.as_str(), &[]).await?
            }
        };

        let page = decode_page(body)?;
        debug!(
            "Decoded {} items from {} (last page: {})",
            page.len(),
            self.endpoint,
            page.is_last()
        );
        Ok(page)
    }
}

/// Rewrite the page size of a next link, keeping every other parameter
pub fn with_page_size(next: &str, page_size: usize) -> Result<Url> {
    let mut url = Url::parse(next)?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != PAGE_SIZE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(PAGE_SIZE_PARAM, &page_size.to_string());
    Ok(url)
}

/// Split a JSON:API document into items and next link
pub fn decode_page(mut body: Value) -> Result<Page<Value>> {
    let next = body
        .pointer("/links/next")
        .and_then(Value::as_str)
        .map(Cursor::new);

    match body.get_mut("data").map(Value::take) {
        Some(Value::Array(items)) => Ok(Page::new(items, next)),
        Some(other) => Err(Error::decode(format!(
            "expected 'data' to be an array, got {}",
            json_type(&other)
        ))),
        None => Err(Error::decode("response has no 'data' member")),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
