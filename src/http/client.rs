//! HTTP client for cursor-paginated JSON APIs
//!
//! Sends one request per call and never retries: a failed request goes
//! straight back to the paged list, which keeps its cursor so the caller
//! can try again. Handles:
//! - Bearer token authentication
//! - Status classification (401, 429, other failures)
//! - Rate limit header bookkeeping

use crate::error::{Error, Result};
use crate::types::RATE_LIMIT_HEADER;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Sentinel stored while no rate limit header has been seen
const REMAINING_UNKNOWN: u64 = u64::MAX;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for relative paths
    pub base_url: Option<String>,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("pagewise/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the bearer token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Single-shot JSON client
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    remaining: AtomicU64,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            remaining: AtomicU64::new(REMAINING_UNKNOWN),
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Requests left according to the last rate limit header seen
    pub fn rate_limit_remaining(&self) -> Option<u64> {
        match self.remaining.load(Ordering::Relaxed) {
            REMAINING_UNKNOWN => None,
            remaining => Some(remaining),
        }
    }

    /// GET a path or absolute URL and parse the JSON body
    ///
    /// `204 No Content` parses as an empty object.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let full_url = self.build_url(url);

        let mut req = self.client.get(&full_url);
        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if let Some(token) = &self.config.token {
            req = req.bearer_auth(token);
        }
        if !query.is_empty() {
            req = req.query(query);
        }

        let response = req.send().await?;
        self.record_remaining(&response);
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::auth(error_detail(&body).unwrap_or_else(|| {
                "request was not authorized, check the access token".to_string()
            })));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let remaining = self.rate_limit_remaining();
            warn!("Rate limited (429) on GET {}", full_url);
            return Err(Error::RateLimitExceeded { remaining });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        debug!("Request succeeded: GET {} ({})", full_url, status.as_u16());

        if status == StatusCode::NO_CONTENT {
            return Ok(serde_json::from_value(Value::Object(serde_json::Map::new()))?);
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Check the token against the API's ping endpoint
    ///
    /// Returns the id the API reports for the token.
    pub async fn ping(&self) -> Result<String> {
        let body: Value = self.get_json("util/ping", &[]).await?;
        body.pointer("/meta/id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::decode("ping response has no meta.id"))
    }

    fn record_remaining(&self, response: &Response) {
        let remaining = response
            .headers()
            .get(RATE_LIMIT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());
        if let Some(remaining) = remaining {
            self.remaining.store(remaining, Ordering::Relaxed);
        }
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .field("has_token", &self.config.token.is_some())
            .field("rate_limit_remaining", &self.rate_limit_remaining())
            .finish_non_exhaustive()
    }
}

/// First JSON:API error detail in a response body
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/errors/0/detail")
        .and_then(Value::as_str)
        .map(str::to_string)
}
