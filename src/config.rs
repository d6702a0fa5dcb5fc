//! Client settings
//!
//! Settings are read from an optional YAML file; the access token can also
//! come from the environment so it never has to be written to disk:
//!
//! ```yaml
//! base_url: https://api.up.com.au/api/v1
//! page_size: 50
//! timeout_secs: 10
//! ```

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::types::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the access token
pub const TOKEN_ENV: &str = "PAGEWISE_TOKEN";

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "https://api.up.com.au/api/v1";

// ============================================================================
// Settings
// ============================================================================

/// Connection and paging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL for API requests
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token
    #[serde(default)]
    pub token: Option<String>,

    /// Page size requested when a command gives none
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse settings YAML: {e}")))
    }

    /// Take the token from the environment unless one is already set
    #[must_use]
    pub fn with_env_token(self) -> Self {
        self.fallback_token(std::env::var(TOKEN_ENV).ok())
    }

    /// Use `token` unless one is already set; empty values are ignored
    #[must_use]
    pub fn fallback_token(mut self, token: Option<String>) -> Self {
        if self.token.is_none() {
            self.token = token.filter(|t| !t.trim().is_empty());
        }
        self
    }

    /// Check the settings before any request is made
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::config("base_url cannot be empty"));
        }
        Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("Invalid base_url '{}': {}", self.base_url, e)))?;

        if self.page_size == 0 {
            return Err(Error::config("page_size must be at least 1"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be at least 1"));
        }
        Ok(())
    }

    /// HTTP client configuration for these settings
    pub fn http_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .base_url(self.base_url.clone())
            .timeout(Duration::from_secs(self.timeout_secs));
        match &self.token {
            Some(token) => builder.token(token.clone()).build(),
            None => builder.build(),
        }
    }
}
