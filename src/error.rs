//! Error types for pagewise
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! The pagination engine never creates fetch failures itself. Whatever the
//! fetcher returns is handed back to the caller unchanged, and the list state
//! is left exactly as it was after the last successful page.

use thiserror::Error;

/// The main error type for pagewise
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Not authorized: {message}")]
    Auth { message: String },

    // ============================================================================
    // Rate Limit Errors
    // ============================================================================
    #[error("Rate limit exceeded ({} requests remaining)", remaining_display(.remaining))]
    RateLimitExceeded { remaining: Option<u64> },

    // ============================================================================
    // List Errors
    // ============================================================================
    #[error("Invalid operation: {message}")]
    InvalidOperation { message: String },

    #[error("Index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn remaining_display(remaining: &Option<u64>) -> String {
    remaining.map_or_else(|| "unknown".to_string(), |r| r.to_string())
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network or HTTP level failure reported by the fetcher
    TransportFailure,
    /// Invalid or expired credential
    AuthFailure,
    /// Request quota exhausted at the server
    RateLimitExceeded,
    /// Unsupported operation, rejected before any fetch
    InvalidOperation,
    /// Index past the final length of a list
    IndexOutOfRange,
    /// Decoding, configuration and other glue failures
    Other,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an invalid operation error
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Create an index out of range error
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(_) | Error::HttpStatus { .. } | Error::InvalidUrl(_) => {
                ErrorKind::TransportFailure
            }
            Error::Auth { .. } => ErrorKind::AuthFailure,
            Error::RateLimitExceeded { .. } => ErrorKind::RateLimitExceeded,
            Error::InvalidOperation { .. } => ErrorKind::InvalidOperation,
            Error::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            _ => ErrorKind::Other,
        }
    }

    /// Check if this error came out of a page fetch
    ///
    /// Fetch failures leave the list untouched, so the operation that hit
    /// them can simply be called again.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::TransportFailure | ErrorKind::AuthFailure | ErrorKind::RateLimitExceeded
        )
    }
}

/// Result type alias for pagewise
pub type Result<T> = std::result::Result<T, Error>;
