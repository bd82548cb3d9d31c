//! Error types for searchweb.
//!
//! Library crates use [`SearchWebError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all searchweb operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchWebError {
    /// Configuration loading or validation error (includes a missing API key).
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport-level failure: DNS, connect, timeout, body read.
    #[error("network error: {0}")]
    Network(String),

    /// The remote service answered with a non-2xx status.
    #[error("{service} HTTP error: {status}\n{body}")]
    HttpStatus {
        service: String,
        status: u16,
        body: String,
    },

    /// The remote chat API returned JSON of an unexpected shape.
    #[error("unexpected {service} response schema:\n{response}")]
    Schema { service: String, response: String },

    /// A response body that should have been JSON was not.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (out-of-range value, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SearchWebError>;

impl SearchWebError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Schema error carrying the full response, pretty-printed.
    pub fn schema(service: impl Into<String>, response: &serde_json::Value) -> Self {
        let response = serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string());
        Self::Schema {
            service: service.into(),
            response,
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
