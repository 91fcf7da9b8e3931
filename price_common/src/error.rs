//! Error types shared by the library and the binary.
//!
//! The `QuoteError` enum unifies I/O, HTTP, (de)serialization, upstream and
//! configuration failures so that every stage can propagate a single error
//! type with `?`.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type for the workspace.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// I/O error originating from the standard library (table file, stdout).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport failure reported by the HTTP client (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure while decoding a provider payload via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The provider answered with a non-success status code.
    #[error("Upstream returned status {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL, without the crumb.
        url: String,
    },

    /// The provider throttled the request (HTTP 429).
    #[error("Upstream rate limited request to {0}")]
    RateLimited(String),

    /// The provider answered successfully but reported an API-level error.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The provider returned no data for the requested symbol.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// Cookie/crumb handshake with the provider failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid configuration value (e.g. a zero interval).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),

    /// Failure while installing the interrupt handler.
    #[error("Signal handler error: {0}")]
    Signal(String),
}

impl<T> From<PoisonError<T>> for QuoteError {
    fn from(err: PoisonError<T>) -> Self {
        QuoteError::MutexLock(err.to_string())
    }
}
