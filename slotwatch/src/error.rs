//! Error types for the probe
//!
//! Every variant here except `EndpointListError` is recoverable: it is reported
//! where it happens and the endpoint is skipped for the current tick.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure to obtain a response body from an RPC endpoint
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request could not be built or sent (DNS, connect, TLS, ...)
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// No response within the allowed time
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Endpoint answered with a non-success status
    #[error("Non-OK HTTP status: {0}")]
    Status(u16),

    /// Body could not be read
    #[error("Failed to read response body: {0}")]
    Body(String),
}

impl FetchError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Failure to decode a batched probe response
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    /// Body was not valid JSON
    #[error("JSON unmarshalling failed: {0}")]
    InvalidJson(String),

    /// Body was JSON but not an array of response objects
    #[error("Response is not a JSON-RPC batch")]
    NotABatch,

    /// Batch has fewer elements than were requested
    #[error("Batch response has {actual} elements, expected {expected}")]
    ShortBatch {
        /// Elements required
        expected: usize,
        /// Elements received
        actual: usize,
    },

    /// Sub-call returned a JSON-RPC error object
    #[error("{field}: RPC error {code}: {message}")]
    Rpc {
        /// Field being extracted
        field: &'static str,
        /// JSON-RPC error code
        code: i64,
        /// JSON-RPC error message
        message: String,
    },

    /// Sub-call has no `result`
    #[error("{0}: missing result")]
    MissingResult(&'static str),

    /// `result` is not a usable non-negative number
    #[error("{field}: invalid value {value}")]
    InvalidValue {
        /// Field being extracted
        field: &'static str,
        /// Offending JSON value
        value: String,
    },
}

/// Reasons a probe of one endpoint produced no data this tick
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Fetch failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Response could not be decoded
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Tick deadline passed before the fetch finished
    #[error("Tick deadline exceeded")]
    DeadlineExceeded,
}

/// Fatal startup error while loading the endpoint list
#[derive(Debug, Error)]
pub enum EndpointListError {
    /// File missing or unreadable
    #[error("Failed to read endpoint file {}: {source}", path.display())]
    Read {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Line is not an http(s) URL
    #[error("Invalid endpoint on line {line} of {}: {value:?}", path.display())]
    InvalidEntry {
        /// Path that was read
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Offending text
        value: String,
    },
}
