//! Failures surfaced by the search-graph adapter.

use std::time::Duration;
use thiserror::Error;

/// Everything that can go wrong between building a request and decoding its response.
#[derive(Debug, Error)]
pub enum SearchGraphError {
    /// An API key environment variable is unset or blank.
    #[error("Required credential not set: {0}")]
    MissingCredential(String),

    /// The endpoint or client settings are unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The service or one of its providers signalled a rate limit.
    #[error("Search graph rate limited the request (retry after: {retry_after:?})")]
    RateLimited {
        /// Parsed `Retry-After` header, if present.
        retry_after: Option<Duration>,
        /// Truncated response body.
        body: String,
    },

    /// Non-success status that is not a rate limit.
    #[error("Search graph returned status {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// Connection, timeout or body-read failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response whose body could not be read as a record.
    #[error("Failed to decode search graph response: {0}")]
    Decode(String),
}
