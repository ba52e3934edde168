//! Transport error types
//!
//! A `TransportError` is the only failure a feed surfaces. It moves the
//! controller into `FeedPhase::Error` and stays available through
//! `FeedController::last_error` until the next reset. Stale responses are not
//! errors and never produce one.

use thiserror::Error;

/// Network or response-shape failure of a page request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be sent or the connection failed
    #[error("Request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status
    #[error("Server returned HTTP {0}")]
    Status(u16),

    /// The request exceeded its timeout
    #[error("Request timed out")]
    Timeout,

    /// The body was not valid JSON
    #[error("Could not decode response body: {0}")]
    Decode(String),

    /// The body was JSON but not a page
    #[error("Malformed page: {0}")]
    Malformed(String),

    /// The request task ended without producing a response
    #[error("Request ended without a response")]
    Closed,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
