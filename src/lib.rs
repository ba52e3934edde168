//! Entity feed - paginated search over companies, banks and venues
//!
//! This library drives an infinitely scrolling entity listing: query edits
//! are debounced, each settled query starts a new generation of page
//! requests, responses from superseded generations are dropped, and every
//! entity gets a logo asset resolved from its name.
//!
//! # Modules
//!
//! - [`feed`]: the controller and its state machine
//! - [`debounce`]: trailing-edge debounce of query edits
//! - [`trigger`]: continuation when the end-of-list sentinel is visible
//! - [`session`]: the three wired together for one screen
//! - [`resolver`]: name to asset resolution over an alias dictionary
//! - [`backend`]: the search service seam and its HTTP implementation

use thiserror::Error;

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod feed;
pub mod logging;
pub mod output;
pub mod query;
pub mod resolver;
pub mod session;
pub mod trigger;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum FeedError {
    /// Alias dictionary could not be loaded
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] resolver::DictionaryError),
    /// Search request failed
    #[error("Search failed: {0}")]
    Transport(#[from] feed::TransportError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON output could not be written
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// CSV output could not be written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversions() {
        let error: FeedError = feed::TransportError::Status(503).into();
        assert_eq!(error.to_string(), "Search failed: Server returned HTTP 503");

        let error: FeedError = resolver::DictionaryError::EmptyPlaceholder.into();
        assert!(error.to_string().starts_with("Dictionary error: "));

        let error = FeedError::InvalidInput("bad filter".to_string());
        assert_eq!(error.to_string(), "Invalid input: bad filter");
    }
}
