//! Search service access
//!
//! The feed controller only needs one capability from the outside world:
//! "fetch this page". [`SearchBackend`] is that seam. [`HttpBackend`] talks to
//! the real service; tests substitute scripted implementations.

pub mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use serde_json::Value;

use crate::feed::TransportError;
use crate::query::PageRequest;

/// Executes paged search requests
///
/// Implementations return the raw JSON body. Decoding into entities happens
/// in the controller, after the response has been checked for staleness.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Fetch one page
    ///
    /// # Errors
    /// Returns `TransportError` for connection, status or body failures.
    async fn search(&self, request: PageRequest) -> Result<Value, TransportError>;
}
