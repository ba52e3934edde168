//! HTTP implementation of [`SearchBackend`]

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::SearchBackend;
use crate::feed::TransportError;
use crate::query::{EntityKind, PageRequest};

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if let Some(status) = error.status() {
            Self::Status(status.as_u16())
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

/// Issues `GET {base_url}{kind path}?page=..&limit=..` requests
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend for the service rooted at `base_url`
    ///
    /// `timeout` bounds each request; `None` lets requests wait indefinitely.
    ///
    /// # Errors
    /// Returns `TransportError::Request` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of a listing
    #[must_use]
    pub fn endpoint(&self, kind: EntityKind) -> String {
        format!("{}{}", self.base_url, kind.path())
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    async fn search(&self, request: PageRequest) -> Result<Value, TransportError> {
        let url = self.endpoint(request.kind);
        debug!(%url, page = request.page, "sending search request");

        let response = self.http.get(&url).query(&request.params()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        Ok(response.json::<Value>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let backend = HttpBackend::new("http://localhost:8000/api/", None).unwrap();
        assert_eq!(
            backend.endpoint(EntityKind::Bank),
            "http://localhost:8000/api/banks"
        );
    }

    #[test]
    fn test_endpoint_per_kind() {
        let backend = HttpBackend::new("https://dd.example.com", Some(Duration::from_secs(5))).unwrap();
        assert_eq!(
            backend.endpoint(EntityKind::Company),
            "https://dd.example.com/companies"
        );
        assert_eq!(
            backend.endpoint(EntityKind::Venue),
            "https://dd.example.com/venues"
        );
    }
}
