//! Unit tests for transport error types

#[cfg(test)]
mod tests {
    use crate::feed::error::TransportError;

    #[test]
    fn test_status_error() {
        let error = TransportError::Status(503);
        assert_eq!(error.to_string(), "Server returned HTTP 503");
    }

    #[test]
    fn test_malformed_error() {
        let error = TransportError::Malformed("missing field `total`".to_string());
        assert_eq!(error.to_string(), "Malformed page: missing field `total`");
    }

    #[test]
    fn test_timeout_error() {
        assert_eq!(TransportError::Timeout.to_string(), "Request timed out");
    }

    #[test]
    fn test_errors_are_cloneable_and_comparable() {
        let error = TransportError::Request("connection refused".to_string());
        let copy = error.clone();
        assert_eq!(error, copy);
        assert_ne!(error, TransportError::Closed);
    }

    #[test]
    fn test_error_debug() {
        let debug = format!("{:?}", TransportError::Closed);
        assert!(debug.contains("Closed"));
    }
}
