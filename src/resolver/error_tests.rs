//! Unit tests for dictionary error types

#[cfg(test)]
mod tests {
    use crate::resolver::error::DictionaryError;
    use std::error::Error;

    #[test]
    fn test_empty_key_error() {
        let error = DictionaryError::EmptyKey(3);
        assert_eq!(error.to_string(), "Alias key at position 3 is empty");
    }

    #[test]
    fn test_duplicate_key_error() {
        let error = DictionaryError::DuplicateKey("GCB BANK PLC".to_string());
        assert_eq!(
            error.to_string(),
            "Alias 'GCB BANK PLC' is defined more than once"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: DictionaryError = io_error.into();

        assert!(error.to_string().contains("I/O error"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("alias = [").unwrap_err();
        let error: DictionaryError = toml_error.into();

        assert!(error.to_string().starts_with("TOML error"));
    }

    #[test]
    fn test_error_debug() {
        let error = DictionaryError::EmptyPlaceholder;
        let debug = format!("{error:?}");
        assert!(debug.contains("EmptyPlaceholder"));
    }
}
