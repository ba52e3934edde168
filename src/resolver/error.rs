//! Alias dictionary error types
//!
//! Resolution itself is total and never fails; these errors only arise while
//! building or loading an [`AliasDictionary`](super::AliasDictionary).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DictionaryError {
    /// I/O error when reading a dictionary file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// An alias key was empty after normalization (index in definition order)
    #[error("Alias key at position {0} is empty")]
    EmptyKey(usize),

    /// An alias key maps to an empty asset reference
    #[error("Alias '{0}' has no asset reference")]
    EmptyAsset(String),

    /// Two entries normalize to the same key
    #[error("Alias '{0}' is defined more than once")]
    DuplicateKey(String),

    /// The placeholder asset reference is empty
    #[error("Placeholder asset reference is empty")]
    EmptyPlaceholder,
}

/// Type alias for cleaner function signatures
pub type Result<T> = std::result::Result<T, DictionaryError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
