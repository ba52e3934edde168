//! Entity name to visual asset resolution
//!
//! Maps a free-text organization name (plus an optional direct asset reference
//! supplied by the backend) to a canonical asset path by matching against an
//! ordered [`AliasDictionary`]. Tiers are tried in order and the first match
//! wins:
//!
//! 1. **Direct**: a non-empty direct reference is returned unchanged
//! 2. **Exact**: the normalized name equals a key
//! 3. **Containment**: first key (definition order) that contains or is
//!    contained in the name, directly or through a token longer than 3 chars
//! 4. **Keyword**: first key containing a significant keyword of the name
//! 5. **Fallback**: the dictionary placeholder
//!
//! # Examples
//!
//! ```
//! use entity_feed::resolver::{AliasDictionary, NameResolver};
//!
//! let resolver = NameResolver::new(AliasDictionary::builtin());
//! assert_eq!(resolver.resolve("GCB BANK PLC", None), "/banks/GCB_BANK_PLC.png");
//! assert_eq!(
//!     resolver.resolve("Unrelated Name", Some("/explicit/logo.png")),
//!     "/explicit/logo.png"
//! );
//! ```

pub mod dictionary;
pub mod error;

pub use dictionary::{AliasDictionary, AliasEntry, DEFAULT_PLACEHOLDER};
pub use error::{DictionaryError, Result};

use moka::sync::Cache;
use serde::Serialize;

/// Tokens ignored by the keyword tier
const STOP_WORDS: &[&str] = &[
    "LTD", "LIMITED", "PLC", "BANK", "GHANA", "GH", "THE", "OF", "AND", "FOR",
];

/// Tokens must be longer than this to take part in token matching
const MIN_TOKEN_LEN: usize = 3;

/// Which tier produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Direct,
    Exact,
    Containment,
    Keyword,
    Fallback,
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Direct => "direct",
            Self::Exact => "exact",
            Self::Containment => "containment",
            Self::Keyword => "keyword",
            Self::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// Outcome of a traced resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub asset: String,
    pub tier: MatchTier,
    /// Dictionary key that matched, for the exact/containment/keyword tiers
    pub key: Option<String>,
}

/// Trim and uppercase, the form every comparison operates on
pub(crate) fn normalize(text: &str) -> String {
    text.trim().to_uppercase()
}

fn long_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .filter(|token| token.chars().count() > MIN_TOKEN_LEN)
}

fn keywords(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .filter(|token| token.chars().count() > MIN_TOKEN_LEN)
        .filter(|token| !STOP_WORDS.contains(token))
}

fn contains_either_way(normalized: &str, key: &str) -> bool {
    normalized.contains(key)
        || key.contains(normalized)
        || long_tokens(normalized).any(|token| key.contains(token))
        || long_tokens(key).any(|token| normalized.contains(token))
}

/// Resolves entity names to asset references
///
/// Pure and total: every input yields an asset. Results for a given name are
/// stable for the lifetime of the resolver, so an optional bounded cache only
/// saves work and never changes an answer.
pub struct NameResolver {
    dictionary: AliasDictionary,
    cache: Option<Cache<String, Resolution>>,
}

impl NameResolver {
    /// Create a resolver without memoization
    #[must_use]
    pub fn new(dictionary: AliasDictionary) -> Self {
        Self {
            dictionary,
            cache: None,
        }
    }

    /// Create a resolver that memoizes up to `max_capacity` normalized names
    #[must_use]
    pub fn with_cache(dictionary: AliasDictionary, max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self {
            dictionary,
            cache: Some(cache),
        }
    }

    #[must_use]
    pub const fn dictionary(&self) -> &AliasDictionary {
        &self.dictionary
    }

    /// Resolve a name to an asset reference
    #[must_use]
    pub fn resolve(&self, free_text: &str, direct_asset: Option<&str>) -> String {
        self.resolve_traced(free_text, direct_asset).asset
    }

    /// Resolve a name and report which tier matched
    #[must_use]
    pub fn resolve_traced(&self, free_text: &str, direct_asset: Option<&str>) -> Resolution {
        if let Some(direct) = direct_asset.filter(|direct| !direct.is_empty()) {
            return Resolution {
                asset: direct.to_string(),
                tier: MatchTier::Direct,
                key: None,
            };
        }

        let normalized = normalize(free_text);

        let Some(cache) = &self.cache else {
            return self.match_normalized(&normalized);
        };

        if let Some(hit) = cache.get(&normalized) {
            return hit;
        }
        let resolution = self.match_normalized(&normalized);
        cache.insert(normalized, resolution.clone());
        resolution
    }

    fn match_normalized(&self, normalized: &str) -> Resolution {
        if normalized.is_empty() {
            return self.fallback();
        }

        if let Some(asset) = self.dictionary.get(normalized) {
            return Resolution {
                asset: asset.to_string(),
                tier: MatchTier::Exact,
                key: Some(normalized.to_string()),
            };
        }

        let entries = self.dictionary.entries();

        if let Some(entry) = entries
            .iter()
            .find(|entry| contains_either_way(normalized, &entry.key))
        {
            return Resolution {
                asset: entry.asset.clone(),
                tier: MatchTier::Containment,
                key: Some(entry.key.clone()),
            };
        }

        let significant: Vec<&str> = keywords(normalized).collect();
        if !significant.is_empty()
            && let Some(entry) = entries
                .iter()
                .find(|entry| significant.iter().any(|keyword| entry.key.contains(keyword)))
        {
            return Resolution {
                asset: entry.asset.clone(),
                tier: MatchTier::Keyword,
                key: Some(entry.key.clone()),
            };
        }

        self.fallback()
    }

    fn fallback(&self) -> Resolution {
        Resolution {
            asset: self.dictionary.placeholder().to_string(),
            tier: MatchTier::Fallback,
            key: None,
        }
    }
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new(AliasDictionary::builtin())
    }
}
