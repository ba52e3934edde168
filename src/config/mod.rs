//! Configuration module for entity-feed
//!
//! Settings live in `<config_dir>/entity-feed/config.toml`. Any key can be
//! overridden by an `ENTITY_FEED_<KEY>` environment variable, e.g.
//! `ENTITY_FEED_BASE_URL` or `ENTITY_FEED_PAGE_LIMIT`.

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::feed::FeedOptions;
use crate::query::{EntityKind, PageSettings, SortOrder};
use crate::resolver::{AliasDictionary, DictionaryError, NameResolver};

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "ENTITY_FEED";

/// Keys accepted by `config get` and `config set`
pub const KEYS: &[&str] = &[
    "base_url",
    "page_limit",
    "sort_by",
    "sort_order",
    "debounce_ms",
    "visibility_threshold",
    "request_timeout_secs",
    "abort_superseded",
    "dictionary",
    "resolver_cache_capacity",
    "default_kind",
];

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    /// Root URL of the search service
    pub base_url: String,

    /// Entities per page
    pub page_limit: u32,

    pub sort_by: String,

    pub sort_order: SortOrder,

    /// Quiet period before a query edit takes effect
    pub debounce_ms: u64,

    /// Visible fraction of the sentinel that requests the next page
    pub visibility_threshold: f32,

    /// Per-request timeout in seconds; 0 disables it
    pub request_timeout_secs: u64,

    /// Abort requests of superseded generations instead of letting them finish
    pub abort_superseded: bool,

    /// Alias dictionary replacing the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary: Option<PathBuf>,

    /// Memoized name resolutions; 0 disables the cache
    pub resolver_cache_capacity: u64,

    /// Listing used when a command names none
    pub default_kind: EntityKind,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            page_limit: 50,
            sort_by: "name".to_string(),
            sort_order: SortOrder::Asc,
            debounce_ms: 500,
            visibility_threshold: 0.1,
            request_timeout_secs: 30,
            abort_superseded: true,
            dictionary: None,
            resolver_cache_capacity: 1024,
            default_kind: EntityKind::Company,
        }
    }
}

impl FeedConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("entity-feed").join("config.toml"))
    }

    /// Load configuration from the default location, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, created
    /// or fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::default().save_to(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from `path` plus environment overrides
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be parsed or the result fails
    /// validation.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(env.try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the parent directory cannot be created, the
    /// configuration cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a zero page limit, a threshold outside
    /// `(0, 1]` or a blank base URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_limit == 0 {
            return Err(ConfigError::Message("page_limit must be at least 1".to_string()));
        }
        if !(self.visibility_threshold > 0.0 && self.visibility_threshold <= 1.0) {
            return Err(ConfigError::Message(format!(
                "visibility_threshold must be in (0, 1], got {}",
                self.visibility_threshold
            )));
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Message("base_url must not be empty".to_string()));
        }
        Ok(())
    }

    /// Current value of `key` as text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `key` is not a known setting.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "base_url" => self.base_url.clone(),
            "page_limit" => self.page_limit.to_string(),
            "sort_by" => self.sort_by.clone(),
            "sort_order" => self.sort_order.as_str().to_string(),
            "debounce_ms" => self.debounce_ms.to_string(),
            "visibility_threshold" => self.visibility_threshold.to_string(),
            "request_timeout_secs" => self.request_timeout_secs.to_string(),
            "abort_superseded" => self.abort_superseded.to_string(),
            "dictionary" => self
                .dictionary
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            "resolver_cache_capacity" => self.resolver_cache_capacity.to_string(),
            "default_kind" => self.default_kind.as_str().to_string(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Parse `value` into `key`
    ///
    /// An empty value unsets `dictionary`. The result is validated but not
    /// saved.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `key` is unknown, `value` does not parse, or the
    /// new configuration fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut updated = self.clone();
        match key {
            "base_url" => updated.base_url = value.to_string(),
            "page_limit" => updated.page_limit = parse_value(key, value)?,
            "sort_by" => updated.sort_by = value.to_string(),
            "sort_order" => updated.sort_order = parse_enum(key, value)?,
            "debounce_ms" => updated.debounce_ms = parse_value(key, value)?,
            "visibility_threshold" => updated.visibility_threshold = parse_value(key, value)?,
            "request_timeout_secs" => updated.request_timeout_secs = parse_value(key, value)?,
            "abort_superseded" => updated.abort_superseded = parse_value(key, value)?,
            "dictionary" => {
                updated.dictionary = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "resolver_cache_capacity" => updated.resolver_cache_capacity = parse_value(key, value)?,
            "default_kind" => updated.default_kind = parse_enum(key, value)?,
            _ => return Err(unknown_key(key)),
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Paging and sort settings for requests
    #[must_use]
    pub fn page_settings(&self) -> PageSettings {
        PageSettings {
            limit: self.page_limit,
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order,
        }
    }

    /// Controller options for a listing
    #[must_use]
    pub fn feed_options(&self, kind: EntityKind) -> FeedOptions {
        FeedOptions {
            kind,
            page: self.page_settings(),
            abort_superseded: self.abort_superseded,
        }
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Request timeout, `None` when disabled
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.request_timeout_secs))
        }
    }

    /// The configured alias dictionary, or the built-in one
    ///
    /// # Errors
    ///
    /// Returns `DictionaryError` if the configured file cannot be loaded.
    pub fn load_dictionary(&self) -> Result<AliasDictionary, DictionaryError> {
        match &self.dictionary {
            Some(path) => AliasDictionary::load(path),
            None => Ok(AliasDictionary::builtin()),
        }
    }

    /// Name resolver over the configured dictionary
    ///
    /// # Errors
    ///
    /// Returns `DictionaryError` if the configured dictionary cannot be loaded.
    pub fn resolver(&self) -> Result<NameResolver, DictionaryError> {
        let dictionary = self.load_dictionary()?;
        Ok(if self.resolver_cache_capacity == 0 {
            NameResolver::new(dictionary)
        } else {
            NameResolver::with_cache(dictionary, self.resolver_cache_capacity)
        })
    }
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::Message(format!(
        "Unknown configuration key: '{key}'. Available keys: {}",
        KEYS.join(", ")
    ))
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Message(format!("Invalid value for {key}: '{value}'")))
}

fn parse_enum<T: clap::ValueEnum>(key: &str, value: &str) -> Result<T, ConfigError> {
    T::from_str(value.trim(), true)
        .map_err(|_| ConfigError::Message(format!("Invalid value for {key}: '{value}'")))
}
