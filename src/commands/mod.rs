//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI args
//! and the loaded configuration.

pub mod aliases;
pub mod config;
pub mod resolve;
pub mod search;
pub mod watch;

pub use aliases::execute as aliases;
pub use self::config::execute as config;
pub use resolve::execute as resolve;
pub use search::execute as search;
pub use watch::execute as watch;

use std::sync::Arc;

use crate::backend::HttpBackend;
use crate::cli::FeedArgs;
use crate::config::FeedConfig;
use crate::feed::{FeedController, FeedOptions, PageExtractor};
use crate::{FeedError, Result};

/// Controller options after applying command-line overrides to the config
///
/// # Errors
///
/// Returns `FeedError::InvalidInput` for a zero `--limit`.
pub fn feed_options(config: &FeedConfig, args: &FeedArgs) -> Result<FeedOptions> {
    let kind = args.kind.unwrap_or(config.default_kind);
    let mut options = config.feed_options(kind);

    if let Some(limit) = args.limit {
        if limit == 0 {
            return Err(FeedError::InvalidInput("--limit must be at least 1".to_string()));
        }
        options.page.limit = limit;
    }
    if let Some(sort_by) = &args.sort_by {
        options.page.sort_by.clone_from(sort_by);
    }
    if let Some(order) = args.sort_order() {
        options.page.sort_order = order;
    }

    Ok(options)
}

/// Controller talking to the configured service
///
/// # Errors
///
/// Returns `FeedError` if the options are invalid, the dictionary cannot be
/// loaded or the HTTP client cannot be built.
pub fn controller(config: &FeedConfig, args: &FeedArgs) -> Result<FeedController> {
    let options = feed_options(config, args)?;
    let backend = HttpBackend::new(config.base_url.clone(), config.timeout())?;
    let resolver = config.resolver()?;

    Ok(FeedController::new(
        Arc::new(backend),
        Arc::new(resolver),
        PageExtractor::for_kind(options.kind),
        options,
    ))
}
