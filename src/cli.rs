//! Command-line interface definitions and parsing
//!
//! # Commands
//!
//! - **search**: one-shot search that scrolls through a number of pages
//! - **watch**: interactive feed driven by query edits on stdin
//! - **resolve**: map an entity name to its logo asset
//! - **aliases**: list the active alias dictionary
//! - **config**: read and change settings
//! - **completions**: print a shell completion script
//!
//! # Examples
//!
//! ```
//! use clap::Parser;
//! use entity_feed::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_from(["entity-feed", "search", "gcb", "--kind", "bank"]);
//! assert!(matches!(cli.command, Commands::Search(_)));
//! ```

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::output::OutputFormat;
use crate::query::{EntityKind, SearchQuery, SortOrder};

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "entity-feed")]
#[command(about = "Search companies, banks and venues page by page", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Only print results
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Use this config file instead of the default location
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Search a listing and print the results
    #[command(visible_alias = "s")]
    Search(SearchArgs),

    /// Follow a listing while the query is edited on stdin
    ///
    /// Each line replaces the query text; edits take effect once typing pauses.
    /// A line containing only `+` scrolls to the next page.
    Watch(WatchArgs),

    /// Resolve an entity name to its logo asset
    Resolve {
        /// Entity name as displayed
        #[arg(value_name = "NAME")]
        name: String,

        /// Asset reference supplied by the backend, used as-is when present
        #[arg(long = "asset", value_name = "REF")]
        asset: Option<String>,

        /// Show which matching tier produced the result
        #[arg(long = "explain")]
        explain: bool,
    },

    /// List the alias dictionary in match order
    Aliases,

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Query, paging and listing options shared by `search` and `watch`
#[derive(Args, Debug, Clone, Default)]
pub struct FeedArgs {
    /// Listing to search (defaults to `default_kind` from config)
    #[arg(short = 'k', long = "kind", value_enum)]
    pub kind: Option<EntityKind>,

    /// Field filter, repeatable (e.g. -F region=Ashanti)
    #[arg(short = 'F', long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Entities per page (overrides config)
    #[arg(short = 'l', long = "limit", value_name = "N")]
    pub limit: Option<u32>,

    /// Sort field (overrides config)
    #[arg(long = "sort-by", value_name = "FIELD")]
    pub sort_by: Option<String>,

    /// Sort descending
    #[arg(long = "desc")]
    pub desc: bool,
}

impl FeedArgs {
    /// Query built from `text` and the `--filter` flags
    #[must_use]
    pub fn query(&self, text: &str) -> SearchQuery {
        self.filters
            .iter()
            .fold(SearchQuery::new(text), |query, (key, value)| {
                query.with_filter(key.clone(), value.clone())
            })
    }

    /// Sort order requested on the command line, if any
    #[must_use]
    pub const fn sort_order(&self) -> Option<SortOrder> {
        if self.desc { Some(SortOrder::Desc) } else { None }
    }
}

/// Arguments for the search subcommand
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Free-text query; omit to list everything
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    #[command(flatten)]
    pub feed: FeedArgs,

    /// Maximum number of pages to load
    #[arg(short = 'p', long = "pages", value_name = "N", default_value_t = 1)]
    pub pages: u32,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Arguments for the watch subcommand
#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub feed: FeedArgs,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., page_limit=25)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., base_url)
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Print the config file location
    Path,
}

/// Split a `KEY=VALUE` argument
///
/// # Errors
///
/// Returns a message if there is no `=` or the key is empty.
pub fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
