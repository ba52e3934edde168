//! Entity feed CLI application entry point
//!
//! # Usage
//!
//! ```bash
//! # First page of companies, then three pages of banks as CSV
//! entity-feed search
//! entity-feed search --kind bank --pages 3 --format csv
//!
//! # Filtered search
//! entity-feed search ecobank --kind bank -F bank_type=commercial
//!
//! # Live feed: type queries, `+` loads the next page
//! entity-feed watch --kind venue
//!
//! # Which logo would this name get, and why?
//! entity-feed resolve "Zenith Bank (Ghana) Ltd" --explain
//!
//! # Settings
//! entity-feed config set base_url=https://dd.example.com/api
//! entity-feed config get page_limit
//! ```
//!
//! # Configuration
//!
//! Read from `<config_dir>/entity-feed/config.toml` (or `--config PATH`), with
//! `ENTITY_FEED_*` environment overrides. Log filtering follows
//! `ENTITY_FEED_LOG`, then `RUST_LOG`, then `-q`/`-v`.

use clap::{CommandFactory, Parser};
use entity_feed::{
    Result,
    cli::{Cli, Commands},
    commands,
    config::FeedConfig,
    logging::{self, Verbosity},
};

/// Main entry point for the entity-feed application
///
/// # Errors
///
/// Returns `FeedError` if configuration loading fails or any command handler
/// returns an error.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet));

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    let (config, config_path) = match &cli.config {
        Some(path) => (FeedConfig::load_from(path)?, path.clone()),
        None => (FeedConfig::load()?, FeedConfig::config_path()?),
    };
    tracing::debug!(path = %config_path.display(), base_url = %config.base_url, "configuration loaded");

    match &cli.command {
        Commands::Search(args) => commands::search(&config, args, cli.quiet).await,
        Commands::Watch(args) => commands::watch(&config, args, cli.quiet).await,
        Commands::Resolve {
            name,
            asset,
            explain,
        } => commands::resolve(&config, name, asset.as_deref(), *explain),
        Commands::Aliases => commands::aliases(&config, cli.quiet),
        Commands::Config { command } => commands::config(config, &config_path, command, cli.quiet),
        Commands::Completions { .. } => Ok(()),
    }
}
