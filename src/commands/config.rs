//! Config command - read and change settings

use std::path::Path;

use crate::cli::ConfigCommands;
use crate::config::FeedConfig;
use crate::{FeedError, Result};

/// Execute a config subcommand against the file at `path`
///
/// # Errors
///
/// Returns `FeedError` for malformed `KEY=VALUE` input, unknown keys, invalid
/// values, or if the file cannot be written.
pub fn execute(mut config: FeedConfig, path: &Path, command: &ConfigCommands, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Set { setting } => {
            let (key, value) = split_setting(setting)?;
            config.set(key, value)?;
            config.save_to(path)?;
            if !quiet {
                println!("Set {key} = {}", config.get(key)?);
            }
        }
        ConfigCommands::Get { key } => {
            println!("{}", config.get(key)?);
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn split_setting(setting: &str) -> Result<(&str, &str)> {
    let (key, value) = setting.split_once('=').ok_or_else(|| {
        FeedError::InvalidInput("Invalid format. Use: entity-feed config set key=value".into())
    })?;
    Ok((key.trim(), value.trim()))
}
