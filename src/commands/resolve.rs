//! Resolve command - map an entity name to its logo asset

use crate::config::FeedConfig;
use crate::output;
use crate::Result;

/// Execute the resolve command
///
/// # Errors
///
/// Returns an error if the configured dictionary cannot be loaded.
pub fn execute(config: &FeedConfig, name: &str, asset: Option<&str>, explain: bool) -> Result<()> {
    let resolver = config.resolver()?;

    if explain {
        let resolution = resolver.resolve_traced(name, asset);
        println!("{}", output::resolution_line(&resolution));
    } else {
        println!("{}", resolver.resolve(name, asset));
    }
    Ok(())
}
