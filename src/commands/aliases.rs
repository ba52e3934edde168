//! Aliases command - list the active dictionary in match order

use colored::Colorize;

use crate::config::FeedConfig;
use crate::output;
use crate::Result;

/// Execute the aliases command
///
/// # Errors
///
/// Returns an error if the configured dictionary cannot be loaded.
pub fn execute(config: &FeedConfig, quiet: bool) -> Result<()> {
    let dictionary = config.load_dictionary()?;

    if quiet {
        for entry in dictionary.entries() {
            println!("{}\t{}", entry.key, entry.asset);
        }
        return Ok(());
    }

    for (position, entry) in dictionary.entries().iter().enumerate() {
        println!("{}", output::alias_line(position, entry));
    }
    println!(
        "{} aliases, fallback {}",
        dictionary.len(),
        dictionary.placeholder().dimmed()
    );
    Ok(())
}
