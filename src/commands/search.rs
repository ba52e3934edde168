//! Search command - load up to N pages of a listing and print them

use std::io::Write;
use tracing::debug;

use crate::cli::SearchArgs;
use crate::config::FeedConfig;
use crate::feed::{FeedController, FeedUpdate};
use crate::output::{self, OutputFormat};
use crate::query::SearchQuery;
use crate::trigger::ContinuationTrigger;
use crate::Result;

/// Execute the search command
///
/// # Errors
///
/// Returns an error if the feed cannot be built, a page request fails or
/// output cannot be written.
pub async fn execute(config: &FeedConfig, args: &SearchArgs, quiet: bool) -> Result<()> {
    let mut controller = super::controller(config, &args.feed)?;
    let query = args.feed.query(args.text.as_deref().unwrap_or_default());
    let trigger = ContinuationTrigger::new(config.visibility_threshold);

    load_pages(&mut controller, trigger, query, args.pages).await?;

    let mut stdout = std::io::stdout().lock();
    output::write_entities(&mut stdout, controller.items(), args.format, quiet)?;
    if !quiet && args.format == OutputFormat::Table {
        writeln!(stdout, "{}", output::status_line(controller.state()))?;
    }
    Ok(())
}

/// Load the first page of `query` and keep scrolling until `pages` pages
/// are loaded or the listing runs out
///
/// # Errors
///
/// Returns the transport error of the first failed page.
pub async fn load_pages(
    controller: &mut FeedController,
    mut trigger: ContinuationTrigger,
    query: SearchQuery,
    pages: u32,
) -> Result<()> {
    controller.reset_and_fetch(query);

    while let Some(update) = controller.next_update().await {
        match update {
            FeedUpdate::Failed { error, .. } => return Err(error.into()),
            FeedUpdate::Loaded { page, appended, .. } => {
                debug!(page, appended, "page loaded");
                // The sentinel shows up at the end of each page until enough are loaded
                if page < pages {
                    trigger.on_visibility(1.0, &mut *controller);
                }
            }
        }
    }
    Ok(())
}
