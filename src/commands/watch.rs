//! Watch command - a live feed driven by query edits on stdin

use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::cli::{FeedArgs, WatchArgs};
use crate::config::FeedConfig;
use crate::feed::FeedUpdate;
use crate::output;
use crate::session::{EntityFeed, FeedEvent};
use crate::trigger::ContinuationTrigger;
use crate::Result;

/// Input line that scrolls to the next page
pub const SCROLL_COMMAND: &str = "+";

/// What one line of input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Bring the sentinel into view once
    Scroll,
    /// Replace the free-text query
    Query(String),
}

impl Input {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        if line.trim() == SCROLL_COMMAND {
            Self::Scroll
        } else {
            Self::Query(line.trim().to_string())
        }
    }
}

/// Execute the watch command on stdin
///
/// # Errors
///
/// Returns an error if the feed cannot be built or stdin cannot be read.
pub async fn execute(config: &FeedConfig, args: &WatchArgs, quiet: bool) -> Result<()> {
    let controller = super::controller(config, &args.feed)?;
    let feed = EntityFeed::new(
        controller,
        config.debounce(),
        ContinuationTrigger::new(config.visibility_threshold),
    );
    let stdin = BufReader::new(tokio::io::stdin());

    run(feed, &args.feed, stdin, quiet).await
}

/// Drive `feed` from `input` until it closes and all work has settled
///
/// # Errors
///
/// Returns an error if `input` cannot be read.
pub async fn run<R>(mut feed: EntityFeed, args: &FeedArgs, input: R, quiet: bool) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut input_open = true;

    feed.start(args.query(""));

    while input_open {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => match Input::parse(&line) {
                    Input::Scroll => scroll_once(&mut feed),
                    Input::Query(text) => feed.edit_query(args.query(&text)),
                },
                None => input_open = false,
            },
            Some(event) = feed.next_event() => report(&feed, &event, quiet),
        }
    }

    while let Some(event) = feed.next_event().await {
        report(&feed, &event, quiet);
    }
    feed.teardown();
    Ok(())
}

/// The sentinel passes through the viewport: at most one page is requested
fn scroll_once(feed: &mut EntityFeed) {
    feed.on_visibility(1.0);
    feed.on_visibility(0.0);
}

fn report(feed: &EntityFeed, event: &FeedEvent, quiet: bool) {
    match event {
        FeedEvent::Reset { query, .. } => {
            if !quiet {
                let label = query.text().unwrap_or("(everything)");
                println!("{} {}", "Searching".bold(), label);
            }
        }
        FeedEvent::Page(FeedUpdate::Loaded { appended, .. }) => {
            let items = feed.items();
            for entity in &items[items.len() - appended..] {
                println!("{}", output::entity_line(entity, quiet));
            }
            if !quiet {
                println!("{}", output::status_line(feed.controller().state()));
            }
        }
        FeedEvent::Page(FeedUpdate::Failed { error, .. }) => {
            eprintln!("{} {error}", "Error:".red());
        }
    }
}
