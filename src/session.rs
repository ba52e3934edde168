//! A listing screen's feed session
//!
//! [`EntityFeed`] wires the three moving parts together: query edits go
//! through the debouncer, each settled query resets the controller, and
//! visibility reports go through the continuation trigger. The owner drives
//! everything by awaiting [`EntityFeed::next_event`] in its event loop.

use std::time::Duration;
use tracing::debug;

use crate::debounce::Debouncer;
use crate::feed::{Entity, FeedController, FeedPhase, FeedUpdate, Generation};
use crate::query::SearchQuery;
use crate::trigger::ContinuationTrigger;

/// Something that changed in the session
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A settled query started a new generation
    Reset {
        generation: Generation,
        query: SearchQuery,
    },
    /// A response was applied to the current generation
    Page(FeedUpdate),
}

/// Debounced, infinitely scrolling feed for one listing
pub struct EntityFeed {
    controller: FeedController,
    debouncer: Debouncer<SearchQuery>,
    trigger: ContinuationTrigger,
}

impl EntityFeed {
    #[must_use]
    pub fn new(controller: FeedController, quiet: Duration, trigger: ContinuationTrigger) -> Self {
        Self {
            controller,
            debouncer: Debouncer::new(quiet),
            trigger,
        }
    }

    /// Load `query` immediately, bypassing the debounce
    ///
    /// Used for the initial load of a screen. Any pending edit is dropped.
    pub fn start(&mut self, query: SearchQuery) -> Generation {
        self.debouncer.cancel();
        self.controller.reset_and_fetch(query)
    }

    /// Record a query edit; it takes effect once edits pause
    pub fn edit_query(&mut self, query: SearchQuery) {
        self.debouncer.schedule(query);
    }

    /// Report how much of the end-of-list sentinel is visible
    ///
    /// Returns `true` if this requested the next page.
    pub fn on_visibility(&mut self, fraction: f32) -> bool {
        self.trigger.on_visibility(fraction, &mut self.controller)
    }

    /// Wait for the next settled query or page response
    ///
    /// Returns `None` once nothing is pending: no edit waiting to settle and
    /// no request in flight.
    pub async fn next_event(&mut self) -> Option<FeedEvent> {
        loop {
            tokio::select! {
                Some(query) = self.debouncer.settled() => {
                    if let Some(event) = self.apply_settled(query) {
                        return Some(event);
                    }
                }
                Some(update) = self.controller.next_update() => {
                    self.trigger.recheck(&mut self.controller);
                    return Some(FeedEvent::Page(update));
                }
                else => return None,
            }
        }
    }

    /// Stop the session: no more timers, requests or continuation
    pub fn teardown(&mut self) {
        self.trigger.detach();
        self.debouncer.shutdown();
        self.controller.teardown();
    }

    #[must_use]
    pub const fn controller(&self) -> &FeedController {
        &self.controller
    }

    #[must_use]
    pub fn items(&self) -> &[Entity] {
        self.controller.items()
    }

    #[must_use]
    pub const fn phase(&self) -> FeedPhase {
        self.controller.phase()
    }

    /// An edit is waiting for its quiet period to end
    #[must_use]
    pub const fn has_pending_edit(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn apply_settled(&mut self, query: SearchQuery) -> Option<FeedEvent> {
        let phase = self.controller.phase();
        let reloadable = matches!(phase, FeedPhase::Idle | FeedPhase::Error);
        if !reloadable && query == *self.controller.query() {
            debug!(%phase, "settled query unchanged, keeping current results");
            return None;
        }

        let generation = self.controller.reset_and_fetch(query.clone());
        Some(FeedEvent::Reset { generation, query })
    }
}
