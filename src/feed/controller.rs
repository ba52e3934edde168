//! Paginated feed controller
//!
//! Owns one [`FeedState`] and drives it with two entry points:
//!
//! - [`FeedController::reset_and_fetch`] starts a new generation and requests
//!   page 1
//! - [`FeedController::fetch_next_page`] requests the page after the cursor,
//!   only while the feed is `Ready` with more to load
//!
//! Requests run as tokio tasks and report back over a channel, tagged with the
//! generation and page they were issued for. A response is applied only when
//! it matches the one outstanding request of the current generation; anything
//! else is stale or a duplicate and is dropped silently. Because
//! `fetch_next_page` refuses to run until the previous page has landed, pages
//! of a generation are applied in the order they were issued.
//!
//! Superseded requests may additionally be aborted (see
//! [`FeedOptions::abort_superseded`]), but that only frees resources early;
//! the generation check is what keeps the state correct.

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::entity::{Entity, PageExtractor};
use super::error::TransportError;
use super::state::{FeedPhase, FeedState, Generation, PageCursor};
use crate::backend::SearchBackend;
use crate::query::{EntityKind, PageRequest, PageSettings, SearchQuery};
use crate::resolver::NameResolver;

/// Fixed request settings of a feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedOptions {
    pub kind: EntityKind,
    pub page: PageSettings,
    /// Abort in-flight requests of a superseded generation
    pub abort_superseded: bool,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            kind: EntityKind::default(),
            page: PageSettings::default(),
            abort_superseded: true,
        }
    }
}

/// A page response tagged with the request it answers
#[derive(Debug, Clone)]
pub struct PageEvent {
    pub generation: Generation,
    pub page: u32,
    pub outcome: Result<Value, TransportError>,
}

/// What an accepted response did to the feed
#[derive(Debug, Clone, PartialEq)]
pub enum FeedUpdate {
    Loaded {
        generation: Generation,
        page: u32,
        /// Entities added after de-duplication
        appended: usize,
        phase: FeedPhase,
    },
    Failed {
        generation: Generation,
        page: u32,
        error: TransportError,
    },
}

impl FeedUpdate {
    #[must_use]
    pub const fn generation(&self) -> Generation {
        match self {
            Self::Loaded { generation, .. } | Self::Failed { generation, .. } => *generation,
        }
    }
}

/// Result of offering a response to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Accepted(FeedUpdate),
    /// Superseded generation or duplicate; state untouched
    Stale,
}

struct InFlight {
    generation: Generation,
    page: u32,
    cancel: CancellationToken,
}

/// Sends the outcome of a request task, or `Closed` if the task ends first
struct Reply {
    tx: mpsc::UnboundedSender<PageEvent>,
    generation: Generation,
    page: u32,
    sent: bool,
}

impl Reply {
    fn send(mut self, outcome: Result<Value, TransportError>) {
        self.sent = true;
        let _ = self.tx.send(PageEvent {
            generation: self.generation,
            page: self.page,
            outcome,
        });
    }
}

impl Drop for Reply {
    fn drop(&mut self) {
        if !self.sent {
            let _ = self.tx.send(PageEvent {
                generation: self.generation,
                page: self.page,
                outcome: Err(TransportError::Closed),
            });
        }
    }
}

/// State machine behind an infinitely scrolling entity list
pub struct FeedController {
    backend: Arc<dyn SearchBackend>,
    resolver: Arc<NameResolver>,
    extractor: PageExtractor,
    options: FeedOptions,
    state: FeedState,
    query: SearchQuery,
    cursor: PageCursor,
    in_flight: Option<InFlight>,
    last_error: Option<TransportError>,
    torn_down: bool,
    events_tx: mpsc::UnboundedSender<PageEvent>,
    events_rx: mpsc::UnboundedReceiver<PageEvent>,
}

impl FeedController {
    #[must_use]
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        resolver: Arc<NameResolver>,
        extractor: PageExtractor,
        options: FeedOptions,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            resolver,
            extractor,
            options,
            state: FeedState::default(),
            query: SearchQuery::default(),
            cursor: PageCursor::first(),
            in_flight: None,
            last_error: None,
            torn_down: false,
            events_tx,
            events_rx,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &FeedState {
        &self.state
    }

    #[must_use]
    pub fn items(&self) -> &[Entity] {
        self.state.items()
    }

    #[must_use]
    pub const fn phase(&self) -> FeedPhase {
        self.state.phase()
    }

    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.state.generation()
    }

    #[must_use]
    pub const fn cursor(&self) -> PageCursor {
        self.cursor
    }

    /// Query of the current generation
    #[must_use]
    pub const fn query(&self) -> &SearchQuery {
        &self.query
    }

    #[must_use]
    pub const fn options(&self) -> &FeedOptions {
        &self.options
    }

    /// Error behind `FeedPhase::Error`, cleared by the next reset
    #[must_use]
    pub const fn last_error(&self) -> Option<&TransportError> {
        self.last_error.as_ref()
    }

    /// Whether a request of the current generation is awaiting its response
    #[must_use]
    pub const fn has_outstanding_request(&self) -> bool {
        self.in_flight.is_some()
    }

    /// `fetch_next_page` would issue a request
    #[must_use]
    pub fn can_fetch_more(&self) -> bool {
        !self.torn_down && self.state.phase() == FeedPhase::Ready && self.state.has_next()
    }

    /// Start a new generation for `query` and request its first page
    ///
    /// Discards all items. Responses to earlier requests become stale. Must be
    /// called from within a tokio runtime. Returns the new generation, or the
    /// current one unchanged after [`teardown`](Self::teardown).
    pub fn reset_and_fetch(&mut self, query: SearchQuery) -> Generation {
        if self.torn_down {
            warn!("reset requested on a torn down feed");
            return self.state.generation();
        }

        if let Some(previous) = self.in_flight.take()
            && self.options.abort_superseded
        {
            previous.cancel.cancel();
        }

        let generation = self.state.generation().next();
        self.state = FeedState::loading(generation);
        self.query = query;
        self.cursor = PageCursor::first();
        self.last_error = None;

        self.issue(PageCursor::first().value());
        generation
    }

    /// Request the page after the cursor
    ///
    /// No-op (returns `false`) unless the feed is `Ready` and has more pages,
    /// which also means no request is outstanding.
    pub fn fetch_next_page(&mut self) -> bool {
        if !self.can_fetch_more() {
            return false;
        }

        self.state.set_phase(FeedPhase::LoadingMore);
        self.issue(self.cursor.next().value());
        true
    }

    /// Offer a response to the controller
    ///
    /// Applied only if it answers the outstanding request of the current
    /// generation. Anything else is dropped and reported as [`Applied::Stale`].
    pub fn apply(&mut self, event: PageEvent) -> Applied {
        let expected = self.in_flight.as_ref().is_some_and(|in_flight| {
            in_flight.generation == event.generation && in_flight.page == event.page
        });
        if event.generation != self.state.generation() || !expected {
            trace!(
                generation = event.generation.value(),
                current = self.state.generation().value(),
                page = event.page,
                "dropping stale page response"
            );
            return Applied::Stale;
        }
        self.in_flight = None;

        let parsed = event
            .outcome
            .and_then(|body| self.extractor.extract(&body, &self.resolver));

        match parsed {
            Ok(page) => {
                let appended = self.state.accept_page(page);
                self.cursor = PageCursor::new(event.page);
                debug!(
                    generation = event.generation.value(),
                    page = event.page,
                    appended,
                    total = self.state.total_count(),
                    has_next = self.state.has_next(),
                    "page accepted"
                );
                Applied::Accepted(FeedUpdate::Loaded {
                    generation: event.generation,
                    page: event.page,
                    appended,
                    phase: self.state.phase(),
                })
            }
            Err(error) => {
                warn!(
                    generation = event.generation.value(),
                    page = event.page,
                    %error,
                    "page request failed"
                );
                self.state.fail();
                self.last_error = Some(error.clone());
                Applied::Accepted(FeedUpdate::Failed {
                    generation: event.generation,
                    page: event.page,
                    error,
                })
            }
        }
    }

    /// Wait for the outstanding request to be answered and apply it
    ///
    /// Stale responses that arrive first are dropped along the way. Returns
    /// `None` when nothing is outstanding. Cancel-safe.
    pub async fn next_update(&mut self) -> Option<FeedUpdate> {
        while self.in_flight.is_some() {
            let event = self.events_rx.recv().await?;
            if let Applied::Accepted(update) = self.apply(event) {
                return Some(update);
            }
        }
        None
    }

    /// Abort the outstanding request and stop accepting work
    pub fn teardown(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel.cancel();
        }
        self.torn_down = true;
    }

    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn issue(&mut self, page: u32) {
        let generation = self.state.generation();
        let cancel = CancellationToken::new();
        self.in_flight = Some(InFlight {
            generation,
            page,
            cancel: cancel.clone(),
        });

        let request = PageRequest {
            kind: self.options.kind,
            page,
            settings: self.options.page.clone(),
            query: self.query.clone(),
        };
        debug!(
            generation = generation.value(),
            page,
            kind = self.options.kind.as_str(),
            "issuing page request"
        );

        let backend = Arc::clone(&self.backend);
        let reply = Reply {
            tx: self.events_tx.clone(),
            generation,
            page,
            sent: false,
        };
        tokio::spawn(async move {
            let outcome = tokio::select! {
                () = cancel.cancelled() => return,
                outcome = backend.search(request) => outcome,
            };
            reply.send(outcome);
        });
    }
}

impl Drop for FeedController {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel.cancel();
        }
    }
}
