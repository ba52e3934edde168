//! Feed state: generation stamps, page cursor and the phase machine
//!
//! ```text
//! Idle ─reset→ Loading ─ok→ Ready ⇄ LoadingMore ─ok, no next→ Exhausted
//!                 │                      │
//!                 └──────fail──→ Error ←─┘     (left only by another reset)
//! ```
//!
//! One enumerated phase replaces separate loading / loading-more / has-more
//! flags, so states such as "loading and loading more" cannot be expressed.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use super::entity::{Entity, EntityId, ParsedPage};

/// Query epoch, bumped by every reset
///
/// Wraps at `u64::MAX` so a reset always changes it. Acceptance also requires
/// the response to answer the outstanding page, so a wrapped value cannot
/// revive a response from the first epochs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Last successfully loaded page number (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PageCursor(u32);

impl PageCursor {
    #[must_use]
    pub const fn first() -> Self {
        Self(1)
    }

    #[must_use]
    pub const fn new(page: u32) -> Self {
        if page == 0 { Self(1) } else { Self(page) }
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::first()
    }
}

/// Lifecycle phase of a feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedPhase {
    /// Constructed, nothing requested yet
    #[default]
    Idle,
    /// First page of a generation in flight
    Loading,
    /// Pages loaded, more available
    Ready,
    /// A follow-up page in flight
    LoadingMore,
    /// Every page loaded (also the state for an empty result)
    Exhausted,
    /// The last request failed
    Error,
}

impl FeedPhase {
    /// A request is outstanding
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading | Self::LoadingMore)
    }
}

impl fmt::Display for FeedPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::LoadingMore => "loading more",
            Self::Exhausted => "exhausted",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Everything a screen renders from
///
/// Items keep arrival order and are unique by id across pages. The state is
/// replaced wholesale on reset; entities are never evicted individually.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    items: Vec<Entity>,
    seen: HashSet<EntityId>,
    total_count: u64,
    has_next: bool,
    generation: Generation,
    phase: FeedPhase,
}

impl FeedState {
    /// Fresh state for a new generation with its first page in flight
    pub(crate) fn loading(generation: Generation) -> Self {
        Self {
            generation,
            phase: FeedPhase::Loading,
            ..Self::default()
        }
    }

    pub(crate) const fn set_phase(&mut self, phase: FeedPhase) {
        self.phase = phase;
    }

    /// Append a page, skipping ids already present, and settle the phase
    ///
    /// Returns the number of entities actually added.
    pub(crate) fn accept_page(&mut self, page: ParsedPage) -> usize {
        let before = self.items.len();
        for entity in page.entities {
            if self.seen.insert(entity.id().clone()) {
                self.items.push(entity);
            }
        }

        self.total_count = page.total;
        self.has_next = page.has_next;
        self.phase = if page.has_next {
            FeedPhase::Ready
        } else {
            FeedPhase::Exhausted
        };

        self.items.len() - before
    }

    /// Mark the last request failed, keeping everything already loaded
    pub(crate) const fn fail(&mut self) {
        self.phase = FeedPhase::Error;
    }

    #[must_use]
    pub fn items(&self) -> &[Entity] {
        &self.items
    }

    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.has_next
    }

    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    #[must_use]
    pub const fn phase(&self) -> FeedPhase {
        self.phase
    }

    /// Nothing loaded and nothing more to load
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        self.phase == FeedPhase::Exhausted && self.items.is_empty()
    }
}
