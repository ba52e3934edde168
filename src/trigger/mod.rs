//! Infinite-scroll continuation
//!
//! A sentinel sits after the last loaded item. Whenever enough of it is
//! visible and the feed can grow, the [`ContinuationTrigger`] asks for the next
//! page. How visibility is measured is up to the platform: anything that can
//! report "fraction of the sentinel inside the viewport" works, whether a
//! native intersection callback, a layout pass, or polling a scroll offset
//! through [`SentinelGeometry`].
//!
//! The trigger is level-sensitive. It fires on every report at or above the
//! threshold, and relies on `fetch_next_page` being a no-op outside `Ready` to
//! stay idempotent while a page is loading. After each accepted page the owner
//! calls [`ContinuationTrigger::recheck`] so a sentinel that never left the
//! screen keeps pulling pages.

use crate::feed::FeedController;

/// Fraction of the sentinel that must be visible
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.1;

/// Something that can grow by one page
pub trait NextPage {
    /// A request would be issued right now
    fn can_fetch_more(&self) -> bool;

    /// Issue the request; `false` if it was a no-op
    fn fetch_next_page(&mut self) -> bool;
}

impl NextPage for FeedController {
    fn can_fetch_more(&self) -> bool {
        Self::can_fetch_more(self)
    }

    fn fetch_next_page(&mut self) -> bool {
        Self::fetch_next_page(self)
    }
}

/// Reports how much of the sentinel is on screen
pub trait VisibilitySource {
    /// Visible fraction in `0.0..=1.0`
    fn visible_fraction(&self) -> f32;
}

/// Sentinel and viewport positions along the scroll axis
///
/// Lets a platform without an intersection API satisfy the trigger by polling
/// its scroll offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentinelGeometry {
    /// Scroll offset of the viewport's top edge
    pub viewport_top: f32,
    pub viewport_height: f32,
    /// Offset of the sentinel's top edge in content coordinates
    pub sentinel_top: f32,
    pub sentinel_height: f32,
}

impl VisibilitySource for SentinelGeometry {
    fn visible_fraction(&self) -> f32 {
        let viewport_bottom = self.viewport_top + self.viewport_height.max(0.0);

        if self.sentinel_height <= 0.0 {
            let inside = self.sentinel_top >= self.viewport_top && self.sentinel_top <= viewport_bottom;
            return if inside { 1.0 } else { 0.0 };
        }

        let sentinel_bottom = self.sentinel_top + self.sentinel_height;
        let overlap = sentinel_bottom.min(viewport_bottom) - self.sentinel_top.max(self.viewport_top);
        (overlap / self.sentinel_height).clamp(0.0, 1.0)
    }
}

/// Requests the next page when the sentinel becomes visible
#[derive(Debug, Clone)]
pub struct ContinuationTrigger {
    threshold: f32,
    last_visibility: f32,
    attached: bool,
}

impl ContinuationTrigger {
    /// Create an attached trigger
    ///
    /// `threshold` is clamped into `(0, 1]`; a non-finite value falls back to
    /// [`DEFAULT_VISIBILITY_THRESHOLD`].
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        let threshold = if threshold.is_finite() {
            threshold.clamp(f32::EPSILON, 1.0)
        } else {
            DEFAULT_VISIBILITY_THRESHOLD
        };

        Self {
            threshold,
            last_visibility: 0.0,
            attached: true,
        }
    }

    #[must_use]
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Record a visibility report and fetch if eligible
    ///
    /// Returns `true` when a request was issued.
    pub fn on_visibility<F: NextPage + ?Sized>(&mut self, fraction: f32, feed: &mut F) -> bool {
        if !self.attached {
            return false;
        }
        self.last_visibility = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.fire_if_visible(feed)
    }

    /// Sample a [`VisibilitySource`] and fetch if eligible
    pub fn poll<S, F>(&mut self, source: &S, feed: &mut F) -> bool
    where
        S: VisibilitySource + ?Sized,
        F: NextPage + ?Sized,
    {
        self.on_visibility(source.visible_fraction(), feed)
    }

    /// Re-evaluate the last reported visibility, e.g. after a page landed
    pub fn recheck<F: NextPage + ?Sized>(&mut self, feed: &mut F) -> bool {
        self.attached && self.fire_if_visible(feed)
    }

    /// Stop reacting to visibility; later reports are ignored
    pub const fn detach(&mut self) {
        self.attached = false;
        self.last_visibility = 0.0;
    }

    fn fire_if_visible<F: NextPage + ?Sized>(&self, feed: &mut F) -> bool {
        self.last_visibility >= self.threshold && feed.can_fetch_more() && feed.fetch_next_page()
    }
}

impl Default for ContinuationTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_THRESHOLD)
    }
}
