//! Paginated entity feeds
//!
//! One [`FeedController`] per listing screen. It owns the loaded entities and
//! the phase of the feed, and talks to the service through a
//! [`SearchBackend`](crate::backend::SearchBackend).

pub mod controller;
pub mod entity;
pub mod error;
pub mod state;

pub use controller::{Applied, FeedController, FeedOptions, FeedUpdate, PageEvent};
pub use entity::{DEFAULT_LOGO_FIELD, Entity, EntityId, PageExtractor, ParsedPage};
pub use error::TransportError;
pub use state::{FeedPhase, FeedState, Generation, PageCursor};
