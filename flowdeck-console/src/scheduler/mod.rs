//! Shared polling orchestration
//!
//! One process-wide timer drives every periodic dashboard feed. Feeds
//! register and unregister themselves as their views come and go; the timer
//! runs exactly when at least one feed is registered.

mod hub;

pub use hub::PollHub;
