//! Transient, in-memory ability cooldowns
//!
//! Cooldowns are never persisted; they live for the process lifetime and
//! decay on a fixed tick.

pub mod ticker;
pub mod tracker;

pub use ticker::CooldownTicker;
pub use tracker::{Cooldown, CooldownKey, CooldownTracker};
