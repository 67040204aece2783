//! Carriage range tracking
//!
//! The range line is polled, and only a level change counts as a
//! transition.

pub mod direction;
pub mod range;

pub use direction::CarriageDirection;
pub use range::{RangeState, RangeTracker, RangeTransition};
