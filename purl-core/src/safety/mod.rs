//! Safety monitoring
//!
//! Bounds how long the solenoid may be held on.

pub mod watchdog;

pub use watchdog::{OutputState, SafetyStatus, SolenoidWatchdog};
