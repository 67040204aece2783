//! Board-agnostic core logic for the knitting firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Clock edge handoff from interrupt context
//! - Range state machine (carriage inside/outside the needle window)
//! - Row sequencer driving the solenoid one needle per edge
//! - Solenoid safety watchdog
//! - The [`Knitter`] context that ties them to the host protocol
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod diagnostics;
pub mod edge;
pub mod knitter;
pub mod safety;
pub mod sequencer;
pub mod state;

pub use config::{ConfigError, KnitterConfig, PinConfig, PinSpec};
pub use diagnostics::Diagnostics;
pub use edge::EdgeLatch;
pub use knitter::{Board, Knitter, PollReport};
pub use safety::{OutputState, SafetyStatus, SolenoidWatchdog};
pub use sequencer::{EdgeOutcome, EdgeSnapshot, Row, RowStatus, SharedRow};
pub use state::{CarriageDirection, RangeState, RangeTracker, RangeTransition};
