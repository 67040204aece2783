//! State shared between tasks
//!
//! The clock edge crosses from the interrupt-priority executor through the
//! [`EDGE_LATCH`], and the row it selects from lives in [`ROW`] behind
//! critical sections. Everything else uses embassy-sync primitives.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use purl_core::{Diagnostics, EdgeLatch, RangeState, RowStatus, SharedRow};

/// Pending clock edge, set by the edge capture task
pub static EDGE_LATCH: EdgeLatch = EdgeLatch::new();

/// Current row, needle cursor and row-active flag
pub static ROW: SharedRow = SharedRow::new();

/// Latest knitting loop state, picked up by the status task
pub static STATUS: Signal<CriticalSectionRawMutex, StatusSnapshot> = Signal::new();

/// Loop state for the periodic status report
#[derive(Debug, Clone, Copy)]
pub struct StatusSnapshot {
    pub range: RangeState,
    pub solenoid: bool,
    pub faulted: bool,
    pub row: RowStatus,
    pub diagnostics: Diagnostics,
}
