//! Row, cursor and active flag behind interrupt masking
//!
//! Every access happens inside `critical_section::with` and only copies
//! out what the caller needs, so sections stay a handful of instructions
//! long. The row itself never leaves the section: an edge snapshot carries
//! only the one bit it selects.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::edge::EdgeLatch;
use crate::sequencer::Row;

#[derive(Debug)]
struct RowState {
    row: Row,
    cursor: usize,
    active: bool,
}

/// What the loop saw when it consumed an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeSnapshot {
    /// Row active (carriage entered the window since the last exit)
    pub active: bool,
    /// Needle cursor before this edge
    pub cursor: usize,
    /// Row bit under the cursor, `None` past the end
    pub bit: Option<bool>,
}

/// Sequencer state readout for status reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RowStatus {
    pub active: bool,
    pub cursor: usize,
    pub row_len: usize,
}

/// Sequencer state shared across the edge handoff
pub struct SharedRow {
    inner: Mutex<RefCell<RowState>>,
}

impl Default for SharedRow {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedRow {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(RowState {
                row: Row::empty(),
                cursor: 0,
                active: false,
            })),
        }
    }

    /// Carriage entered the window: rewind and arm
    pub fn begin_row(&self) {
        critical_section::with(|cs| {
            let mut state = self.inner.borrow_ref_mut(cs);
            state.cursor = 0;
            state.active = true;
        });
    }

    /// Carriage left the window: disarm, keep the row and cursor
    pub fn end_row(&self) {
        critical_section::with(|cs| {
            self.inner.borrow_ref_mut(cs).active = false;
        });
    }

    /// Replace the pattern; cursor and active flag are untouched
    pub fn replace_row(&self, row: Row) {
        critical_section::with(|cs| {
            self.inner.borrow_ref_mut(cs).row = row;
        });
    }

    /// Consume a pending edge and snapshot what it selects
    ///
    /// Clearing the latch and reading the state happen in the same
    /// section. Returns `None` if no edge was pending.
    pub fn take_edge(&self, latch: &EdgeLatch) -> Option<EdgeSnapshot> {
        critical_section::with(|cs| {
            if !latch.take(cs) {
                return None;
            }
            let state = self.inner.borrow_ref(cs);
            Some(EdgeSnapshot {
                active: state.active,
                cursor: state.cursor,
                bit: state.row.bit(state.cursor),
            })
        })
    }

    /// Move the cursor to the next needle
    pub fn advance(&self) {
        critical_section::with(|cs| {
            let mut state = self.inner.borrow_ref_mut(cs);
            state.cursor = state.cursor.saturating_add(1);
        });
    }

    pub fn status(&self) -> RowStatus {
        critical_section::with(|cs| {
            let state = self.inner.borrow_ref(cs);
            RowStatus {
                active: state.active,
                cursor: state.cursor,
                row_len: state.row.len(),
            }
        })
    }

    /// Copy of the current pattern
    pub fn row(&self) -> Row {
        critical_section::with(|cs| self.inner.borrow_ref(cs).row.clone())
    }
}
