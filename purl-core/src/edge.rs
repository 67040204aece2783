//! Clock edge handoff from interrupt context
//!
//! The interrupt side only ever stores `true`. The knitting loop clears the
//! flag inside a critical section, together with the row snapshot it needs
//! to act on the edge. Edges arriving faster than the loop drains them
//! collapse into one.

use critical_section::CriticalSection;
use portable_atomic::{AtomicBool, Ordering};

/// Single pending-edge flag shared with the clock interrupt
#[derive(Debug, Default)]
pub struct EdgeLatch {
    pending: AtomicBool,
}

impl EdgeLatch {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Record a rising clock edge
    ///
    /// Interrupt-safe: one store, no branching.
    #[inline(always)]
    pub fn capture(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Peek without consuming
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Consume the pending edge, returning whether there was one
    ///
    /// Requires a critical section so the clear cannot race a capture
    /// between the load and the store.
    pub fn take(&self, _cs: CriticalSection<'_>) -> bool {
        let pending = self.pending.load(Ordering::Acquire);
        if pending {
            self.pending.store(false, Ordering::Release);
        }
        pending
    }
}
