//! Runtime counters
//!
//! Conditions the loop recovers from on its own are counted here so the
//! status report can show them.

/// Counters since boot, all wrapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Diagnostics {
    /// Clock edges consumed by the loop (after coalescing)
    pub edges_consumed: u32,
    /// Edges that selected a needle from the row
    pub needles_driven: u32,
    /// Edges past the end of the row
    pub underruns: u32,
    /// SET_ROW commands applied
    pub rows_received: u32,
    /// Range exits (ROW_COMPLETE notifications due)
    pub rows_completed: u32,
    /// Bytes dropped while resynchronizing on the host stream
    pub skipped_bytes: u32,
    /// Frames rejected by the parser
    pub parse_errors: u32,
    /// Watchdog trips
    pub safety_trips: u32,
    /// Host receive errors
    pub host_read_errors: u32,
    /// Host transmit errors
    pub host_write_errors: u32,
}

pub(crate) fn bump(counter: &mut u32) {
    *counter = counter.wrapping_add(1);
}
