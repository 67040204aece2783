//! Host byte-stream abstractions
//!
//! The knitting loop must never stall waiting on the host, so reads are
//! non-blocking: a receiver reports "nothing ready" instead of waiting.

/// Errors reported by a host link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Receive FIFO overrun, bytes were lost
    Overrun,
    /// Framing, parity or break condition on the line
    Framing,
    /// Transmit buffer could not take the whole message
    TxFull,
}

/// Host receiver
pub trait HostRx {
    /// Read one byte if one is already available
    ///
    /// Returns `Ok(None)` immediately when nothing is buffered.
    fn try_read_byte(&mut self) -> Result<Option<u8>, LinkError>;
}

/// Host transmitter
pub trait HostTx {
    /// Queue `data` for transmission without waiting for the wire
    fn write_all(&mut self, data: &[u8]) -> Result<(), LinkError>;
}

/// Combined host link
pub trait HostLink: HostRx + HostTx {}

impl<T: HostRx + HostTx> HostLink for T {}
