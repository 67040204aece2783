//! In-memory pins and host link for host-side tests

use heapless::{Deque, Vec};

use crate::gpio::{InputPin, OutputPin};
use crate::link::{HostRx, HostTx, LinkError};

/// Writes remembered by [`MockOutput`]
pub const OUTPUT_HISTORY: usize = 256;

/// Bytes [`MockHostLink`] can hold in each direction
pub const LINK_BUFFER: usize = 1024;

/// Input pin whose level is set by the test
#[derive(Debug, Default, Clone)]
pub struct MockInput {
    level: bool,
}

impl MockInput {
    pub fn new(level: bool) -> Self {
        Self { level }
    }

    pub fn set(&mut self, level: bool) {
        self.level = level;
    }
}

impl InputPin for MockInput {
    fn is_high(&self) -> bool {
        self.level
    }
}

/// Output pin that records every level written to it
#[derive(Debug, Default, Clone)]
pub struct MockOutput {
    level: bool,
    history: Vec<bool, OUTPUT_HISTORY>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every level written so far, oldest first
    pub fn history(&self) -> &[bool] {
        &self.history
    }

    /// History with consecutive repeats collapsed
    pub fn transitions(&self) -> Vec<bool, OUTPUT_HISTORY> {
        let mut out = Vec::new();
        for &level in self.history.iter() {
            if out.last() != Some(&level) {
                let _ = out.push(level);
            }
        }
        out
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl OutputPin for MockOutput {
    fn set_high(&mut self) {
        self.level = true;
        let _ = self.history.push(true);
    }

    fn set_low(&mut self) {
        self.level = false;
        let _ = self.history.push(false);
    }

    fn is_set_high(&self) -> bool {
        self.level
    }
}

/// Host link backed by two queues
#[derive(Debug, Default)]
pub struct MockHostLink {
    rx: Deque<u8, LINK_BUFFER>,
    tx: Vec<u8, LINK_BUFFER>,
    rx_error: Option<LinkError>,
    tx_error: Option<LinkError>,
}

impl MockHostLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make bytes available to the device, as if the host sent them
    pub fn queue_rx(&mut self, bytes: &[u8]) {
        for &b in bytes {
            let _ = self.rx.push_back(b);
        }
    }

    /// Bytes still waiting to be read by the device
    pub fn pending_rx(&self) -> usize {
        self.rx.len()
    }

    /// Everything the device has written so far
    pub fn sent(&self) -> &[u8] {
        &self.tx
    }

    /// Fail the next read with `error`
    pub fn fail_next_read(&mut self, error: LinkError) {
        self.rx_error = Some(error);
    }

    /// Fail every write with `error` until cleared with `None`
    pub fn fail_writes(&mut self, error: Option<LinkError>) {
        self.tx_error = error;
    }
}

impl HostRx for MockHostLink {
    fn try_read_byte(&mut self) -> Result<Option<u8>, LinkError> {
        if let Some(e) = self.rx_error.take() {
            return Err(e);
        }
        Ok(self.rx.pop_front())
    }
}

impl HostTx for MockHostLink {
    fn write_all(&mut self, data: &[u8]) -> Result<(), LinkError> {
        if let Some(e) = self.tx_error {
            return Err(e);
        }
        self.tx
            .extend_from_slice(data)
            .map_err(|_| LinkError::TxFull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_records_history() {
        let mut pin = MockOutput::new();
        pin.set_high();
        pin.set_high();
        pin.set_state(false);
        assert_eq!(pin.history(), &[true, true, false]);
        assert_eq!(&pin.transitions()[..], &[true, false]);
        assert!(pin.is_set_low());
    }

    #[test]
    fn test_link_reads_in_order() {
        let mut link = MockHostLink::new();
        link.queue_rx(&[1, 2]);
        assert_eq!(link.try_read_byte(), Ok(Some(1)));
        assert_eq!(link.try_read_byte(), Ok(Some(2)));
        assert_eq!(link.try_read_byte(), Ok(None));
    }

    #[test]
    fn test_link_injected_errors() {
        let mut link = MockHostLink::new();
        link.queue_rx(&[7]);
        link.fail_next_read(LinkError::Overrun);
        assert_eq!(link.try_read_byte(), Err(LinkError::Overrun));
        assert_eq!(link.try_read_byte(), Ok(Some(7)));

        link.fail_writes(Some(LinkError::TxFull));
        assert_eq!(link.write_all(&[3]), Err(LinkError::TxFull));
        assert!(link.sent().is_empty());
    }
}
