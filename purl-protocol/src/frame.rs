//! Frame accumulation and decoding for host commands.
//!
//! Frame format:
//! - COMMAND (1 byte): command tag
//! - LENGTH (1 byte): payload length (0-255)
//! - PAYLOAD (LENGTH bytes): command-specific data
//!
//! Bytes arrive in arbitrary fragments, so the parser keeps a message buffer
//! and only decodes once a whole frame is present. A leading byte that is not
//! a known command is dropped on its own and decoding retries at the next
//! byte. Any error clears the whole buffer.

use heapless::Vec;

use crate::messages::{Command, MessageTag, MAX_ROW_LEN};

/// Command byte plus length byte
pub const HEADER_SIZE: usize = 2;

/// Maximum complete frame size (COMMAND + LENGTH + MAX_ROW_LEN)
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + MAX_ROW_LEN;

/// Receive buffer capacity: two maximal frames
pub const BUFFER_CAPACITY: usize = 2 * MAX_FRAME_SIZE;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Row payload contains a byte other than 0 or 1
    InvalidRowData,
    /// Receive buffer is full
    BufferOverflow,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Accumulates host bytes and decodes complete commands
#[derive(Debug, Clone)]
pub struct FrameParser {
    buffer: Vec<u8, BUFFER_CAPACITY>,
    skipped: u32,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            skipped: 0,
        }
    }

    /// Drop everything buffered
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Number of bytes waiting in the buffer
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no bytes are buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns true if another byte cannot be buffered
    pub fn is_full(&self) -> bool {
        self.buffer.is_full()
    }

    /// Total bytes dropped while resynchronizing
    pub fn skipped_bytes(&self) -> u32 {
        self.skipped
    }

    /// Append one received byte
    ///
    /// On overflow the buffer is cleared before the error is returned.
    pub fn push(&mut self, byte: u8) -> Result<(), FrameError> {
        if self.buffer.push(byte).is_err() {
            self.reset();
            return Err(FrameError::BufferOverflow);
        }
        Ok(())
    }

    /// Append a slice of received bytes
    pub fn extend(&mut self, bytes: &[u8]) -> Result<(), FrameError> {
        for &byte in bytes {
            self.push(byte)?;
        }
        Ok(())
    }

    /// Decode the next complete command, if any
    ///
    /// Returns `Ok(Some(cmd))` and removes its bytes when a whole frame is
    /// buffered, `Ok(None)` when more bytes are needed, or `Err` after
    /// clearing the buffer.
    pub fn next_command(&mut self) -> Result<Option<Command>, FrameError> {
        while self.buffer.len() >= HEADER_SIZE {
            let tag = MessageTag::from_byte(self.buffer[0]);
            if !tag.is_some_and(|t| t.is_host_command()) {
                self.consume(1);
                self.skipped = self.skipped.wrapping_add(1);
                continue;
            }

            let total = HEADER_SIZE + self.buffer[1] as usize;
            if self.buffer.len() < total {
                return Ok(None);
            }

            // SET_ROW is the only host command
            let command = match Command::set_row(&self.buffer[HEADER_SIZE..total]) {
                Ok(command) => command,
                Err(e) => {
                    self.reset();
                    return Err(e);
                }
            };
            self.consume(total);
            return Ok(Some(command));
        }
        Ok(None)
    }

    /// Remove `count` bytes from the front of the buffer
    fn consume(&mut self, count: usize) {
        let remaining = self.buffer.len() - count;
        self.buffer.copy_within(count.., 0);
        self.buffer.truncate(remaining);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{CMD_SET_ROW, MSG_PIN_STATE, MSG_ROW_COMPLETE};
    use proptest::prelude::*;

    fn row_of(cmd: Option<Command>) -> Option<Vec<u8, MAX_ROW_LEN>> {
        cmd.map(|Command::SetRow(bits)| bits)
    }

    #[test]
    fn test_parse_complete_frame() {
        let mut parser = FrameParser::new();
        parser.extend(&[0x02, 0x03, 0x01, 0x00, 0x01]).unwrap();

        let bits = row_of(parser.next_command().unwrap()).unwrap();
        assert_eq!(&bits[..], &[1, 0, 1]);
        assert!(parser.is_empty());
        assert_eq!(parser.next_command(), Ok(None));
    }

    #[test]
    fn test_waits_for_header() {
        let mut parser = FrameParser::new();
        parser.push(CMD_SET_ROW).unwrap();
        assert_eq!(parser.next_command(), Ok(None));
        assert_eq!(parser.len(), 1);
    }

    #[test]
    fn test_waits_for_payload() {
        let mut parser = FrameParser::new();
        parser.extend(&[0x02, 0x04, 0x01, 0x01]).unwrap();
        assert_eq!(parser.next_command(), Ok(None));
        // Nothing consumed while incomplete
        assert_eq!(parser.len(), 4);

        parser.extend(&[0x00, 0x00]).unwrap();
        let bits = row_of(parser.next_command().unwrap()).unwrap();
        assert_eq!(&bits[..], &[1, 1, 0, 0]);
    }

    #[test]
    fn test_empty_row() {
        let mut parser = FrameParser::new();
        parser.extend(&[0x02, 0x00]).unwrap();
        let bits = row_of(parser.next_command().unwrap()).unwrap();
        assert!(bits.is_empty());
        assert!(parser.is_empty());
    }

    #[test]
    fn test_resync_after_stray_byte() {
        let mut parser = FrameParser::new();
        parser.extend(&[0x7F, 0x02, 0x02, 0x01, 0x01]).unwrap();

        let bits = row_of(parser.next_command().unwrap()).unwrap();
        assert_eq!(&bits[..], &[1, 1]);
        assert_eq!(parser.skipped_bytes(), 1);
    }

    #[test]
    fn test_device_tags_are_skipped() {
        // Echoed device bytes are not host commands
        let mut parser = FrameParser::new();
        parser
            .extend(&[MSG_ROW_COMPLETE, MSG_PIN_STATE, 0x02, 0x01, 0x00])
            .unwrap();

        let bits = row_of(parser.next_command().unwrap()).unwrap();
        assert_eq!(&bits[..], &[0]);
        assert_eq!(parser.skipped_bytes(), 2);
    }

    #[test]
    fn test_single_stray_byte_stays_buffered() {
        // Fewer than two bytes: nothing to decide yet
        let mut parser = FrameParser::new();
        parser.push(0x55).unwrap();
        assert_eq!(parser.next_command(), Ok(None));
        assert_eq!(parser.len(), 1);

        parser.extend(&[0x02, 0x01, 0x01]).unwrap();
        let bits = row_of(parser.next_command().unwrap()).unwrap();
        assert_eq!(&bits[..], &[1]);
    }

    #[test]
    fn test_back_to_back_frames() {
        let mut parser = FrameParser::new();
        parser
            .extend(&[0x02, 0x01, 0x01, 0x02, 0x02, 0x00, 0x01])
            .unwrap();

        let first = row_of(parser.next_command().unwrap()).unwrap();
        let second = row_of(parser.next_command().unwrap()).unwrap();
        assert_eq!(&first[..], &[1]);
        assert_eq!(&second[..], &[0, 1]);
        assert_eq!(parser.next_command(), Ok(None));
    }

    #[test]
    fn test_invalid_row_data_clears_buffer() {
        let mut parser = FrameParser::new();
        parser
            .extend(&[0x02, 0x02, 0x01, 0x07, 0x02, 0x01, 0x01])
            .unwrap();

        assert_eq!(parser.next_command(), Err(FrameError::InvalidRowData));
        assert!(parser.is_empty());
        assert_eq!(parser.next_command(), Ok(None));
    }

    #[test]
    fn test_overflow_clears_buffer() {
        let mut parser = FrameParser::new();
        // Pushing without decoding can fill the buffer
        for _ in 0..BUFFER_CAPACITY {
            parser.push(0x02).unwrap();
        }
        assert!(parser.is_full());
        assert_eq!(parser.push(0x00), Err(FrameError::BufferOverflow));
        assert!(parser.is_empty());
    }

    #[test]
    fn test_full_buffer_always_decodes() {
        // A full buffer always holds at least one complete frame
        let mut parser = FrameParser::new();
        parser.push(0x02).unwrap();
        parser.push(0xFF).unwrap();
        while !parser.is_full() {
            parser.push(0x01).unwrap();
        }
        let bits = row_of(parser.next_command().unwrap()).unwrap();
        assert_eq!(bits.len(), MAX_ROW_LEN);
        assert_eq!(parser.len(), BUFFER_CAPACITY - MAX_FRAME_SIZE);
    }

    proptest! {
        #[test]
        fn prop_fragmented_arrival(
            bits in proptest::collection::vec(0u8..=1, 0..=MAX_ROW_LEN),
            cuts in proptest::collection::vec(1usize..16, 1..64),
        ) {
            let frame = Command::set_row(&bits).unwrap().encode_to_vec().unwrap();
            let mut parser = FrameParser::new();
            let mut decoded = None;
            let mut offset = 0;
            let mut cut = cuts.iter().cycle();

            while offset < frame.len() {
                let end = (offset + *cut.next().unwrap()).min(frame.len());
                parser.extend(&frame[offset..end]).unwrap();
                offset = end;
                if let Some(cmd) = parser.next_command().unwrap() {
                    prop_assert!(decoded.is_none());
                    decoded = Some(cmd);
                }
            }

            let row = row_of(decoded).unwrap();
            prop_assert_eq!(&row[..], &bits[..]);
            prop_assert!(parser.is_empty());
        }

        #[test]
        fn prop_garbage_prefix_resyncs(
            junk in proptest::collection::vec(any::<u8>().prop_filter("not a command", |b| *b != CMD_SET_ROW), 0..32),
            bits in proptest::collection::vec(0u8..=1, 0..32),
        ) {
            let frame = Command::set_row(&bits).unwrap().encode_to_vec().unwrap();
            let mut parser = FrameParser::new();
            parser.extend(&junk).unwrap();
            parser.extend(&frame).unwrap();

            let row = row_of(parser.next_command().unwrap()).unwrap();
            prop_assert_eq!(&row[..], &bits[..]);
            prop_assert_eq!(parser.skipped_bytes() as usize, junk.len());
        }
    }
}
