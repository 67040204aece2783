//! Message types for the host link
//!
//! Message types are divided into two categories:
//! - Host → Device: row commands
//! - Device → Host: single-byte notifications

use heapless::Vec;

use crate::frame::{FrameError, HEADER_SIZE, MAX_FRAME_SIZE};

// Message type IDs: Device → Host
/// Pin state report. Reserved: defined for host tooling, never emitted.
pub const MSG_PIN_STATE: u8 = 0x01;
pub const MSG_ROW_COMPLETE: u8 = 0x03;

// Message type IDs: Host → Device
pub const CMD_SET_ROW: u8 = 0x02;

/// Longest row the wire format can carry (length is a single byte)
pub const MAX_ROW_LEN: usize = u8::MAX as usize;

/// Longest row the host tooling will send
pub const HOST_MAX_ROW_LEN: usize = 200;

/// Needle selection bits for one row, each 0 or 1
pub type RowBits = Vec<u8, MAX_ROW_LEN>;

/// Every tag known to the protocol, regardless of direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageTag {
    /// Reserved pin-state report (device → host, never produced)
    PinState,
    /// Replace the current row (host → device)
    SetRow,
    /// Carriage left the knitting range (device → host)
    RowComplete,
}

impl MessageTag {
    /// Parse a tag from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            MSG_PIN_STATE => Some(MessageTag::PinState),
            CMD_SET_ROW => Some(MessageTag::SetRow),
            MSG_ROW_COMPLETE => Some(MessageTag::RowComplete),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            MessageTag::PinState => MSG_PIN_STATE,
            MessageTag::SetRow => CMD_SET_ROW,
            MessageTag::RowComplete => MSG_ROW_COMPLETE,
        }
    }

    /// Returns true for tags the device accepts from the host
    pub fn is_host_command(&self) -> bool {
        matches!(self, MessageTag::SetRow)
    }
}

/// Commands parsed from host-originated frames
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Replace the current row pattern wholesale
    SetRow(RowBits),
}

impl Command {
    /// Build a SET_ROW command, validating the bits
    pub fn set_row(bits: &[u8]) -> Result<Self, FrameError> {
        if bits.len() > MAX_ROW_LEN {
            return Err(FrameError::PayloadTooLarge);
        }
        if bits.iter().any(|&b| b > 1) {
            return Err(FrameError::InvalidRowData);
        }

        let mut row = RowBits::new();
        row.extend_from_slice(bits)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Command::SetRow(row))
    }

    /// Encode this command into a byte buffer (host side)
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        match self {
            Command::SetRow(bits) => {
                let frame_len = HEADER_SIZE + bits.len();
                if buffer.len() < frame_len {
                    return Err(FrameError::BufferTooSmall);
                }

                buffer[0] = MessageTag::SetRow.to_byte();
                buffer[1] = bits.len() as u8;
                buffer[HEADER_SIZE..frame_len].copy_from_slice(bits);

                Ok(frame_len)
            }
        }
    }

    /// Encode this command into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// Messages from the device to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMessage {
    /// Carriage exited the knitting range; the row cycle is complete
    RowComplete,
}

impl DeviceMessage {
    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            DeviceMessage::RowComplete => MessageTag::RowComplete.to_byte(),
        }
    }

    /// Decode a device message (host side)
    ///
    /// The reserved pin-state tag decodes to `None`: nothing produces it.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match MessageTag::from_byte(byte)? {
            MessageTag::RowComplete => Some(DeviceMessage::RowComplete),
            MessageTag::PinState | MessageTag::SetRow => None,
        }
    }

    /// Encode into a byte buffer, returning the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let slot = buffer.first_mut().ok_or(FrameError::BufferTooSmall)?;
        *slot = self.to_byte();
        Ok(1)
    }
}
