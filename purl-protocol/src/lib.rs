//! Purl Host Link Protocol
//!
//! This crate defines the byte-stream protocol between the host (pattern
//! tool) and the knitting machine interface. The protocol is deliberately
//! tiny: the device only needs one row at a time, and the host only needs
//! to know when the carriage has finished with it.
//!
//! # Protocol Overview
//!
//! Host → device commands are length-prefixed:
//! ```text
//! ┌─────────┬────────┬──────────────────┐
//! │ COMMAND │ LENGTH │ PAYLOAD          │
//! │ 1B      │ 1B     │ 0-255B           │
//! └─────────┴────────┴──────────────────┘
//! ```
//!
//! Device → host messages are a single tag byte.
//!
//! There is no start byte and no checksum. The parser resynchronizes by
//! dropping one byte at a time until a recognized command tag leads the
//! buffer.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{FrameError, FrameParser, BUFFER_CAPACITY, HEADER_SIZE, MAX_FRAME_SIZE};
pub use messages::{
    Command, DeviceMessage, MessageTag, RowBits, CMD_SET_ROW, HOST_MAX_ROW_LEN, MAX_ROW_LEN,
    MSG_PIN_STATE, MSG_ROW_COMPLETE,
};
