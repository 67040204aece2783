//! Purl Hardware Abstraction Layer
//!
//! Traits the knitting logic needs from a board, implemented by
//! chip-specific HALs.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  purl-core (range, rows, watchdog)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  purl-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ purl-hal-     │       │ mock (tests)  │
//! │    rp2040     │       │               │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`link::HostRx`], [`link::HostTx`] - Non-blocking host byte stream

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod link;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use gpio::{InputPin, OutputPin};
pub use link::{HostLink, HostRx, HostTx, LinkError};
