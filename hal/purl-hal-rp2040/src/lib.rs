//! RP2040-specific HAL for the knitting firmware
//!
//! This crate provides RP2040 implementations of the shared `purl-hal`
//! traits, plus RP2040-specific functionality:
//!
//! - GPIO allocation and pin-string parsing
//! - Dynamic pin allocation for config-driven setup
//! - Host link over the buffered UART0

#![no_std]

pub mod gpio;
pub mod pins;
pub mod uart;

pub use gpio::{parse_pin_string, GpioAllocator, RpInput, RpOutput};
pub use pins::{HostUartPeripherals, PinBank, PinError};
pub use uart::HostUart;
