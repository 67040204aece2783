//! GPIO allocation and pin wrappers
//!
//! Tracks which GPIO pins are in use to prevent conflicts, and adapts
//! embassy-rp pins to the `purl-hal` traits with optional inversion.

use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
use embassy_rp::Peri;
use heapless::FnvIndexSet;
use purl_core::config::GPIO_COUNT;
use purl_core::PinSpec;
use purl_hal::{InputPin, OutputPin};

use crate::pins::PinError;

/// GPIO allocator to track pin usage
pub struct GpioAllocator {
    allocated: FnvIndexSet<u8, 32>,
}

impl Default for GpioAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioAllocator {
    pub fn new() -> Self {
        Self {
            allocated: FnvIndexSet::new(),
        }
    }

    /// Claim a GPIO pin for one function
    pub fn allocate(&mut self, pin: u8) -> Result<(), PinError> {
        if pin >= GPIO_COUNT {
            return Err(PinError::InvalidPin);
        }
        if self.allocated.contains(&pin) {
            return Err(PinError::AlreadyTaken);
        }
        self.allocated
            .insert(pin)
            .map_err(|_| PinError::AlreadyTaken)?;
        Ok(())
    }

    /// Claim every pin in `specs`, stopping at the first conflict
    pub fn allocate_all(&mut self, specs: &[PinSpec]) -> Result<(), (u8, PinError)> {
        for spec in specs {
            self.allocate(spec.pin).map_err(|e| (spec.pin, e))?;
        }
        Ok(())
    }

    pub fn allocated_count(&self) -> usize {
        self.allocated.len()
    }
}

/// Parse a pin string from config
///
/// Supports formats:
/// - "gpio4" -> pin 4
/// - "!gpio4" -> pin 4, inverted (active-low)
pub fn parse_pin_string(s: &str) -> Option<PinSpec> {
    let s = s.trim();

    let (s, inverted) = match s.strip_prefix('!') {
        Some(rest) => (rest, true),
        None => (s, false),
    };

    let pin: u8 = s.strip_prefix("gpio")?.parse().ok()?;
    if pin >= GPIO_COUNT {
        return None;
    }

    Some(PinSpec { pin, inverted })
}

/// Input pin reporting its logical level
pub struct RpInput {
    pin: Input<'static>,
    inverted: bool,
}

impl RpInput {
    /// Floating input; the carriage drives its lines actively
    pub fn new(pin: Peri<'static, AnyPin>, spec: PinSpec) -> Self {
        Self {
            pin: Input::new(pin, Pull::None),
            inverted: spec.inverted,
        }
    }

    /// Wait for the line to become logically active
    pub async fn wait_for_active_edge(&mut self) {
        if self.inverted {
            self.pin.wait_for_falling_edge().await;
        } else {
            self.pin.wait_for_rising_edge().await;
        }
    }
}

impl InputPin for RpInput {
    fn is_high(&self) -> bool {
        self.pin.is_high() != self.inverted
    }
}

/// Output pin taking logical levels
pub struct RpOutput {
    pin: Output<'static>,
    inverted: bool,
}

impl RpOutput {
    /// Output starting logically low
    pub fn new(pin: Peri<'static, AnyPin>, spec: PinSpec) -> Self {
        let initial = if spec.inverted { Level::High } else { Level::Low };
        Self {
            pin: Output::new(pin, initial),
            inverted: spec.inverted,
        }
    }
}

impl OutputPin for RpOutput {
    fn set_high(&mut self) {
        if self.inverted {
            self.pin.set_low();
        } else {
            self.pin.set_high();
        }
    }

    fn set_low(&mut self) {
        if self.inverted {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high() != self.inverted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator() {
        let mut alloc = GpioAllocator::new();

        assert!(alloc.allocate(4).is_ok());
        assert_eq!(alloc.allocate(4), Err(PinError::AlreadyTaken));
        assert_eq!(alloc.allocate(30), Err(PinError::InvalidPin));
        assert!(alloc.allocate(29).is_ok());
        assert_eq!(alloc.allocated_count(), 2);
    }

    #[test]
    fn test_allocate_all_reports_conflict() {
        let mut alloc = GpioAllocator::new();
        let specs = [PinSpec::new(27), PinSpec::new(28), PinSpec::new(27)];
        assert_eq!(alloc.allocate_all(&specs), Err((27, PinError::AlreadyTaken)));
        assert_eq!(alloc.allocated_count(), 2);
    }

    #[test]
    fn test_parse_pin_string() {
        assert_eq!(parse_pin_string("gpio4"), Some(PinSpec::new(4)));
        assert_eq!(parse_pin_string("!gpio16"), Some(PinSpec::inverted(16)));
        assert_eq!(parse_pin_string(" gpio0 "), Some(PinSpec::new(0)));
        assert_eq!(parse_pin_string("gpio29"), Some(PinSpec::new(29)));

        assert_eq!(parse_pin_string("gpio30"), None);
        assert_eq!(parse_pin_string("pin11"), None);
        assert_eq!(parse_pin_string("gpio"), None);
        assert_eq!(parse_pin_string(""), None);
    }
}
