//! Configuration type definitions

/// Longest continuous solenoid on-time before the watchdog trips
pub const DEFAULT_SAFETY_THRESHOLD_MS: u32 = 3000;

/// Delay between knitting loop iterations
pub const DEFAULT_LOOP_PERIOD_US: u32 = 1000;

/// Interval between status log lines
pub const DEFAULT_STATUS_INTERVAL_MS: u32 = 5000;

/// Default host link speed
pub const DEFAULT_BAUDRATE: u32 = 115_200;

/// Number of GPIO pins a pin number may refer to
pub const GPIO_COUNT: u8 = 30;

/// Pins taken by the host UART (UART0 TX, RX)
pub const HOST_UART_PINS: [u8; 2] = [0, 1];

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Watchdog threshold of zero would trip on every activation
    ZeroSafetyThreshold,
    /// Loop period must be non-zero
    ZeroLoopPeriod,
    /// Status interval must be non-zero
    ZeroStatusInterval,
    /// Host baud rate must be non-zero
    ZeroBaudrate,
    /// Pin number outside the GPIO bank
    InvalidPin(u8),
    /// Pin assigned to more than one function
    DuplicatePin(u8),
    /// Pin belongs to the host UART
    ReservedPin(u8),
}

/// A GPIO assignment
///
/// `inverted` swaps the logical level, for active-low wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinSpec {
    pub pin: u8,
    pub inverted: bool,
}

impl PinSpec {
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
        }
    }
}

/// Carriage and solenoid wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// Range indicator (high = carriage inside the needle window)
    pub range: PinSpec,
    /// Per-needle clock, rising edge
    pub clock: PinSpec,
    /// Solenoid driver
    pub solenoid: PinSpec,
    /// Carriage direction (sampled, not acted on)
    pub direction: PinSpec,
    /// Fault indicator LED
    pub fault_led: PinSpec,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            range: PinSpec::new(4),
            clock: PinSpec::new(27),
            solenoid: PinSpec::new(28),
            direction: PinSpec::new(26),
            fault_led: PinSpec::new(16),
        }
    }
}

impl PinConfig {
    /// All assigned pins in a fixed order
    pub fn all(&self) -> [PinSpec; 5] {
        [
            self.range,
            self.clock,
            self.solenoid,
            self.direction,
            self.fault_led,
        ]
    }

    /// Check that every pin exists and is used once
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pins = self.all();
        for (i, spec) in pins.iter().enumerate() {
            if spec.pin >= GPIO_COUNT {
                return Err(ConfigError::InvalidPin(spec.pin));
            }
            if HOST_UART_PINS.contains(&spec.pin) {
                return Err(ConfigError::ReservedPin(spec.pin));
            }
            if pins[..i].iter().any(|other| other.pin == spec.pin) {
                return Err(ConfigError::DuplicatePin(spec.pin));
            }
        }
        Ok(())
    }
}

/// Top-level firmware configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KnitterConfig {
    /// Maximum continuous solenoid on-time (ms)
    pub safety_threshold_ms: u32,
    /// Delay between loop iterations (µs)
    pub loop_period_us: u32,
    /// Status log interval (ms)
    pub status_interval_ms: u32,
    /// Host UART baud rate
    pub baudrate: u32,
    /// GPIO assignments
    pub pins: PinConfig,
}

impl Default for KnitterConfig {
    fn default() -> Self {
        Self {
            safety_threshold_ms: DEFAULT_SAFETY_THRESHOLD_MS,
            loop_period_us: DEFAULT_LOOP_PERIOD_US,
            status_interval_ms: DEFAULT_STATUS_INTERVAL_MS,
            baudrate: DEFAULT_BAUDRATE,
            pins: PinConfig::default(),
        }
    }
}

impl KnitterConfig {
    /// Reject configurations the firmware cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.safety_threshold_ms == 0 {
            return Err(ConfigError::ZeroSafetyThreshold);
        }
        if self.loop_period_us == 0 {
            return Err(ConfigError::ZeroLoopPeriod);
        }
        if self.status_interval_ms == 0 {
            return Err(ConfigError::ZeroStatusInterval);
        }
        if self.baudrate == 0 {
            return Err(ConfigError::ZeroBaudrate);
        }
        self.pins.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = KnitterConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.safety_threshold_ms, 3000);
        assert_eq!(config.pins.range.pin, 4);
        assert_eq!(config.pins.solenoid.pin, 28);
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut config = KnitterConfig::default();
        config.safety_threshold_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroSafetyThreshold));

        let mut config = KnitterConfig::default();
        config.loop_period_us = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroLoopPeriod));

        let mut config = KnitterConfig::default();
        config.status_interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroStatusInterval));

        let mut config = KnitterConfig::default();
        config.baudrate = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroBaudrate));
    }

    #[test]
    fn test_duplicate_pin_rejected() {
        let mut config = KnitterConfig::default();
        config.pins.direction = PinSpec::new(27);
        assert_eq!(config.validate(), Err(ConfigError::DuplicatePin(27)));
    }

    #[test]
    fn test_host_uart_pins_reserved() {
        let mut config = KnitterConfig::default();
        config.pins.fault_led = PinSpec::new(1);
        assert_eq!(config.validate(), Err(ConfigError::ReservedPin(1)));
    }

    #[test]
    fn test_invalid_pin_rejected() {
        let mut config = KnitterConfig::default();
        config.pins.clock = PinSpec::inverted(30);
        assert_eq!(config.validate(), Err(ConfigError::InvalidPin(30)));
    }
}
