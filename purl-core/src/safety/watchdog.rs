//! Solenoid on-time watchdog
//!
//! A solenoid left energized overheats. Whatever drives the output, the
//! watchdog forces it off once it has been on continuously for the
//! threshold, and latches a fault until explicitly cleared.

use crate::config::DEFAULT_SAFETY_THRESHOLD_MS;

/// Logical solenoid output and when it last switched on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputState {
    level: bool,
    active_since_ms: Option<u64>,
}

impl OutputState {
    /// Output off
    pub const fn new() -> Self {
        Self {
            level: false,
            active_since_ms: None,
        }
    }

    pub fn level(&self) -> bool {
        self.level
    }

    /// Set the level, returning true if it changed
    ///
    /// Holding the level at 1 does not restart the on-time.
    pub fn set_level(&mut self, level: bool, now_ms: u64) -> bool {
        if level == self.level {
            return false;
        }
        self.level = level;
        self.active_since_ms = if level { Some(now_ms) } else { None };
        true
    }

    /// Continuous on-time at `now_ms`
    pub fn on_for_ms(&self, now_ms: u64) -> Option<u64> {
        self.active_since_ms
            .map(|since| now_ms.saturating_sub(since))
    }
}

/// Watchdog check result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyStatus {
    /// Nothing to do
    Ok,
    /// Output was forced off after being held for `held_ms`
    Tripped { held_ms: u64 },
}

/// On-time limit with a latched fault
#[derive(Debug, Clone)]
pub struct SolenoidWatchdog {
    threshold_ms: u32,
    faulted: bool,
    trips: u32,
}

impl Default for SolenoidWatchdog {
    fn default() -> Self {
        Self::new(DEFAULT_SAFETY_THRESHOLD_MS)
    }
}

impl SolenoidWatchdog {
    pub fn new(threshold_ms: u32) -> Self {
        Self {
            threshold_ms,
            faulted: false,
            trips: 0,
        }
    }

    /// Force the output off if it has been on for the threshold or longer
    pub fn check_safety(&mut self, output: &mut OutputState, now_ms: u64) -> SafetyStatus {
        match output.on_for_ms(now_ms) {
            Some(held_ms) if held_ms >= u64::from(self.threshold_ms) => {
                output.set_level(false, now_ms);
                self.faulted = true;
                self.trips = self.trips.wrapping_add(1);
                SafetyStatus::Tripped { held_ms }
            }
            _ => SafetyStatus::Ok,
        }
    }

    /// Fault latched by a past trip
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    pub fn clear_fault(&mut self) {
        self.faulted = false;
    }

    /// Number of trips since boot
    pub fn trips(&self) -> u32 {
        self.trips
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_since_follows_edges() {
        let mut output = OutputState::new();
        assert!(output.set_level(true, 100));
        assert_eq!(output.on_for_ms(150), Some(50));

        // Staying on keeps the original start
        assert!(!output.set_level(true, 200));
        assert_eq!(output.on_for_ms(250), Some(150));

        assert!(output.set_level(false, 300));
        assert_eq!(output.on_for_ms(400), None);
    }

    #[test]
    fn test_below_threshold_is_ok() {
        let mut watchdog = SolenoidWatchdog::new(3000);
        let mut output = OutputState::new();
        output.set_level(true, 0);

        assert_eq!(watchdog.check_safety(&mut output, 2999), SafetyStatus::Ok);
        assert!(output.level());
        assert!(!watchdog.is_faulted());
    }

    #[test]
    fn test_trip_at_threshold() {
        let mut watchdog = SolenoidWatchdog::new(3000);
        let mut output = OutputState::new();
        output.set_level(true, 1000);

        assert_eq!(
            watchdog.check_safety(&mut output, 4000),
            SafetyStatus::Tripped { held_ms: 3000 }
        );
        assert!(!output.level());
        assert_eq!(output.on_for_ms(4000), None);
        assert!(watchdog.is_faulted());
        assert_eq!(watchdog.trips(), 1);

        // Fault stays latched, output stays off
        assert_eq!(watchdog.check_safety(&mut output, 9000), SafetyStatus::Ok);
        assert!(watchdog.is_faulted());

        watchdog.clear_fault();
        assert!(!watchdog.is_faulted());
    }

    #[test]
    fn test_off_output_never_trips() {
        let mut watchdog = SolenoidWatchdog::default();
        let mut output = OutputState::new();
        assert_eq!(watchdog.check_safety(&mut output, u64::MAX), SafetyStatus::Ok);
    }
}
