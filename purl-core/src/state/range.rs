//! Range state machine

/// Whether the carriage is inside the needle window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangeState {
    OutOfRange,
    InRange,
}

impl RangeState {
    /// Map the range line level (high = in range)
    pub fn from_level(high: bool) -> Self {
        if high {
            RangeState::InRange
        } else {
            RangeState::OutOfRange
        }
    }

    pub fn is_in_range(&self) -> bool {
        matches!(self, RangeState::InRange)
    }
}

/// An observed change of [`RangeState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangeTransition {
    /// OUT_OF_RANGE → IN_RANGE (line 0→1)
    Entered,
    /// IN_RANGE → OUT_OF_RANGE (line 1→0)
    Exited,
}

/// Edge detector for the range line
#[derive(Debug, Clone)]
pub struct RangeTracker {
    last_level: bool,
}

impl RangeTracker {
    /// Seed with the level read from hardware at startup
    ///
    /// A carriage already inside the window at boot does not produce an
    /// `Entered` transition.
    pub fn new(initial_level: bool) -> Self {
        Self {
            last_level: initial_level,
        }
    }

    pub fn state(&self) -> RangeState {
        RangeState::from_level(self.last_level)
    }

    /// Compare against the previous poll and report a transition, if any
    pub fn poll_range(&mut self, level: bool) -> Option<RangeTransition> {
        if level == self.last_level {
            return None;
        }
        self.last_level = level;
        Some(if level {
            RangeTransition::Entered
        } else {
            RangeTransition::Exited
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_only() {
        let mut tracker = RangeTracker::new(false);
        assert_eq!(tracker.poll_range(false), None);
        assert_eq!(tracker.poll_range(true), Some(RangeTransition::Entered));
        assert_eq!(tracker.poll_range(true), None);
        assert_eq!(tracker.state(), RangeState::InRange);
        assert_eq!(tracker.poll_range(false), Some(RangeTransition::Exited));
        assert_eq!(tracker.state(), RangeState::OutOfRange);
    }

    #[test]
    fn test_seeded_in_range() {
        // No entry event for a carriage already in the window at boot
        let mut tracker = RangeTracker::new(true);
        assert_eq!(tracker.state(), RangeState::InRange);
        assert_eq!(tracker.poll_range(true), None);
        assert_eq!(tracker.poll_range(false), Some(RangeTransition::Exited));
    }
}
