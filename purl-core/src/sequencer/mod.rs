//! Row sequencing
//!
//! One needle per captured clock edge: the cursor walks the current row
//! while the carriage is in range, and every edge past the end of the row
//! selects nothing.

pub mod row;
pub mod shared;

pub use row::Row;
pub use shared::{EdgeSnapshot, RowStatus, SharedRow};

/// What the sequencer decided for one consumed edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeOutcome {
    /// Drive the solenoid to `level` for needle `index`
    Needle { index: usize, level: bool },
    /// Cursor ran past the end of the row; output off
    Underrun { index: usize },
    /// Edge outside an active row; output off
    Inactive,
}

impl EdgeOutcome {
    /// Decide from a snapshot taken when the edge was consumed
    pub fn from_snapshot(snapshot: &EdgeSnapshot) -> Self {
        if !snapshot.active {
            return EdgeOutcome::Inactive;
        }
        match snapshot.bit {
            Some(level) => EdgeOutcome::Needle {
                index: snapshot.cursor,
                level,
            },
            None => EdgeOutcome::Underrun {
                index: snapshot.cursor,
            },
        }
    }

    /// Level the solenoid ends up at
    pub fn level(&self) -> bool {
        match self {
            EdgeOutcome::Needle { level, .. } => *level,
            EdgeOutcome::Underrun { .. } | EdgeOutcome::Inactive => false,
        }
    }

    /// Whether the cursor moves forward
    pub fn advances(&self) -> bool {
        matches!(self, EdgeOutcome::Needle { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(active: bool, cursor: usize, bit: Option<bool>) -> EdgeSnapshot {
        EdgeSnapshot { active, cursor, bit }
    }

    #[test]
    fn test_needle() {
        let outcome = EdgeOutcome::from_snapshot(&snapshot(true, 1, Some(true)));
        assert_eq!(outcome, EdgeOutcome::Needle { index: 1, level: true });
        assert!(outcome.level());
        assert!(outcome.advances());
    }

    #[test]
    fn test_underrun() {
        let outcome = EdgeOutcome::from_snapshot(&snapshot(true, 3, None));
        assert_eq!(outcome, EdgeOutcome::Underrun { index: 3 });
        assert!(!outcome.level());
        assert!(!outcome.advances());
    }

    #[test]
    fn test_inactive_ignores_row() {
        let outcome = EdgeOutcome::from_snapshot(&snapshot(false, 0, Some(true)));
        assert_eq!(outcome, EdgeOutcome::Inactive);
        assert!(!outcome.level());
    }
}
