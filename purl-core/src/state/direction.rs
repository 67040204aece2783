//! Carriage direction line

/// Direction the carriage is travelling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CarriageDirection {
    /// Line low
    Right,
    /// Line high
    Left,
}

impl CarriageDirection {
    pub fn from_level(high: bool) -> Self {
        if high {
            CarriageDirection::Left
        } else {
            CarriageDirection::Right
        }
    }
}
