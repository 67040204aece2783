//! Needle selection pattern for one carriage pass

use purl_protocol::{Command, RowBits};

/// Row pattern, replaced wholesale by SET_ROW
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    bits: RowBits,
}

impl Row {
    pub const fn empty() -> Self {
        Self {
            bits: RowBits::new(),
        }
    }

    /// Wrap already-validated bits (each 0 or 1)
    pub fn from_bits(bits: RowBits) -> Self {
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Level for needle `index`, or `None` past the end
    pub fn bit(&self, index: usize) -> Option<bool> {
        self.bits.get(index).map(|&b| b != 0)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }
}

impl From<Command> for Row {
    fn from(command: Command) -> Self {
        match command {
            Command::SetRow(bits) => Row::from_bits(bits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits() {
        let row = Row::from(Command::set_row(&[1, 0, 1]).unwrap());
        assert_eq!(row.len(), 3);
        assert_eq!(row.bit(0), Some(true));
        assert_eq!(row.bit(1), Some(false));
        assert_eq!(row.bit(3), None);
    }

    #[test]
    fn test_empty() {
        let row = Row::empty();
        assert!(row.is_empty());
        assert_eq!(row.bit(0), None);
    }
}
