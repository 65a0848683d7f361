//! Inclusive range of catalogue product ids

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("Product id {value} is out of range, expected 1..=4294967295")]
    InvalidId { value: i64 },

    #[error("Starting product id {start} is greater than ending product id {end}")]
    StartAfterEnd { start: i64, end: i64 },
}

/// Inclusive `[start, end]` range of product ids, both at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProductIdRange {
    start: u32,
    end: u32,
}

impl ProductIdRange {
    pub fn new(start: i64, end: i64) -> Result<Self, RangeError> {
        let start_id = Self::to_id(start)?;
        let end_id = Self::to_id(end)?;
        if start_id > end_id {
            return Err(RangeError::StartAfterEnd { start, end });
        }
        Ok(Self {
            start: start_id,
            end: end_id,
        })
    }

    fn to_id(value: i64) -> Result<u32, RangeError> {
        u32::try_from(value)
            .ok()
            .filter(|id| *id >= 1)
            .ok_or(RangeError::InvalidId { value })
    }

    #[must_use]
    pub const fn start(&self) -> u32 {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> u32 {
        self.end
    }

    /// Number of ids covered
    #[must_use]
    pub const fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    /// Always false, a valid range holds at least one id
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Ids in ascending order
    pub fn ids(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

impl fmt::Display for ProductIdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 1, 1)]
    #[case(1, 3, 3)]
    #[case(5, 20, 16)]
    fn test_valid_ranges(#[case] start: i64, #[case] end: i64, #[case] expected_len: usize) {
        let range = ProductIdRange::new(start, end).unwrap();
        assert_eq!(range.len(), expected_len);
        assert_eq!(range.ids().count(), expected_len);
        assert_eq!(range.ids().next(), Some(range.start()));
        assert_eq!(range.ids().last(), Some(range.end()));
    }

    #[rstest]
    #[case(0, 3, RangeError::InvalidId { value: 0 })]
    #[case(-4, 3, RangeError::InvalidId { value: -4 })]
    #[case(1, 0, RangeError::InvalidId { value: 0 })]
    #[case(7, 3, RangeError::StartAfterEnd { start: 7, end: 3 })]
    fn test_invalid_ranges(#[case] start: i64, #[case] end: i64, #[case] expected: RangeError) {
        assert_eq!(ProductIdRange::new(start, end), Err(expected));
    }

    #[test]
    fn test_ids_above_u32_are_rejected() {
        let too_big = i64::from(u32::MAX) + 1;
        assert!(matches!(
            ProductIdRange::new(1, too_big),
            Err(RangeError::InvalidId { .. })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductIdRange::new(2, 9).unwrap().to_string(), "[2, 9]");
    }
}
