//! Calendar period type for monthly metrics.

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Validation failure for [`YearMonth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
#[error("month must be within 1-12, got {0}")]
pub struct InvalidMonth(pub u32);

/// A calendar month. Ordering is lexicographic on (year, month), so the
/// maximum value is the most recent period.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct YearMonth {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}

impl YearMonth {
    /// Validate and construct a period.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMonth`] when `month` is outside 1-12.
    pub const fn try_new(year: i32, month: u32) -> Result<Self, InvalidMonth> {
        if month < 1 || month > 12 {
            return Err(InvalidMonth(month));
        }
        Ok(Self { year, month })
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn ordering_is_chronological() {
        let june = YearMonth::try_new(2025, 6).expect("valid");
        let december_prior = YearMonth::try_new(2024, 12).expect("valid");
        let september = YearMonth::try_new(2025, 9).expect("valid");

        assert!(december_prior < june);
        assert!(june < september);
        assert_eq!(
            [june, september, december_prior].iter().max(),
            Some(&september)
        );
    }

    #[rstest]
    #[case(0)]
    #[case(13)]
    fn rejects_out_of_range_months(#[case] month: u32) {
        assert_eq!(YearMonth::try_new(2025, month), Err(InvalidMonth(month)));
    }

    #[rstest]
    fn displays_zero_padded() {
        let period = YearMonth::try_new(2025, 6).expect("valid");
        assert_eq!(period.to_string(), "2025-06");
    }
}
