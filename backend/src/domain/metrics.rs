//! Monthly metric entities and derived read models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error as ThisError;

use crate::domain::district::DistrictId;
use crate::domain::period::YearMonth;

/// The most recent monthly snapshot for a district.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySnapshot {
    /// Calendar period the snapshot covers.
    pub period: YearMonth,
    /// Total person-days worked.
    pub person_days: i64,
    /// Households provided employment.
    pub households: i64,
    /// Average daily wage in rupees.
    pub avg_wage: f64,
    /// Individual beneficiaries.
    pub beneficiaries: i64,
    /// Timestamp reported by the upstream source, when known.
    pub source_updated_at: Option<DateTime<Utc>>,
}

/// One point of a trailing trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Calendar period of the point.
    pub period: YearMonth,
    /// Total person-days worked in the period.
    pub person_days: i64,
    /// Average daily wage in the period.
    pub avg_wage: f64,
}

/// Comparison of a district's latest month against the state-wide average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateComparison {
    /// Period the comparison covers (the district's latest month).
    pub period: YearMonth,
    /// District person-days for the period.
    pub district_person_days: i64,
    /// District average wage for the period.
    pub district_avg_wage: f64,
    /// Mean person-days across all districts of the state for the period.
    pub state_avg_person_days: i64,
    /// District rank by person-days among districts with data, 1 = highest.
    pub district_rank: u32,
    /// Number of districts ranked.
    pub total_districts: u32,
    /// Percentage delta of district person-days vs the state average,
    /// rounded to one digit.
    pub person_days_delta_pct: f64,
}

/// Validation failures for [`NewMonthlyMetric`].
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum MetricValidationError {
    /// A count field was negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeCount {
        /// Offending field name.
        field: &'static str,
        /// Supplied value.
        value: i64,
    },
    /// The wage was negative or non-finite.
    #[error("avg_wage must be a non-negative finite number")]
    InvalidWage,
}

/// A monthly metric record ready for insertion.
///
/// ## Invariants
/// - All counts are non-negative.
/// - `avg_wage` is finite, non-negative, and rounded to 2 digits.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMonthlyMetric {
    /// District the record belongs to.
    pub district_id: DistrictId,
    /// Calendar period; at most one record may exist per district and period.
    pub period: YearMonth,
    /// Total person-days worked.
    pub person_days: i64,
    /// Households provided employment.
    pub households: i64,
    /// Average daily wage in rupees.
    pub avg_wage: f64,
    /// Individual beneficiaries.
    pub beneficiaries: i64,
    /// Free-form extension payload from the source.
    pub extra: Option<Value>,
    /// Timestamp reported by the upstream source.
    pub source_updated_at: Option<DateTime<Utc>>,
}

impl NewMonthlyMetric {
    /// Validate counts and normalise the wage to 2-digit precision.
    ///
    /// # Errors
    ///
    /// Returns [`MetricValidationError`] on negative counts or a negative or
    /// non-finite wage.
    pub fn validated(mut self) -> Result<Self, MetricValidationError> {
        for (field, value) in [
            ("person_days", self.person_days),
            ("households", self.households),
            ("beneficiaries", self.beneficiaries),
        ] {
            if value < 0 {
                return Err(MetricValidationError::NegativeCount { field, value });
            }
        }
        if !self.avg_wage.is_finite() || self.avg_wage < 0.0 {
            return Err(MetricValidationError::InvalidWage);
        }
        self.avg_wage = (self.avg_wage * 100.0).round() / 100.0;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn metric(person_days: i64, avg_wage: f64) -> NewMonthlyMetric {
        NewMonthlyMetric {
            district_id: DistrictId::new(1),
            period: YearMonth::try_new(2025, 9).expect("valid"),
            person_days,
            households: 10,
            avg_wage,
            beneficiaries: 20,
            extra: None,
            source_updated_at: None,
        }
    }

    #[rstest]
    fn wage_is_rounded_to_two_digits() {
        let validated = metric(100, 234.567).validated().expect("valid metric");
        assert!((validated.avg_wage - 234.57).abs() < f64::EPSILON);
    }

    #[rstest]
    fn negative_counts_are_rejected() {
        let err = metric(-1, 235.0).validated().expect_err("negative count");
        assert!(matches!(
            err,
            MetricValidationError::NegativeCount {
                field: "person_days",
                ..
            }
        ));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(-0.01)]
    fn bad_wages_are_rejected(#[case] wage: f64) {
        assert_eq!(
            metric(0, wage).validated(),
            Err(MetricValidationError::InvalidWage)
        );
    }
}
