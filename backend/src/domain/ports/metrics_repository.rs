//! Port abstraction for monthly metric persistence.

use async_trait::async_trait;

use crate::domain::district::DistrictId;
use crate::domain::metrics::{MonthlySnapshot, NewMonthlyMetric, TrendPoint};
use crate::domain::period::YearMonth;

/// Persistence errors raised by metrics repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricsRepositoryError {
    /// Repository connection could not be established.
    #[error("metrics repository connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("metrics repository query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// A record already exists for the (district, year, month) key.
    #[error("metric for district {district} at {period} already recorded")]
    Duplicate {
        /// District the rejected record belongs to.
        district: DistrictId,
        /// Period of the rejected record.
        period: YearMonth,
    },
}

impl MetricsRepositoryError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a duplicate-key error.
    #[must_use]
    pub const fn duplicate(district: DistrictId, period: YearMonth) -> Self {
        Self::Duplicate { district, period }
    }
}

/// Read and append access to monthly metric records.
#[async_trait]
pub trait MetricsRepository: Send + Sync {
    /// The record with the maximum (year, month) for the district.
    async fn latest_snapshot(
        &self,
        district: DistrictId,
    ) -> Result<Option<MonthlySnapshot>, MetricsRepositoryError>;

    /// The district's records for the trailing `window_months`, ordered
    /// oldest to newest.
    async fn trend(
        &self,
        district: DistrictId,
        window_months: u32,
    ) -> Result<Vec<TrendPoint>, MetricsRepositoryError>;

    /// Mean person-days across all districts of `state` for `period`.
    /// `None` when no district of the state has a record for the period.
    async fn state_average_person_days(
        &self,
        state: &str,
        period: YearMonth,
    ) -> Result<Option<f64>, MetricsRepositoryError>;

    /// The district's rank by person-days among the state's districts with a
    /// record for `period` (1 = highest), with the number of ranked
    /// districts. `None` when the district has no record for the period.
    async fn rank_by_person_days(
        &self,
        district: DistrictId,
        state: &str,
        period: YearMonth,
    ) -> Result<Option<(u32, u32)>, MetricsRepositoryError>;

    /// Append a monthly record.
    ///
    /// Fails with [`MetricsRepositoryError::Duplicate`] when a record already
    /// exists for the (district, year, month) key; records are never updated
    /// in place.
    async fn append(&self, record: &NewMonthlyMetric) -> Result<(), MetricsRepositoryError>;
}
