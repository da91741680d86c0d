//! PostgreSQL-backed `MetricsRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MetricsRepository, MetricsRepositoryError};
use crate::domain::{DistrictId, MonthlySnapshot, NewMonthlyMetric, TrendPoint, YearMonth};

use super::models::{MonthlyMetricRow, NewMonthlyMetricRow};
use super::pool::{DbPool, PoolError};
use super::schema::{districts, monthly_metrics};

/// Diesel-backed implementation of the `MetricsRepository` port.
#[derive(Clone)]
pub struct DieselMetricsRepository {
    pool: DbPool,
}

impl DieselMetricsRepository {
    /// Create a repository over the given pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MetricsRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            MetricsRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> MetricsRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            MetricsRepositoryError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => {
            MetricsRepositoryError::query(info.message().to_owned())
        }
        other => MetricsRepositoryError::query(other.to_string()),
    }
}

fn row_period(row: &MonthlyMetricRow) -> Result<YearMonth, MetricsRepositoryError> {
    let month = u32::try_from(row.month)
        .map_err(|_| MetricsRepositoryError::query(format!("corrupt month {}", row.month)))?;
    YearMonth::try_new(row.year, month)
        .map_err(|err| MetricsRepositoryError::query(err.to_string()))
}

fn row_to_snapshot(row: MonthlyMetricRow) -> Result<MonthlySnapshot, MetricsRepositoryError> {
    Ok(MonthlySnapshot {
        period: row_period(&row)?,
        person_days: row.person_days,
        households: row.households,
        avg_wage: row.avg_wage,
        beneficiaries: row.beneficiaries,
        source_updated_at: row.source_updated_at,
    })
}

fn row_to_trend_point(row: MonthlyMetricRow) -> Result<TrendPoint, MetricsRepositoryError> {
    Ok(TrendPoint {
        period: row_period(&row)?,
        person_days: row.person_days,
        avg_wage: row.avg_wage,
    })
}

fn month_column(period: YearMonth) -> Result<i32, MetricsRepositoryError> {
    i32::try_from(period.month)
        .map_err(|_| MetricsRepositoryError::query(format!("month out of range: {period}")))
}

#[async_trait]
impl MetricsRepository for DieselMetricsRepository {
    async fn latest_snapshot(
        &self,
        district: DistrictId,
    ) -> Result<Option<MonthlySnapshot>, MetricsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<MonthlyMetricRow> = monthly_metrics::table
            .filter(monthly_metrics::district_id.eq(district.get()))
            .order((monthly_metrics::year.desc(), monthly_metrics::month.desc()))
            .select(MonthlyMetricRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_snapshot).transpose()
    }

    async fn trend(
        &self,
        district: DistrictId,
        window_months: u32,
    ) -> Result<Vec<TrendPoint>, MetricsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut rows: Vec<MonthlyMetricRow> = monthly_metrics::table
            .filter(monthly_metrics::district_id.eq(district.get()))
            .order((monthly_metrics::year.desc(), monthly_metrics::month.desc()))
            .limit(i64::from(window_months))
            .select(MonthlyMetricRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.reverse();
        rows.into_iter().map(row_to_trend_point).collect()
    }

    async fn state_average_person_days(
        &self,
        state: &str,
        period: YearMonth,
    ) -> Result<Option<f64>, MetricsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let values: Vec<i64> = monthly_metrics::table
            .inner_join(districts::table)
            .filter(districts::state.eq(state))
            .filter(monthly_metrics::year.eq(period.year))
            .filter(monthly_metrics::month.eq(month_column(period)?))
            .select(monthly_metrics::person_days)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if values.is_empty() {
            return Ok(None);
        }
        let total: i64 = values.iter().sum();
        Ok(Some(total as f64 / values.len() as f64))
    }

    async fn rank_by_person_days(
        &self,
        district: DistrictId,
        state: &str,
        period: YearMonth,
    ) -> Result<Option<(u32, u32)>, MetricsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ranked: Vec<i32> = monthly_metrics::table
            .inner_join(districts::table)
            .filter(districts::state.eq(state))
            .filter(monthly_metrics::year.eq(period.year))
            .filter(monthly_metrics::month.eq(month_column(period)?))
            .order(monthly_metrics::person_days.desc())
            .select(monthly_metrics::district_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let total = ranked.len() as u32;
        Ok(ranked
            .iter()
            .position(|&id| id == district.get())
            .map(|idx| (idx as u32 + 1, total)))
    }

    async fn append(&self, record: &NewMonthlyMetric) -> Result<(), MetricsRepositoryError> {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewMonthlyMetricRow {
            district_id: record.district_id.get(),
            year: record.period.year,
            month: month_column(record.period)?,
            person_days: record.person_days,
            households: record.households,
            avg_wage: record.avg_wage,
            beneficiaries: record.beneficiaries,
            other_json: record.extra.as_ref(),
            source_updated_at: record.source_updated_at,
        };
        diesel::insert_into(monthly_metrics::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    MetricsRepositoryError::duplicate(record.district_id, record.period)
                }
                other => map_diesel_error(other),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn metric_row(year: i32, month: i32) -> MonthlyMetricRow {
        MonthlyMetricRow {
            id: 1,
            district_id: 1,
            year,
            month,
            person_days: 100,
            households: 10,
            avg_wage: 230.0,
            beneficiaries: 20,
            other_json: None,
            source_updated_at: None,
            fetched_at: chrono::Utc::now(),
        }
    }

    #[rstest]
    fn corrupt_months_surface_as_query_errors() {
        let err = row_to_snapshot(metric_row(2025, 13)).expect_err("13 is not a month");
        assert!(matches!(err, MetricsRepositoryError::Query { .. }));
    }

    #[rstest]
    fn valid_rows_map_to_snapshots() {
        let snapshot = row_to_snapshot(metric_row(2025, 9)).expect("valid row");
        assert_eq!(snapshot.period.to_string(), "2025-09");
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool_error(PoolError::checkout("pool exhausted"));
        assert!(matches!(err, MetricsRepositoryError::Connection { .. }));
    }
}
