//! Dashboard aggregation over the metrics store.
//!
//! The three dashboard views (latest snapshot, trailing trend, state
//! comparison) are independent retrievals. The aggregate entry point issues
//! them concurrently and joins all-or-nothing: one failure collapses the
//! whole view into a single "data unavailable" state, never a partial
//! render.

use std::sync::Arc;

use serde_json::json;

use crate::domain::district::DistrictId;
use crate::domain::error::Error;
use crate::domain::metrics::{MonthlySnapshot, StateComparison, TrendPoint};
use crate::domain::ports::{
    DistrictRepository, DistrictRepositoryError, MetricsRepository, MetricsRepositoryError,
};

/// Default trailing window for trend series, in months.
pub const DEFAULT_TREND_WINDOW_MONTHS: u32 = 12;

/// Fully assembled dashboard payload for one district.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Client-supplied selection tag, echoed back verbatim so consumers can
    /// discard responses from superseded selections.
    pub generation: Option<u64>,
    /// Latest monthly snapshot.
    pub latest: MonthlySnapshot,
    /// Trailing trend, oldest to newest.
    pub trend: Vec<TrendPoint>,
    /// Comparison against the state-wide average.
    pub comparison: StateComparison,
}

/// Aggregates dashboard views for a resolved district.
pub struct DashboardService {
    districts: Arc<dyn DistrictRepository>,
    metrics: Arc<dyn MetricsRepository>,
    trend_window: u32,
}

impl DashboardService {
    /// Create a service with the default trend window.
    pub fn new(
        districts: Arc<dyn DistrictRepository>,
        metrics: Arc<dyn MetricsRepository>,
    ) -> Self {
        Self {
            districts,
            metrics,
            trend_window: DEFAULT_TREND_WINDOW_MONTHS,
        }
    }

    /// Override the trailing trend window.
    #[must_use]
    pub fn with_trend_window(mut self, months: u32) -> Self {
        self.trend_window = months.max(1);
        self
    }

    /// The latest monthly snapshot for the district.
    ///
    /// # Errors
    ///
    /// [`Error::not_found`] when the district has no recorded months.
    pub async fn latest(&self, district: DistrictId) -> Result<MonthlySnapshot, Error> {
        self.metrics
            .latest_snapshot(district)
            .await
            .map_err(map_metrics_error)?
            .ok_or_else(|| no_data(district))
    }

    /// The trailing trend series for the district, oldest to newest.
    ///
    /// # Errors
    ///
    /// Propagates metrics store failures; an empty series is not an error.
    pub async fn trend(&self, district: DistrictId) -> Result<Vec<TrendPoint>, Error> {
        self.metrics
            .trend(district, self.trend_window)
            .await
            .map_err(map_metrics_error)
    }

    /// Compare the district's latest month against the state-wide average.
    ///
    /// # Errors
    ///
    /// [`Error::not_found`] when the district is unknown or has no recorded
    /// months.
    pub async fn compare(&self, district: DistrictId) -> Result<StateComparison, Error> {
        let found = self
            .districts
            .find_by_id(district)
            .await
            .map_err(map_district_error)?
            .ok_or_else(|| Error::not_found(format!("district {district} does not exist")))?;
        let latest = self.latest(district).await?;

        let (state_avg, rank) = tokio::try_join!(
            async {
                self.metrics
                    .state_average_person_days(&found.state, latest.period)
                    .await
                    .map_err(map_metrics_error)
            },
            async {
                self.metrics
                    .rank_by_person_days(district, &found.state, latest.period)
                    .await
                    .map_err(map_metrics_error)
            },
        )?;

        let state_avg = state_avg
            .ok_or_else(|| Error::internal("state aggregate missing for a recorded period"))?;
        let (district_rank, total_districts) = rank
            .ok_or_else(|| Error::internal("rank missing for a recorded period"))?;

        Ok(StateComparison {
            period: latest.period,
            district_person_days: latest.person_days,
            district_avg_wage: latest.avg_wage,
            state_avg_person_days: state_avg.round() as i64,
            district_rank,
            total_districts,
            person_days_delta_pct: delta_pct(latest.person_days, state_avg),
        })
    }

    /// Assemble the full dashboard view, all-or-nothing.
    ///
    /// # Errors
    ///
    /// Any underlying failure yields a single [`Error::unavailable`]
    /// "data unavailable" error; partial views are never returned.
    pub async fn dashboard(
        &self,
        district: DistrictId,
        generation: Option<u64>,
    ) -> Result<DashboardView, Error> {
        let (latest, trend, comparison) = tokio::try_join!(
            self.latest(district),
            self.trend(district),
            self.compare(district),
        )
        .map_err(|err| {
            Error::unavailable("data unavailable")
                .with_details(json!({ "reason": err.message() }))
        })?;

        Ok(DashboardView {
            generation,
            latest,
            trend,
            comparison,
        })
    }
}

fn no_data(district: DistrictId) -> Error {
    Error::not_found(format!("no data recorded for district {district}"))
}

fn delta_pct(district_value: i64, state_avg: f64) -> f64 {
    if state_avg <= 0.0 {
        return 0.0;
    }
    let delta = (district_value as f64 - state_avg) / state_avg * 100.0;
    (delta * 10.0).round() / 10.0
}

fn map_metrics_error(error: MetricsRepositoryError) -> Error {
    match error {
        MetricsRepositoryError::Connection { message } => {
            Error::unavailable(format!("metrics store unavailable: {message}"))
        }
        MetricsRepositoryError::Query { message } => {
            Error::internal(format!("metrics store error: {message}"))
        }
        MetricsRepositoryError::Duplicate { district, period } => Error::conflict(format!(
            "metric for district {district} at {period} already recorded"
        )),
    }
}

fn map_district_error(error: DistrictRepositoryError) -> Error {
    match error {
        DistrictRepositoryError::Connection { message } => {
            Error::unavailable(format!("district directory unavailable: {message}"))
        }
        DistrictRepositoryError::Query { message } => {
            Error::internal(format!("district directory error: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::metrics::NewMonthlyMetric;
    use crate::domain::period::YearMonth;
    use crate::domain::ports::InMemoryStore;

    mockall::mock! {
        Metrics {}

        #[async_trait]
        impl MetricsRepository for Metrics {
            async fn latest_snapshot(
                &self,
                district: DistrictId,
            ) -> Result<Option<MonthlySnapshot>, MetricsRepositoryError>;

            async fn trend(
                &self,
                district: DistrictId,
                window_months: u32,
            ) -> Result<Vec<TrendPoint>, MetricsRepositoryError>;

            async fn state_average_person_days(
                &self,
                state: &str,
                period: YearMonth,
            ) -> Result<Option<f64>, MetricsRepositoryError>;

            async fn rank_by_person_days(
                &self,
                district: DistrictId,
                state: &str,
                period: YearMonth,
            ) -> Result<Option<(u32, u32)>, MetricsRepositoryError>;

            async fn append(
                &self,
                record: &NewMonthlyMetric,
            ) -> Result<(), MetricsRepositoryError>;
        }
    }

    fn sample_service() -> DashboardService {
        let store = Arc::new(InMemoryStore::with_sample_data());
        DashboardService::new(store.clone(), store)
    }

    fn period(year: i32, month: u32) -> YearMonth {
        YearMonth::try_new(year, month).expect("valid period")
    }

    #[rstest]
    #[tokio::test]
    async fn latest_is_the_maximum_period() {
        let service = sample_service();
        let latest = service.latest(DistrictId::new(1)).await.expect("data exists");
        assert_eq!(latest.period, period(2025, 9));
        assert_eq!(latest.person_days, 2_510_000);
    }

    #[rstest]
    #[tokio::test]
    async fn trend_is_ordered_oldest_to_newest() {
        let service = sample_service();
        let trend = service.trend(DistrictId::new(1)).await.expect("data exists");
        let months: Vec<u32> = trend.iter().map(|p| p.period.month).collect();
        assert_eq!(months, [6, 7, 8, 9]);
    }

    #[rstest]
    #[tokio::test]
    async fn trend_window_bounds_the_series() {
        let store = Arc::new(InMemoryStore::with_sample_data());
        let service =
            DashboardService::new(store.clone(), store).with_trend_window(2);
        let trend = service.trend(DistrictId::new(1)).await.expect("data exists");
        let months: Vec<u32> = trend.iter().map(|p| p.period.month).collect();
        assert_eq!(months, [8, 9]);
    }

    #[rstest]
    #[tokio::test]
    async fn comparison_reports_rank_and_delta() {
        let service = sample_service();
        let comparison = service
            .compare(DistrictId::new(3))
            .await
            .expect("data exists");

        assert_eq!(comparison.period, period(2025, 9));
        assert_eq!(comparison.district_rank, 3);
        assert_eq!(comparison.total_districts, 3);
        assert_eq!(comparison.state_avg_person_days, 1_970_000);
        assert!(comparison.person_days_delta_pct < 0.0);
    }

    #[rstest]
    #[tokio::test]
    async fn dashboard_echoes_the_generation_tag() {
        let service = sample_service();
        let view = service
            .dashboard(DistrictId::new(1), Some(42))
            .await
            .expect("data exists");
        assert_eq!(view.generation, Some(42));
        assert_eq!(view.trend.len(), 4);
    }

    #[rstest]
    #[tokio::test]
    async fn one_failed_retrieval_collapses_the_view() {
        let districts = Arc::new(InMemoryStore::with_sample_data());
        let mut metrics = MockMetrics::new();
        metrics.expect_latest_snapshot().returning(|_| {
            Ok(Some(MonthlySnapshot {
                period: YearMonth::try_new(2025, 9).expect("valid period"),
                person_days: 100,
                households: 10,
                avg_wage: 230.0,
                beneficiaries: 20,
                source_updated_at: None,
            }))
        });
        metrics
            .expect_trend()
            .returning(|_, _| Err(MetricsRepositoryError::connection("store down")));
        metrics
            .expect_state_average_person_days()
            .returning(|_, _| Ok(Some(100.0)));
        metrics
            .expect_rank_by_person_days()
            .returning(|_, _, _| Ok(Some((1, 1))));

        let service = DashboardService::new(districts, Arc::new(metrics));
        let err = service
            .dashboard(DistrictId::new(1), None)
            .await
            .expect_err("trend failure collapses the view");

        assert_eq!(err.code(), ErrorCode::Unavailable);
        assert_eq!(err.message(), "data unavailable");
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_district_is_not_found() {
        let service = sample_service();
        let err = service
            .compare(DistrictId::new(99))
            .await
            .expect_err("no such district");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
