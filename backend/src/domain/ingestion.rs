//! Batch ingestion of monthly metrics.
//!
//! Ingestion is append-only: duplicate (district, year, month) rows are
//! skipped, never overwritten. Every run leaves one sync log entry behind,
//! whether it succeeded or aborted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::error::Error;
use crate::domain::metrics::NewMonthlyMetric;
use crate::domain::period::YearMonth;
use crate::domain::ports::{
    DistrictRepository, MetricsRepository, MetricsRepositoryError, SyncLogEntry,
    SyncLogRepository, SyncStatus,
};

/// One source row of a metrics batch, keyed by district code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricRecord {
    /// External code of the district the row belongs to.
    pub district_code: String,
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Total person-days worked.
    #[serde(default)]
    pub person_days: i64,
    /// Households provided employment.
    #[serde(default)]
    pub households: i64,
    /// Average daily wage in rupees.
    #[serde(default)]
    pub avg_wage: f64,
    /// Individual beneficiaries.
    #[serde(default)]
    pub beneficiaries: i64,
    /// Free-form extension payload from the source.
    #[serde(default)]
    pub extra: Option<Value>,
    /// Timestamp reported by the upstream source.
    #[serde(default)]
    pub source_updated_at: Option<DateTime<Utc>>,
}

/// A batch of source rows for one ingestion run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricsBatch {
    /// Rows to apply, in source order.
    pub records: Vec<MetricRecord>,
}

/// Row-level tally of an ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Rows appended to the store.
    pub inserted: u32,
    /// Rows skipped because the month was already recorded.
    pub duplicates: u32,
    /// Rows skipped because the district code is not in the directory.
    pub unknown_districts: u32,
    /// Rows skipped because they failed validation.
    pub invalid: u32,
}

impl IngestOutcome {
    fn summary(&self) -> String {
        format!(
            "inserted={} duplicates={} unknown_districts={} invalid={}",
            self.inserted, self.duplicates, self.unknown_districts, self.invalid
        )
    }
}

/// Applies metric batches and records each run in the sync log.
pub struct MetricsIngestionService {
    districts: Arc<dyn DistrictRepository>,
    metrics: Arc<dyn MetricsRepository>,
    sync_log: Arc<dyn SyncLogRepository>,
    clock: Arc<dyn Clock>,
}

impl MetricsIngestionService {
    /// Create an ingestion service.
    pub fn new(
        districts: Arc<dyn DistrictRepository>,
        metrics: Arc<dyn MetricsRepository>,
        sync_log: Arc<dyn SyncLogRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            districts,
            metrics,
            sync_log,
            clock,
        }
    }

    /// Apply a batch. Row-level problems (duplicates, unknown districts,
    /// validation failures) are tallied and skipped; store-level failures
    /// abort the run.
    ///
    /// # Errors
    ///
    /// Returns the mapped store error when the directory or metrics store
    /// fails mid-run; a failed sync log entry is recorded first.
    pub async fn ingest(
        &self,
        job_name: &str,
        batch: MetricsBatch,
    ) -> Result<IngestOutcome, Error> {
        let started_at = self.clock.utc();
        match self.apply(&batch).await {
            Ok(outcome) => {
                self.log_run(
                    job_name,
                    SyncStatus::Succeeded,
                    Some(outcome.summary()),
                    started_at,
                )
                .await;
                Ok(outcome)
            }
            Err(error) => {
                self.log_run(
                    job_name,
                    SyncStatus::Failed,
                    Some(error.message().to_owned()),
                    started_at,
                )
                .await;
                Err(error)
            }
        }
    }

    async fn apply(&self, batch: &MetricsBatch) -> Result<IngestOutcome, Error> {
        let mut outcome = IngestOutcome::default();

        for record in &batch.records {
            let Some(district) = self
                .districts
                .find_by_code(&record.district_code)
                .await
                .map_err(|err| Error::unavailable(err.to_string()))?
            else {
                warn!(code = %record.district_code, "skipping row for unknown district");
                outcome.unknown_districts += 1;
                continue;
            };

            let Ok(period) = YearMonth::try_new(record.year, record.month) else {
                warn!(
                    code = %record.district_code,
                    year = record.year,
                    month = record.month,
                    "skipping row with invalid period"
                );
                outcome.invalid += 1;
                continue;
            };

            let metric = NewMonthlyMetric {
                district_id: district.id,
                period,
                person_days: record.person_days,
                households: record.households,
                avg_wage: record.avg_wage,
                beneficiaries: record.beneficiaries,
                extra: record.extra.clone(),
                source_updated_at: record.source_updated_at,
            };
            let metric = match metric.validated() {
                Ok(metric) => metric,
                Err(err) => {
                    warn!(code = %record.district_code, error = %err, "skipping invalid row");
                    outcome.invalid += 1;
                    continue;
                }
            };

            match self.metrics.append(&metric).await {
                Ok(()) => outcome.inserted += 1,
                Err(MetricsRepositoryError::Duplicate { district, period }) => {
                    debug!(%district, %period, "month already recorded, skipping");
                    outcome.duplicates += 1;
                }
                Err(err) => return Err(Error::unavailable(err.to_string())),
            }
        }

        Ok(outcome)
    }

    async fn log_run(
        &self,
        job_name: &str,
        status: SyncStatus,
        details: Option<String>,
        started_at: DateTime<Utc>,
    ) {
        let entry = SyncLogEntry {
            job_name: job_name.to_owned(),
            status,
            details,
            started_at,
            finished_at: self.clock.utc(),
        };
        if let Err(err) = self.sync_log.record(&entry).await {
            // The audit trail is best-effort; a failed write must not fail
            // an otherwise successful run.
            warn!(error = %err, job = job_name, "failed to record sync log entry");
        }
    }
}
