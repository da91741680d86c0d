//! Startup seeding orchestration.
//!
//! Applies the bundled district directory and a deterministic run of demo
//! metrics when the directory is empty. Seeding never overwrites existing
//! data: a non-empty directory short-circuits the whole run.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Datelike;
use district_data::{STATE_NAME, generate_demo_metrics, gujarat_districts};
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    DistrictRepository, DistrictRepositoryError, MetricsRepository, MetricsRepositoryError,
};
use crate::domain::{Coordinates, DistrictId, NewDistrict, NewMonthlyMetric, YearMonth};

/// Result of a startup seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Seeding is disabled by configuration.
    Disabled,
    /// The directory already holds districts; nothing was written.
    AlreadySeeded,
    /// Seed data was applied.
    Applied {
        /// Districts inserted.
        districts: usize,
        /// Metric rows inserted.
        metrics: usize,
    },
}

/// Failures while applying seed data.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The district directory rejected an operation.
    #[error(transparent)]
    Directory(#[from] DistrictRepositoryError),
    /// The metrics store rejected an operation.
    #[error(transparent)]
    Metrics(#[from] MetricsRepositoryError),
}

/// Apply seed data when enabled and the directory is empty.
///
/// Demo metrics cover the trailing months ending at the clock's current
/// month, so a freshly seeded instance always has a "latest" month to show.
///
/// # Errors
///
/// Returns [`SeedError`] when the directory or metrics store fails;
/// duplicate metric rows are skipped, not errors.
pub async fn seed_on_startup(
    settings: &super::SeedSettings,
    districts: Arc<dyn DistrictRepository>,
    metrics: Arc<dyn MetricsRepository>,
    clock: &dyn Clock,
) -> Result<SeedOutcome, SeedError> {
    if !settings.enabled {
        info!(reason = "disabled", "district data seeding skipped");
        return Ok(SeedOutcome::Disabled);
    }
    if districts.count().await? > 0 {
        info!(reason = "directory not empty", "district data seeding skipped");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let mut ids_by_code: HashMap<&'static str, DistrictId> = HashMap::new();
    for seed in gujarat_districts() {
        let id = districts
            .insert(&NewDistrict {
                state: STATE_NAME.to_owned(),
                code: seed.code.to_owned(),
                name: seed.name.to_owned(),
                name_hindi: Some(seed.name_hindi.to_owned()),
                centroid: Coordinates::try_new(seed.latitude, seed.longitude).ok(),
            })
            .await?;
        ids_by_code.insert(seed.code, id);
    }

    let now = clock.utc();
    let rows = generate_demo_metrics(settings.seed, now.year(), now.month(), settings.months);
    let mut inserted = 0_usize;
    for row in &rows {
        let Some(&district_id) = ids_by_code.get(row.district_code) else {
            continue;
        };
        let Ok(period) = YearMonth::try_new(row.year, row.month) else {
            continue;
        };
        let record = NewMonthlyMetric {
            district_id,
            period,
            person_days: row.person_days,
            households: row.households,
            avg_wage: row.avg_wage,
            beneficiaries: row.beneficiaries,
            extra: None,
            source_updated_at: None,
        };
        match metrics.append(&record).await {
            Ok(()) => inserted += 1,
            Err(MetricsRepositoryError::Duplicate { .. }) => {}
            Err(err) => return Err(err.into()),
        }
    }

    info!(
        districts = ids_by_code.len(),
        metrics = inserted,
        "district data seeding applied"
    );
    Ok(SeedOutcome::Applied {
        districts: ids_by_code.len(),
        metrics: inserted,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::InMemoryStore;
    use crate::seed::SeedSettings;

    struct FixedClock;

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2025, 9, 20, 5, 0, 0)
                .single()
                .unwrap_or_default()
        }
    }

    fn settings() -> SeedSettings {
        SeedSettings {
            enabled: true,
            seed: 42,
            months: 3,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn seeds_every_district_with_trailing_months() {
        let store = Arc::new(InMemoryStore::new());
        let outcome = seed_on_startup(&settings(), store.clone(), store.clone(), &FixedClock)
            .await
            .expect("seeding succeeds");

        assert_eq!(
            outcome,
            SeedOutcome::Applied {
                districts: 33,
                metrics: 33 * 3,
            }
        );
        let gandhinagar = store
            .find_by_code("GJ13")
            .await
            .expect("lookup works")
            .expect("seeded");
        let latest = store
            .latest_snapshot(gandhinagar.id)
            .await
            .expect("query works")
            .expect("metrics seeded");
        assert_eq!((latest.period.year, latest.period.month), (2025, 9));
    }

    #[rstest]
    #[tokio::test]
    async fn non_empty_directories_are_left_alone() {
        let store = Arc::new(InMemoryStore::with_sample_data());
        let outcome = seed_on_startup(&settings(), store.clone(), store.clone(), &FixedClock)
            .await
            .expect("seeding succeeds");
        assert_eq!(outcome, SeedOutcome::AlreadySeeded);
        assert_eq!(store.count().await.expect("count works"), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn disabled_settings_do_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let disabled = SeedSettings {
            enabled: false,
            ..settings()
        };
        let outcome = seed_on_startup(&disabled, store.clone(), store.clone(), &FixedClock)
            .await
            .expect("seeding succeeds");
        assert_eq!(outcome, SeedOutcome::Disabled);
        assert_eq!(store.count().await.expect("count works"), 0);
    }
}
