//! In-memory implementation of the persistence ports.
//!
//! Mirrors the relational constraints — the unique (district, year, month)
//! key and the delete cascade from districts to metrics — so contract tests
//! and the no-database server mode behave like the real store.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::domain::district::{Coordinates, District, DistrictId, NewDistrict};
use crate::domain::metrics::{MonthlySnapshot, NewMonthlyMetric, TrendPoint};
use crate::domain::period::YearMonth;
use crate::domain::ports::district_repository::{DistrictRepository, DistrictRepositoryError};
use crate::domain::ports::metrics_repository::{MetricsRepository, MetricsRepositoryError};
use crate::domain::ports::sync_log::{SyncLogEntry, SyncLogError, SyncLogRepository};

#[derive(Debug)]
struct Inner {
    districts: Vec<District>,
    metrics: Vec<NewMonthlyMetric>,
    sync_log: Vec<SyncLogEntry>,
    next_district_id: i32,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            districts: Vec::new(),
            metrics: Vec::new(),
            sync_log: Vec::new(),
            next_district_id: 1,
        }
    }
}

/// Shared in-memory store backing the district, metrics, and sync log ports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with a small demonstration dataset: three
    /// districts and a short run of monthly metrics for each.
    #[must_use]
    pub fn with_sample_data() -> Self {
        let store = Self::new();
        {
            let mut inner = store.write();
            let districts = [
                ("GD-GNR", "Gandhinagar", Some("गांधीनगर"), 23.2156, 72.6369),
                ("GD-SRT", "Surat", Some("सूरत"), 21.1702, 72.8311),
                ("GD-PBR", "Porbandar", Some("पोरबंदर"), 21.6417, 69.6042),
            ];
            for (code, name, name_hindi, lat, lon) in districts {
                let id = inner.next_district_id;
                inner.next_district_id += 1;
                inner.districts.push(District {
                    id: DistrictId::new(id),
                    state: "Gujarat".to_owned(),
                    code: code.to_owned(),
                    name: name.to_owned(),
                    name_hindi: name_hindi.map(str::to_owned),
                    centroid: Coordinates::try_new(lat, lon).ok(),
                });
            }

            // Gandhinagar gets a four-month run so trends have a shape; the
            // others carry the latest month only.
            let rows: [(i32, i32, u32, i64, i64, f64, i64); 6] = [
                (1, 2025, 6, 2_310_000, 54_000, 228.0, 118_200),
                (1, 2025, 7, 2_365_000, 55_500, 231.0, 120_900),
                (1, 2025, 8, 2_440_000, 56_800, 233.0, 123_100),
                (1, 2025, 9, 2_510_000, 58_000, 235.0, 125_480),
                (2, 2025, 9, 2_480_000, 62_000, 240.0, 142_000),
                (3, 2025, 9, 920_000, 23_000, 210.0, 45_000),
            ];
            for (district, year, month, person_days, households, avg_wage, beneficiaries) in rows
            {
                if let Ok(period) = YearMonth::try_new(year, month) {
                    inner.metrics.push(NewMonthlyMetric {
                        district_id: DistrictId::new(district),
                        period,
                        person_days,
                        households,
                        avg_wage,
                        beneficiaries,
                        extra: None,
                        source_updated_at: Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single(),
                    });
                }
            }
        }
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the recorded sync log entries, oldest first.
    #[must_use]
    pub fn sync_log_entries(&self) -> Vec<SyncLogEntry> {
        self.read().sync_log.clone()
    }

    fn state_of(inner: &Inner, district: DistrictId) -> Option<String> {
        inner
            .districts
            .iter()
            .find(|d| d.id == district)
            .map(|d| d.state.clone())
    }

    fn period_rows<'a>(
        inner: &'a Inner,
        state: &str,
        period: YearMonth,
    ) -> Vec<&'a NewMonthlyMetric> {
        inner
            .metrics
            .iter()
            .filter(|m| {
                m.period == period
                    && Self::state_of(inner, m.district_id).as_deref() == Some(state)
            })
            .collect()
    }
}

#[async_trait]
impl DistrictRepository for InMemoryStore {
    async fn list_by_state(
        &self,
        state: &str,
    ) -> Result<Vec<District>, DistrictRepositoryError> {
        let mut districts: Vec<District> = self
            .read()
            .districts
            .iter()
            .filter(|d| d.state == state)
            .cloned()
            .collect();
        districts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(districts)
    }

    async fn find_by_id(
        &self,
        id: DistrictId,
    ) -> Result<Option<District>, DistrictRepositoryError> {
        Ok(self.read().districts.iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<District>, DistrictRepositoryError> {
        Ok(self
            .read()
            .districts
            .iter()
            .find(|d| d.code == code)
            .cloned())
    }

    async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<District>, DistrictRepositoryError> {
        Ok(self
            .read()
            .districts
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn all_with_centroids(&self) -> Result<Vec<District>, DistrictRepositoryError> {
        let mut districts: Vec<District> = self
            .read()
            .districts
            .iter()
            .filter(|d| d.centroid.is_some())
            .cloned()
            .collect();
        districts.sort_by_key(|d| d.id);
        Ok(districts)
    }

    async fn count(&self) -> Result<u64, DistrictRepositoryError> {
        Ok(self.read().districts.len() as u64)
    }

    async fn insert(
        &self,
        district: &NewDistrict,
    ) -> Result<DistrictId, DistrictRepositoryError> {
        let mut inner = self.write();
        if inner.districts.iter().any(|d| d.code == district.code) {
            return Err(DistrictRepositoryError::query(format!(
                "district code {} already exists",
                district.code
            )));
        }
        let id = DistrictId::new(inner.next_district_id);
        inner.next_district_id += 1;
        inner.districts.push(District {
            id,
            state: district.state.clone(),
            code: district.code.clone(),
            name: district.name.clone(),
            name_hindi: district.name_hindi.clone(),
            centroid: district.centroid,
        });
        Ok(id)
    }

    async fn remove(&self, id: DistrictId) -> Result<bool, DistrictRepositoryError> {
        let mut inner = self.write();
        let before = inner.districts.len();
        inner.districts.retain(|d| d.id != id);
        let removed = inner.districts.len() != before;
        if removed {
            // Cascade, as the foreign key would.
            inner.metrics.retain(|m| m.district_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl MetricsRepository for InMemoryStore {
    async fn latest_snapshot(
        &self,
        district: DistrictId,
    ) -> Result<Option<MonthlySnapshot>, MetricsRepositoryError> {
        Ok(self
            .read()
            .metrics
            .iter()
            .filter(|m| m.district_id == district)
            .max_by_key(|m| m.period)
            .map(|m| MonthlySnapshot {
                period: m.period,
                person_days: m.person_days,
                households: m.households,
                avg_wage: m.avg_wage,
                beneficiaries: m.beneficiaries,
                source_updated_at: m.source_updated_at,
            }))
    }

    async fn trend(
        &self,
        district: DistrictId,
        window_months: u32,
    ) -> Result<Vec<TrendPoint>, MetricsRepositoryError> {
        let mut points: Vec<TrendPoint> = self
            .read()
            .metrics
            .iter()
            .filter(|m| m.district_id == district)
            .map(|m| TrendPoint {
                period: m.period,
                person_days: m.person_days,
                avg_wage: m.avg_wage,
            })
            .collect();
        points.sort_by_key(|p| p.period);
        let excess = points.len().saturating_sub(window_months as usize);
        Ok(points.split_off(excess))
    }

    async fn state_average_person_days(
        &self,
        state: &str,
        period: YearMonth,
    ) -> Result<Option<f64>, MetricsRepositoryError> {
        let inner = self.read();
        let rows = Self::period_rows(&inner, state, period);
        if rows.is_empty() {
            return Ok(None);
        }
        let total: i64 = rows.iter().map(|m| m.person_days).sum();
        Ok(Some(total as f64 / rows.len() as f64))
    }

    async fn rank_by_person_days(
        &self,
        district: DistrictId,
        state: &str,
        period: YearMonth,
    ) -> Result<Option<(u32, u32)>, MetricsRepositoryError> {
        let inner = self.read();
        let mut rows = Self::period_rows(&inner, state, period);
        rows.sort_by(|a, b| b.person_days.cmp(&a.person_days));
        let total = rows.len() as u32;
        Ok(rows
            .iter()
            .position(|m| m.district_id == district)
            .map(|idx| (idx as u32 + 1, total)))
    }

    async fn append(&self, record: &NewMonthlyMetric) -> Result<(), MetricsRepositoryError> {
        let mut inner = self.write();
        if !inner.districts.iter().any(|d| d.id == record.district_id) {
            return Err(MetricsRepositoryError::query(format!(
                "district {} does not exist",
                record.district_id
            )));
        }
        if inner
            .metrics
            .iter()
            .any(|m| m.district_id == record.district_id && m.period == record.period)
        {
            return Err(MetricsRepositoryError::duplicate(
                record.district_id,
                record.period,
            ));
        }
        inner.metrics.push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl SyncLogRepository for InMemoryStore {
    async fn record(&self, entry: &SyncLogEntry) -> Result<(), SyncLogError> {
        self.write().sync_log.push(entry.clone());
        Ok(())
    }
}
