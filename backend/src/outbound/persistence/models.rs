//! Diesel row structs for the persistence adapters.
//!
//! Internal implementation details: rows are mapped to domain types inside
//! the repository adapters and never exposed beyond this module's parent.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use super::schema::{districts, monthly_metrics, sync_log};

/// One row of the `districts` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = districts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DistrictRow {
    pub id: i32,
    pub state: String,
    pub district_code: String,
    pub district_name: String,
    pub district_name_hindi: Option<String>,
    pub centroid_lat: Option<f64>,
    pub centroid_lon: Option<f64>,
}

/// Insertable `districts` row used at seeding time.
#[derive(Debug, Insertable)]
#[diesel(table_name = districts)]
pub struct NewDistrictRow<'a> {
    pub state: &'a str,
    pub district_code: &'a str,
    pub district_name: &'a str,
    pub district_name_hindi: Option<&'a str>,
    pub centroid_lat: Option<f64>,
    pub centroid_lon: Option<f64>,
}

/// One row of the `monthly_metrics` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = monthly_metrics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MonthlyMetricRow {
    pub id: i32,
    pub district_id: i32,
    pub year: i32,
    pub month: i32,
    pub person_days: i64,
    pub households: i64,
    pub avg_wage: f64,
    pub beneficiaries: i64,
    pub other_json: Option<Value>,
    pub source_updated_at: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
}

/// Insertable `monthly_metrics` row; `fetched_at` is stamped by the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = monthly_metrics)]
pub struct NewMonthlyMetricRow<'a> {
    pub district_id: i32,
    pub year: i32,
    pub month: i32,
    pub person_days: i64,
    pub households: i64,
    pub avg_wage: f64,
    pub beneficiaries: i64,
    pub other_json: Option<&'a Value>,
    pub source_updated_at: Option<DateTime<Utc>>,
}

/// Insertable `sync_log` row.
#[derive(Debug, Insertable)]
#[diesel(table_name = sync_log)]
pub struct NewSyncLogRow<'a> {
    pub job_name: &'a str,
    pub status: &'a str,
    pub details: Option<&'a str>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
