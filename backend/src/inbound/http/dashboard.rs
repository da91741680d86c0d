//! Dashboard HTTP handlers.
//!
//! ```text
//! GET /api/district/{id}/latest
//! GET /api/district/{id}/trend
//! GET /api/district/{id}/compare
//! GET /api/district/{id}/dashboard
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    DashboardView, DistrictId, MonthlySnapshot, StateComparison, TrendPoint,
};
use crate::inbound::http::error::ApiResult;
use crate::inbound::http::state::HttpState;

/// Latest monthly snapshot payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct SnapshotResponse {
    /// Calendar year of the snapshot.
    pub year: i32,
    /// Calendar month of the snapshot.
    pub month: u32,
    /// Total person-days worked.
    pub person_days: i64,
    /// Average daily wage in rupees.
    pub avg_wage: f64,
    /// Individual beneficiaries.
    pub beneficiaries: i64,
    /// Households provided employment.
    pub households: i64,
    /// Upstream source timestamp, RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_updated_at: Option<String>,
}

impl From<MonthlySnapshot> for SnapshotResponse {
    fn from(value: MonthlySnapshot) -> Self {
        Self {
            year: value.period.year,
            month: value.period.month,
            person_days: value.person_days,
            avg_wage: value.avg_wage,
            beneficiaries: value.beneficiaries,
            households: value.households,
            source_updated_at: value.source_updated_at.map(|ts| ts.to_rfc3339()),
        }
    }
}

/// One trend series point.
#[derive(Debug, Serialize, ToSchema)]
pub struct TrendPointResponse {
    /// Calendar year of the point.
    pub year: i32,
    /// Calendar month of the point.
    pub month: u32,
    /// Total person-days worked in the month.
    pub person_days: i64,
    /// Average daily wage in the month.
    pub avg_wage: f64,
}

impl From<TrendPoint> for TrendPointResponse {
    fn from(value: TrendPoint) -> Self {
        Self {
            year: value.period.year,
            month: value.period.month,
            person_days: value.person_days,
            avg_wage: value.avg_wage,
        }
    }
}

/// District-side figures of a comparison.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComparisonDistrict {
    /// District person-days for the compared period.
    pub person_days: i64,
    /// District average wage for the compared period.
    pub avg_wage: f64,
}

/// Comparison of a district against the state average.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComparisonResponse {
    /// Calendar year of the compared period.
    pub year: i32,
    /// Calendar month of the compared period.
    pub month: u32,
    /// District-side figures.
    pub district: ComparisonDistrict,
    /// Mean person-days across the state for the period.
    pub state_avg_person_days: i64,
    /// District rank by person-days, 1 = highest.
    pub district_rank: u32,
    /// Number of districts ranked.
    pub total_districts: u32,
    /// Percentage delta of district person-days vs the state average.
    pub person_days_delta_pct: f64,
}

impl From<StateComparison> for ComparisonResponse {
    fn from(value: StateComparison) -> Self {
        Self {
            year: value.period.year,
            month: value.period.month,
            district: ComparisonDistrict {
                person_days: value.district_person_days,
                avg_wage: value.district_avg_wage,
            },
            state_avg_person_days: value.state_avg_person_days,
            district_rank: value.district_rank,
            total_districts: value.total_districts,
            person_days_delta_pct: value.person_days_delta_pct,
        }
    }
}

/// Query parameters for the aggregate dashboard endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct DashboardQuery {
    /// Client selection tag echoed back in the response; consumers discard
    /// responses carrying a tag older than their latest selection.
    pub generation: Option<u64>,
}

/// Aggregate dashboard payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    /// Echoed client selection tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<u64>,
    /// Latest monthly snapshot.
    pub latest: SnapshotResponse,
    /// Trailing trend, oldest to newest.
    pub trend: Vec<TrendPointResponse>,
    /// Comparison against the state average.
    pub comparison: ComparisonResponse,
}

impl From<DashboardView> for DashboardResponse {
    fn from(value: DashboardView) -> Self {
        Self {
            generation: value.generation,
            latest: value.latest.into(),
            trend: value.trend.into_iter().map(Into::into).collect(),
            comparison: value.comparison.into(),
        }
    }
}

/// Latest monthly snapshot for a district.
#[utoipa::path(
    get,
    path = "/api/district/{id}/latest",
    params(("id" = i32, Path, description = "District id")),
    responses(
        (status = 200, description = "Latest snapshot", body = SnapshotResponse),
        (status = 404, description = "No data recorded", body = crate::inbound::http::error::ErrorBody)
    ),
    tags = ["dashboard"],
    operation_id = "districtLatest"
)]
#[get("/district/{id}/latest")]
pub async fn district_latest(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<SnapshotResponse>> {
    let snapshot = state
        .dashboard
        .latest(DistrictId::new(path.into_inner()))
        .await?;
    Ok(web::Json(snapshot.into()))
}

/// Trailing trend series for a district, oldest to newest.
#[utoipa::path(
    get,
    path = "/api/district/{id}/trend",
    params(("id" = i32, Path, description = "District id")),
    responses(
        (status = 200, description = "Trend series", body = [TrendPointResponse])
    ),
    tags = ["dashboard"],
    operation_id = "districtTrend"
)]
#[get("/district/{id}/trend")]
pub async fn district_trend(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Vec<TrendPointResponse>>> {
    let trend = state
        .dashboard
        .trend(DistrictId::new(path.into_inner()))
        .await?;
    Ok(web::Json(trend.into_iter().map(Into::into).collect()))
}

/// Comparison of a district's latest month against the state average.
#[utoipa::path(
    get,
    path = "/api/district/{id}/compare",
    params(("id" = i32, Path, description = "District id")),
    responses(
        (status = 200, description = "State comparison", body = ComparisonResponse),
        (status = 404, description = "District unknown or without data", body = crate::inbound::http::error::ErrorBody)
    ),
    tags = ["dashboard"],
    operation_id = "districtCompare"
)]
#[get("/district/{id}/compare")]
pub async fn district_compare(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<ComparisonResponse>> {
    let comparison = state
        .dashboard
        .compare(DistrictId::new(path.into_inner()))
        .await?;
    Ok(web::Json(comparison.into()))
}

/// Full dashboard view, assembled all-or-nothing.
#[utoipa::path(
    get,
    path = "/api/district/{id}/dashboard",
    params(("id" = i32, Path, description = "District id"), DashboardQuery),
    responses(
        (status = 200, description = "Aggregate dashboard view", body = DashboardResponse),
        (status = 503, description = "Data unavailable", body = crate::inbound::http::error::ErrorBody)
    ),
    tags = ["dashboard"],
    operation_id = "districtDashboard"
)]
#[get("/district/{id}/dashboard")]
pub async fn district_dashboard(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    query: web::Query<DashboardQuery>,
) -> ApiResult<web::Json<DashboardResponse>> {
    let view = state
        .dashboard
        .dashboard(DistrictId::new(path.into_inner()), query.generation)
        .await?;
    Ok(web::Json(view.into()))
}
