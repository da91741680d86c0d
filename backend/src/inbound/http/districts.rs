//! District directory HTTP handlers.
//!
//! ```text
//! GET /api/districts
//! GET /api/nearest-district
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::DistrictRepositoryError;
use crate::domain::{District, Error};
use crate::inbound::http::error::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_point;

/// Query parameters for the districts listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct DistrictsQuery {
    /// State to list; defaults to the configured home state.
    pub state: Option<String>,
}

/// One district directory entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct DistrictResponse {
    /// Surrogate identifier.
    pub id: i32,
    /// Human-readable name.
    pub name: String,
    /// State the district belongs to.
    pub state: String,
    /// Stable external code.
    pub code: String,
    /// Centroid latitude, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centroid_lat: Option<f64>,
    /// Centroid longitude, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centroid_lon: Option<f64>,
}

impl From<District> for DistrictResponse {
    fn from(value: District) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            state: value.state,
            code: value.code,
            centroid_lat: value.centroid.map(|c| c.latitude()),
            centroid_lon: value.centroid.map(|c| c.longitude()),
        }
    }
}

/// Coordinate query pair shared by the location endpoints.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CoordsQuery {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

/// Minimal nearest-district payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct NearestDistrictResponse {
    /// Surrogate identifier of the nearest district.
    pub id: i32,
    /// Human-readable name of the nearest district.
    pub name: String,
}

/// List the districts of a state, ordered by name.
#[utoipa::path(
    get,
    path = "/api/districts",
    params(DistrictsQuery),
    responses(
        (status = 200, description = "District directory", body = [DistrictResponse]),
        (status = 503, description = "Directory unavailable", body = crate::inbound::http::error::ErrorBody)
    ),
    tags = ["districts"],
    operation_id = "listDistricts"
)]
#[get("/districts")]
pub async fn list_districts(
    state: web::Data<HttpState>,
    query: web::Query<DistrictsQuery>,
) -> ApiResult<web::Json<Vec<DistrictResponse>>> {
    let target = query.state.as_deref().unwrap_or(&state.home_state);
    let districts = state
        .districts
        .list_by_state(target)
        .await
        .map_err(map_directory_error)?;
    Ok(web::Json(
        districts.into_iter().map(DistrictResponse::from).collect(),
    ))
}

/// Resolve the nearest district to a coordinate pair.
#[utoipa::path(
    get,
    path = "/api/nearest-district",
    params(CoordsQuery),
    responses(
        (status = 200, description = "Nearest district", body = NearestDistrictResponse),
        (status = 400, description = "Invalid coordinates", body = crate::inbound::http::error::ErrorBody),
        (status = 404, description = "No district carries centroid data", body = crate::inbound::http::error::ErrorBody)
    ),
    tags = ["districts"],
    operation_id = "nearestDistrict"
)]
#[get("/nearest-district")]
pub async fn nearest_district(
    state: web::Data<HttpState>,
    query: web::Query<CoordsQuery>,
) -> ApiResult<web::Json<NearestDistrictResponse>> {
    let point = parse_point(query.lat, query.lon)?;
    let resolved = state.resolver.resolve_coordinates(point).await?;
    Ok(web::Json(NearestDistrictResponse {
        id: resolved.id.get(),
        name: resolved.name,
    }))
}

fn map_directory_error(error: DistrictRepositoryError) -> Error {
    match error {
        DistrictRepositoryError::Connection { message } => {
            Error::unavailable(format!("district directory unavailable: {message}"))
        }
        DistrictRepositoryError::Query { message } => {
            Error::internal(format!("district directory error: {message}"))
        }
    }
}
