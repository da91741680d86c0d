//! Location resolution HTTP handlers.
//!
//! ```text
//! GET /api/geolocation
//! GET /api/detect-location
//! ```
//!
//! Resolution misses are expected alternate paths, not errors: both
//! endpoints answer `{"success": false}` so the consumer can fall back to
//! manual district selection.

use std::net::IpAddr;

use actix_web::{HttpRequest, get, web};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{ErrorCode, ResolvedDistrict};
use crate::inbound::http::districts::CoordsQuery;
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_point;

/// Outcome payload of a location resolution attempt.
#[derive(Debug, Serialize, ToSchema)]
pub struct LocationResponse {
    /// Whether a district was matched.
    pub success: bool,
    /// Code of the matched district.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_code: Option<String>,
    /// Name of the matched district.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_name: Option<String>,
    /// Hindi name of the matched district, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_name_hindi: Option<String>,
}

impl LocationResponse {
    fn matched(resolved: ResolvedDistrict) -> Self {
        Self {
            success: true,
            district_code: Some(resolved.code),
            district_name: Some(resolved.name),
            district_name_hindi: resolved.name_hindi,
        }
    }

    const fn unresolved() -> Self {
        Self {
            success: false,
            district_code: None,
            district_name: None,
            district_name_hindi: None,
        }
    }
}

/// Map a resolution outcome onto the wire payload, downgrading the expected
/// miss conditions to `{"success": false}`.
fn into_response(
    outcome: Result<ResolvedDistrict, crate::domain::Error>,
) -> ApiResult<web::Json<LocationResponse>> {
    match outcome {
        Ok(resolved) => Ok(web::Json(LocationResponse::matched(resolved))),
        Err(err) if matches!(err.code(), ErrorCode::NotFound | ErrorCode::Unavailable) => {
            debug!(reason = err.message(), "location unresolved");
            Ok(web::Json(LocationResponse::unresolved()))
        }
        Err(err) => Err(ApiError::from(err)),
    }
}

/// Resolve a district from browser-supplied coordinates.
#[utoipa::path(
    get,
    path = "/api/geolocation",
    params(CoordsQuery),
    responses(
        (status = 200, description = "Resolution outcome", body = LocationResponse),
        (status = 400, description = "Invalid coordinates", body = crate::inbound::http::error::ErrorBody)
    ),
    tags = ["location"],
    operation_id = "geolocate"
)]
#[get("/geolocation")]
pub async fn geolocation(
    state: web::Data<HttpState>,
    query: web::Query<CoordsQuery>,
) -> ApiResult<web::Json<LocationResponse>> {
    let point = parse_point(query.lat, query.lon)?;
    into_response(state.resolver.resolve_coordinates(point).await)
}

/// Resolve a district from the client IP.
#[utoipa::path(
    get,
    path = "/api/detect-location",
    responses(
        (status = 200, description = "Resolution outcome", body = LocationResponse)
    ),
    tags = ["location"],
    operation_id = "detectLocation"
)]
#[get("/detect-location")]
pub async fn detect_location(
    state: web::Data<HttpState>,
    request: HttpRequest,
) -> ApiResult<web::Json<LocationResponse>> {
    let Some(ip) = client_ip(&request) else {
        debug!("client ip unavailable, cannot detect location");
        return Ok(web::Json(LocationResponse::unresolved()));
    };
    into_response(state.resolver.resolve_ip(ip).await)
}

/// The district resolved most recently on this instance, when still fresh.
///
/// Consumers call this once at startup to pre-select a district without
/// repeating resolution; the entry expires 24 hours after the resolution
/// that wrote it.
#[utoipa::path(
    get,
    path = "/api/last-selection",
    responses(
        (status = 200, description = "Last selection, when fresh", body = LocationResponse)
    ),
    tags = ["location"],
    operation_id = "lastSelection"
)]
#[get("/last-selection")]
pub async fn last_selection(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<LocationResponse>> {
    match state.resolver.last_selection().await {
        Ok(Some(resolved)) => Ok(web::Json(LocationResponse::matched(resolved))),
        Ok(None) => Ok(web::Json(LocationResponse::unresolved())),
        Err(err) => into_response(Err(err)),
    }
}

/// Best-effort client address: forwarded header first, then the peer socket.
fn client_ip(request: &HttpRequest) -> Option<IpAddr> {
    let info = request.connection_info();
    if let Some(realip) = info.realip_remote_addr() {
        let host = realip
            .parse::<std::net::SocketAddr>()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|_| realip.to_owned());
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Some(ip);
        }
    }
    request.peer_addr().map(|addr| addr.ip())
}
