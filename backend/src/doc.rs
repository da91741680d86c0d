//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API. The generated document backs Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::inbound::http::dashboard::{
    ComparisonDistrict, ComparisonResponse, DashboardResponse, SnapshotResponse,
    TrendPointResponse,
};
use crate::inbound::http::districts::{DistrictResponse, NearestDistrictResponse};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::location::LocationResponse;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Darpan backend API",
        description = "District employment metrics: directory, location resolution, and dashboard aggregation."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::districts::list_districts,
        crate::inbound::http::districts::nearest_district,
        crate::inbound::http::location::geolocation,
        crate::inbound::http::location::detect_location,
        crate::inbound::http::location::last_selection,
        crate::inbound::http::dashboard::district_latest,
        crate::inbound::http::dashboard::district_trend,
        crate::inbound::http::dashboard::district_compare,
        crate::inbound::http::dashboard::district_dashboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        DistrictResponse,
        NearestDistrictResponse,
        LocationResponse,
        SnapshotResponse,
        TrendPointResponse,
        ComparisonDistrict,
        ComparisonResponse,
        DashboardResponse,
        ErrorBody,
    )),
    tags(
        (name = "districts", description = "District directory and nearest-match resolution"),
        (name = "location", description = "Coordinate and IP location resolution"),
        (name = "dashboard", description = "Monthly metrics, trends, and comparisons"),
        (name = "health", description = "Orchestration probes"),
    )
)]
pub struct ApiDoc;
