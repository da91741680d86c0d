//! Domain entities, services, and ports.
//!
//! Everything in this module is transport and storage agnostic: inbound
//! adapters translate HTTP requests into calls on the services here, and
//! outbound adapters implement the [`ports`] traits. Types are strongly
//! typed and document their invariants in Rustdoc.

pub mod dashboard;
pub mod district;
pub mod error;
pub mod geo;
pub mod ingestion;
pub mod location;
pub mod metrics;
pub mod period;
pub mod ports;

pub use self::dashboard::{DEFAULT_TREND_WINDOW_MONTHS, DashboardService, DashboardView};
pub use self::district::{Coordinates, CoordinatesError, District, DistrictId, NewDistrict};
pub use self::error::{Error, ErrorCode};
pub use self::geo::{EARTH_RADIUS_KM, haversine_km, nearest_district};
pub use self::ingestion::{IngestOutcome, MetricRecord, MetricsBatch, MetricsIngestionService};
pub use self::location::{LocationResolver, ResolvedDistrict};
pub use self::metrics::{
    MetricValidationError, MonthlySnapshot, NewMonthlyMetric, StateComparison, TrendPoint,
};
pub use self::period::YearMonth;
