//! Outbound ports of the domain.
//!
//! Each port pairs a trait with its error enum; adapters live under
//! `outbound`. Deterministic fixture implementations sit beside the traits so
//! tests and the no-database server mode need no I/O.

mod cache;
mod district_repository;
mod geolocation;
mod memory;
mod metrics_repository;
mod sync_log;

pub use cache::{
    CachedSelection, DEFAULT_LOCATION_TTL, LAST_SELECTION_KEY, LAST_SELECTION_TTL,
    SelectionCache, ip_cache_key,
};
pub use district_repository::{DistrictRepository, DistrictRepositoryError};
pub use geolocation::{
    FixtureIpGeolocationSource, IpGeolocationError, IpGeolocationSource, IpLocality,
};
pub use memory::InMemoryStore;
pub use metrics_repository::{MetricsRepository, MetricsRepositoryError};
pub use sync_log::{SyncLogEntry, SyncLogError, SyncLogRepository, SyncStatus};
