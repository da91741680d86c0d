//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on domain services and ports, keeping them testable without I/O.

use std::sync::Arc;

use crate::domain::ports::DistrictRepository;
use crate::domain::{DashboardService, LocationResolver};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// District directory read access.
    pub districts: Arc<dyn DistrictRepository>,
    /// Coordinate and IP location resolution.
    pub resolver: Arc<LocationResolver>,
    /// Dashboard aggregation.
    pub dashboard: Arc<DashboardService>,
    /// State used when a districts listing does not name one.
    pub home_state: String,
}

impl HttpState {
    /// Bundle the handler dependencies.
    pub fn new(
        districts: Arc<dyn DistrictRepository>,
        resolver: Arc<LocationResolver>,
        dashboard: Arc<DashboardService>,
        home_state: impl Into<String>,
    ) -> Self {
        Self {
            districts,
            resolver,
            dashboard,
            home_state: home_state.into(),
        }
    }
}
