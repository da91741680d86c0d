//! District employment metrics dashboard backend.
//!
//! Serves district reference data and monthly employment-scheme metrics over
//! a REST API, resolves a citizen's district from coordinates or client IP,
//! and aggregates dashboard views (latest snapshot, trend, state
//! comparison) all-or-nothing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(feature = "district-data")]
pub mod seed;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
