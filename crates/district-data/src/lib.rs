//! Deterministic district reference data and demo metric generation.
//!
//! This crate carries the static district directory for the supported state
//! (code, name, Hindi name, centroid, household baseline) together with a
//! reproducible generator for demonstration monthly metrics. It is
//! independent of backend domain types to avoid circular dependencies.
//!
//! # Example
//!
//! ```
//! use district_data::{generate_demo_metrics, gujarat_districts};
//!
//! let districts = gujarat_districts();
//! assert_eq!(districts.len(), 33);
//!
//! let metrics = generate_demo_metrics(42, 2025, 9, 6);
//! // Same seed produces identical output.
//! assert_eq!(metrics, generate_demo_metrics(42, 2025, 9, 6));
//! ```

mod districts;
mod generator;

pub use districts::{DistrictSeed, STATE_NAME, gujarat_districts};
pub use generator::{MetricSeed, generate_demo_metrics, trailing_months};
