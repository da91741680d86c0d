//! HTTP inbound adapter exposing the REST endpoints.

pub mod dashboard;
pub mod districts;
pub mod error;
pub mod health;
pub mod location;
pub mod state;
pub mod validation;

pub use error::{ApiError, ApiResult};
