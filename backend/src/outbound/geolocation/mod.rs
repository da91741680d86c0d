//! Outbound adapter for the external IP-geolocation service.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_LOOKUP_TIMEOUT, GeolocationHttpSource};
