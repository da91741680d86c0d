//! Request input validation helpers.

use serde_json::json;

use crate::domain::{Coordinates, Error};

/// Validate a latitude/longitude query pair.
///
/// # Errors
///
/// Returns [`Error::invalid_request`] naming the offending component when
/// the pair is non-finite or out of range.
pub fn parse_point(lat: f64, lon: f64) -> Result<Coordinates, Error> {
    Coordinates::try_new(lat, lon).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "lat": lat, "lon": lon }))
    })
}
