//! District reference entities.
//!
//! Districts are seeded once at provisioning time and treated as immutable
//! afterwards; metric records reference them but never own them.

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Surrogate identifier of a district row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistrictId(i32);

impl DistrictId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for DistrictId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures for [`Coordinates`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum CoordinatesError {
    /// A component was NaN or infinite.
    #[error("coordinates must be finite")]
    NotFinite,
    /// Latitude outside [-90, 90].
    #[error("latitude must be within [-90, 90]")]
    LatitudeOutOfRange,
    /// Longitude outside [-180, 180].
    #[error("longitude must be within [-180, 180]")]
    LongitudeOutOfRange,
}

/// A validated WGS84 point.
///
/// ## Invariants
/// - Both components are finite.
/// - Latitude lies in [-90, 90], longitude in [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Validate and construct a coordinate pair.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatesError`] when a component is non-finite or out of
    /// range.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinatesError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError::LongitudeOutOfRange);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(self) -> f64 {
        self.longitude
    }
}

/// District reference record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct District {
    /// Surrogate identifier.
    pub id: DistrictId,
    /// State the district belongs to.
    pub state: String,
    /// Stable external code, unique across all districts.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Hindi rendering of the name, when known.
    pub name_hindi: Option<String>,
    /// Representative centroid point, when known.
    pub centroid: Option<Coordinates>,
}

/// District fields supplied at seeding time, before an id is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDistrict {
    /// State the district belongs to.
    pub state: String,
    /// Stable external code.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Hindi rendering of the name, when known.
    pub name_hindi: Option<String>,
    /// Representative centroid point, when known.
    pub centroid: Option<Coordinates>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(91.0, 0.0, CoordinatesError::LatitudeOutOfRange)]
    #[case(-91.0, 0.0, CoordinatesError::LatitudeOutOfRange)]
    #[case(0.0, 181.0, CoordinatesError::LongitudeOutOfRange)]
    #[case(0.0, -181.0, CoordinatesError::LongitudeOutOfRange)]
    #[case(f64::NAN, 0.0, CoordinatesError::NotFinite)]
    #[case(0.0, f64::INFINITY, CoordinatesError::NotFinite)]
    fn rejects_invalid_components(
        #[case] lat: f64,
        #[case] lon: f64,
        #[case] expected: CoordinatesError,
    ) {
        assert_eq!(Coordinates::try_new(lat, lon), Err(expected));
    }

    #[rstest]
    fn accepts_boundary_values() {
        assert!(Coordinates::try_new(90.0, 180.0).is_ok());
        assert!(Coordinates::try_new(-90.0, -180.0).is_ok());
    }
}
