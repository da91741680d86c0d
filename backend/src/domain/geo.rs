//! Great-circle geometry over district centroids.

use crate::domain::district::{Coordinates, District};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometres.
///
/// # Examples
///
/// ```
/// use darpan_backend::domain::{Coordinates, haversine_km};
///
/// let gandhinagar = Coordinates::try_new(23.2156, 72.6369).expect("valid");
/// let surat = Coordinates::try_new(21.1702, 72.8311).expect("valid");
/// let distance = haversine_km(gandhinagar, surat);
/// assert!((220.0..=240.0).contains(&distance));
/// ```
#[must_use]
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat_a = a.latitude().to_radians();
    let lat_b = b.latitude().to_radians();
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Select the district whose centroid is nearest to `target`.
///
/// Districts without centroid data are skipped. Equidistant candidates are
/// broken deterministically in favour of the lowest district id. Returns
/// `None` when no district carries a centroid.
#[must_use]
pub fn nearest_district<'a>(
    target: Coordinates,
    districts: &'a [District],
) -> Option<(&'a District, f64)> {
    let mut best: Option<(&'a District, f64)> = None;
    for district in districts {
        let Some(centroid) = district.centroid else {
            continue;
        };
        let distance = haversine_km(target, centroid);
        best = match best {
            None => Some((district, distance)),
            Some((current, current_distance)) => {
                let closer = distance < current_distance
                    || (distance == current_distance && district.id < current.id);
                if closer {
                    Some((district, distance))
                } else {
                    Some((current, current_distance))
                }
            }
        };
    }
    best
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::district::DistrictId;

    fn district(id: i32, name: &str, centroid: Option<(f64, f64)>) -> District {
        District {
            id: DistrictId::new(id),
            state: "Gujarat".to_owned(),
            code: format!("GJ{id:02}"),
            name: name.to_owned(),
            name_hindi: None,
            centroid: centroid
                .map(|(lat, lon)| Coordinates::try_new(lat, lon).expect("valid centroid")),
        }
    }

    #[rstest]
    fn distance_is_symmetric() {
        let a = Coordinates::try_new(23.2156, 72.6369).expect("valid");
        let b = Coordinates::try_new(21.6417, 69.6042).expect("valid");
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[rstest]
    fn distance_to_self_is_zero() {
        let a = Coordinates::try_new(22.3, 70.78).expect("valid");
        assert!(haversine_km(a, a).abs() < 1e-9);
    }

    #[rstest]
    fn centroid_resolves_to_its_own_district() {
        let districts = vec![
            district(1, "Gandhinagar", Some((23.2156, 72.6369))),
            district(2, "Surat", Some((21.1702, 72.8311))),
            district(3, "Porbandar", Some((21.6417, 69.6042))),
        ];
        for expected in &districts {
            let centroid = expected.centroid.expect("fixture has centroid");
            let (found, distance) =
                nearest_district(centroid, &districts).expect("match exists");
            assert_eq!(found.id, expected.id);
            assert!(distance.abs() < 1e-9);
        }
    }

    #[rstest]
    fn nearby_point_resolves_to_closest_centroid() {
        let districts = vec![
            district(1, "Gandhinagar", Some((23.2156, 72.6369))),
            district(2, "Surat", Some((21.1702, 72.8311))),
        ];
        let point = Coordinates::try_new(23.21, 72.64).expect("valid");
        let (found, _) = nearest_district(point, &districts).expect("match exists");
        assert_eq!(found.id, DistrictId::new(1));
    }

    #[rstest]
    fn ties_break_to_lowest_id() {
        // Two districts sharing one centroid are exactly equidistant from
        // any probe point.
        let districts = vec![
            district(7, "Aravalli", Some((23.5, 73.0))),
            district(2, "Sabarkantha", Some((23.5, 73.0))),
        ];
        let point = Coordinates::try_new(23.0, 73.0).expect("valid");
        let (found, _) = nearest_district(point, &districts).expect("match exists");
        assert_eq!(found.id, DistrictId::new(2));
    }

    #[rstest]
    fn skips_districts_without_centroids() {
        let districts = vec![
            district(1, "Unknown", None),
            district(2, "Surat", Some((21.1702, 72.8311))),
        ];
        let point = Coordinates::try_new(23.0, 72.0).expect("valid");
        let (found, _) = nearest_district(point, &districts).expect("match exists");
        assert_eq!(found.id, DistrictId::new(2));
    }

    #[rstest]
    fn returns_none_when_no_centroids_exist() {
        let districts = vec![district(1, "Unknown", None)];
        let point = Coordinates::try_new(23.0, 72.0).expect("valid");
        assert!(nearest_district(point, &districts).is_none());
    }
}
