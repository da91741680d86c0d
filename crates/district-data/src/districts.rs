//! Static district directory for Gujarat.
//!
//! Codes follow the `GJnn` convention used by the upstream dataset. Centroids
//! are representative points, not administrative boundaries; household counts
//! are census-derived baselines used to scale demo metrics.

use serde::Serialize;

/// State covered by the bundled directory.
pub const STATE_NAME: &str = "Gujarat";

/// One district row ready for seeding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistrictSeed {
    /// Stable external code, unique across the directory.
    pub code: &'static str,
    /// Human-readable district name.
    pub name: &'static str,
    /// Hindi rendering of the district name.
    pub name_hindi: &'static str,
    /// Centroid latitude in decimal degrees.
    pub latitude: f64,
    /// Centroid longitude in decimal degrees.
    pub longitude: f64,
    /// Baseline number of rural households, used to scale demo metrics.
    pub households: u32,
}

const fn district(
    code: &'static str,
    name: &'static str,
    name_hindi: &'static str,
    latitude: f64,
    longitude: f64,
    households: u32,
) -> DistrictSeed {
    DistrictSeed {
        code,
        name,
        name_hindi,
        latitude,
        longitude,
        households,
    }
}

static GUJARAT: [DistrictSeed; 33] = [
    district("GJ01", "Ahmedabad", "अहमदाबाद", 23.0225, 72.5714, 1_200_000),
    district("GJ02", "Amreli", "अमरेली", 21.6000, 71.2000, 240_000),
    district("GJ03", "Anand", "आनंद", 22.5600, 72.9500, 330_000),
    district("GJ04", "Aravalli", "अरवल्ली", 23.5000, 73.0000, 170_000),
    district("GJ05", "Banaskantha", "बनासकांठा", 24.2500, 72.5000, 500_000),
    district("GJ06", "Bharuch", "भरूच", 21.7000, 72.9667, 250_000),
    district("GJ07", "Bhavnagar", "भावनगर", 21.7667, 72.1500, 460_000),
    district("GJ08", "Botad", "बोटाद", 22.1700, 71.6700, 105_000),
    district("GJ09", "Chhota Udaipur", "छोटा उदयपुर", 22.3200, 74.0000, 170_000),
    district("GJ10", "Dahod", "दाहोद", 22.8300, 74.2600, 340_000),
    district("GJ11", "Dang", "डांग", 20.7500, 73.7500, 36_000),
    district(
        "GJ12",
        "Devbhoomi Dwarka",
        "देवभूमि द्वारका",
        22.2400,
        69.6500,
        120_000,
    ),
    district("GJ13", "Gandhinagar", "गांधीनगर", 23.2200, 72.6500, 220_000),
    district("GJ14", "Gir Somnath", "गिर सोमनाथ", 20.9100, 70.3700, 195_000),
    district("GJ15", "Jamnagar", "जामनगर", 22.4700, 70.0700, 345_000),
    district("GJ16", "Junagadh", "जूनागढ़", 21.5200, 70.4700, 440_000),
    district("GJ17", "Kheda", "खेड़ा", 22.7500, 72.6833, 370_000),
    district("GJ18", "Kutch", "कच्छ", 23.7000, 70.9000, 335_000),
    district("GJ19", "Mahisagar", "महिसागर", 23.1000, 73.3500, 160_000),
    district("GJ20", "Mehsana", "मेहसाणा", 23.6000, 72.4000, 325_000),
    district("GJ21", "Morbi", "मोरबी", 22.8200, 70.8400, 155_000),
    district("GJ22", "Narmada", "नर्मदा", 21.8700, 73.5000, 95_000),
    district("GJ23", "Navsari", "नवसारी", 20.9500, 72.9300, 210_000),
    district("GJ24", "Panchmahal", "पंचमहल", 22.7500, 73.6000, 380_000),
    district("GJ25", "Patan", "पाटन", 23.8500, 72.1300, 215_000),
    district("GJ26", "Porbandar", "पोरबंदर", 21.6400, 69.6000, 95_000),
    district("GJ27", "Rajkot", "राजकोट", 22.3000, 70.7833, 610_000),
    district("GJ28", "Sabarkantha", "साबरकांठा", 23.5000, 73.0000, 390_000),
    district("GJ29", "Surat", "सूरत", 21.1700, 72.8300, 970_000),
    district(
        "GJ30",
        "Surendranagar",
        "सुरेंद्रनगर",
        22.7200,
        71.6500,
        280_000,
    ),
    district("GJ31", "Tapi", "तापी", 21.1200, 73.4000, 130_000),
    district("GJ32", "Vadodara", "वडोदरा", 22.3000, 73.2000, 665_000),
    district("GJ33", "Valsad", "वलसाड", 20.3800, 72.9000, 270_000),
];

/// Return the full Gujarat district directory in code order.
#[must_use]
pub const fn gujarat_districts() -> &'static [DistrictSeed] {
    &GUJARAT
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn codes_are_unique() {
        let codes: HashSet<&str> = gujarat_districts().iter().map(|d| d.code).collect();
        assert_eq!(codes.len(), gujarat_districts().len());
    }

    #[rstest]
    fn centroids_are_plausible_for_gujarat() {
        for d in gujarat_districts() {
            assert!(
                (20.0..=25.0).contains(&d.latitude),
                "{} latitude out of range",
                d.code
            );
            assert!(
                (68.0..=75.0).contains(&d.longitude),
                "{} longitude out of range",
                d.code
            );
        }
    }
}
