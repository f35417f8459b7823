//! Great-circle distance between WGS84 coordinate pairs.

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two points.
///
/// Pure and total: NaN or out-of-range inputs propagate NaN rather than
/// erroring. Symmetric, and zero when both points are identical.
#[must_use]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const PALMA_LAT: f64 = 39.5696;
    const PALMA_LON: f64 = 2.6502;

    #[test]
    fn identical_points_have_zero_distance() {
        assert_eq!(distance_km(PALMA_LAT, PALMA_LON, PALMA_LAT, PALMA_LON), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = distance_km(39.5696, 2.6502, 39.8, 3.0);
        let back = distance_km(39.8, 3.0, 39.5696, 2.6502);
        assert!(
            (there - back).abs() < 1e-9,
            "expected symmetric distance, got {there} vs {back}"
        );
    }

    #[test]
    fn tenth_of_a_degree_of_latitude_is_about_11_km() {
        let d = distance_km(PALMA_LAT, PALMA_LON, PALMA_LAT + 0.1, PALMA_LON);
        let expected = 11.12;
        assert!(
            (d - expected).abs() / expected < 0.005,
            "expected ~{expected} km within 0.5%, got {d}"
        );
    }

    #[test]
    fn nan_inputs_propagate_nan() {
        assert!(distance_km(f64::NAN, 2.6502, 39.5696, 2.6502).is_nan());
    }
}
