//! Distance ranking for the nearby search, independent of any HTTP or
//! database concern.

use palmagis_core::geo::distance_km;
use palmagis_core::{Coordinates, PlaceCandidate};

/// Upper bound on the search radius, in kilometres. Generous for a
/// single-island deployment but keeps runaway radii out of the places API.
pub const MAX_RADIUS_KM: f64 = 50.0;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RadiusError {
    #[error("radius must be a positive number of kilometres, got {0}")]
    NotPositive(f64),
    #[error("radius must be at most {MAX_RADIUS_KM} km, got {0}")]
    TooLarge(f64),
}

/// Validate a requested search radius in kilometres.
///
/// NaN fails the positivity check rather than slipping through the
/// comparisons.
///
/// # Errors
///
/// Returns [`RadiusError`] when the radius is not in `(0, MAX_RADIUS_KM]`.
pub fn validate_radius_km(radius_km: f64) -> Result<(), RadiusError> {
    if radius_km.is_nan() || radius_km <= 0.0 {
        return Err(RadiusError::NotPositive(radius_km));
    }
    if radius_km > MAX_RADIUS_KM {
        return Err(RadiusError::TooLarge(radius_km));
    }
    Ok(())
}

/// A stored record with known coordinates, as fed into the ranking.
#[derive(Debug, Clone)]
pub struct NearbyRecord {
    pub key: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A place candidate annotated with its distance from the reference point.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub place: PlaceCandidate,
    pub distance_km: f64,
}

/// A record that survived the ranking, with its governing distance and the
/// place that anchored it (category mode only).
#[derive(Debug, Clone)]
pub struct RankedRecord {
    pub record: NearbyRecord,
    pub distance_km: f64,
    pub nearest_place: Option<String>,
}

/// Annotate candidates with their distance from `reference` and sort
/// nearest first.
#[must_use]
pub fn rank_candidates(
    reference: Coordinates,
    candidates: Vec<PlaceCandidate>,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|place| {
            let distance_km = distance_km(
                reference.latitude,
                reference.longitude,
                place.latitude,
                place.longitude,
            );
            RankedCandidate { place, distance_km }
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

/// Category mode: keep the records that lie within `radius_km` of at least
/// one candidate place, ranked by their distance to the nearest such place.
///
/// Each surviving record carries the name of the place that anchored it.
/// Records are compared against every candidate, so the cost is
/// records × candidates; both sides are small in practice (a city's worth
/// of records, at most twenty places per search).
#[must_use]
pub fn rank_records_by_candidates(
    records: Vec<NearbyRecord>,
    candidates: &[PlaceCandidate],
    radius_km: f64,
) -> Vec<RankedRecord> {
    let mut ranked: Vec<RankedRecord> = records
        .into_iter()
        .filter_map(|record| {
            let nearest = candidates
                .iter()
                .map(|place| {
                    let d = distance_km(
                        record.latitude,
                        record.longitude,
                        place.latitude,
                        place.longitude,
                    );
                    (d, place)
                })
                .min_by(|a, b| a.0.total_cmp(&b.0))?;
            let (distance_km, place) = nearest;
            if distance_km > radius_km {
                return None;
            }
            Some(RankedRecord {
                record,
                distance_km,
                nearest_place: Some(place.name.clone()),
            })
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

/// Address mode: keep the records within `radius_km` of a single reference
/// point, ranked nearest first.
#[must_use]
pub fn rank_records_near_point(
    records: Vec<NearbyRecord>,
    reference: Coordinates,
    radius_km: f64,
) -> Vec<RankedRecord> {
    let mut ranked: Vec<RankedRecord> = records
        .into_iter()
        .filter_map(|record| {
            let distance_km = distance_km(
                reference.latitude,
                reference.longitude,
                record.latitude,
                record.longitude,
            );
            if distance_km > radius_km {
                return None;
            }
            Some(RankedRecord {
                record,
                distance_km,
                nearest_place: None,
            })
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, lat: f64, lon: f64) -> NearbyRecord {
        NearbyRecord {
            key: key.to_string(),
            name: format!("record {key}"),
            latitude: lat,
            longitude: lon,
        }
    }

    fn place(name: &str, lat: f64, lon: f64) -> PlaceCandidate {
        PlaceCandidate {
            name: name.to_string(),
            latitude: lat,
            longitude: lon,
            category: "pharmacy".to_string(),
            rating: None,
            vicinity: None,
        }
    }

    #[test]
    fn radius_bounds_are_enforced() {
        assert_eq!(validate_radius_km(0.0), Err(RadiusError::NotPositive(0.0)));
        assert_eq!(
            validate_radius_km(-1.0),
            Err(RadiusError::NotPositive(-1.0))
        );
        assert!(matches!(
            validate_radius_km(f64::NAN),
            Err(RadiusError::NotPositive(_))
        ));
        assert_eq!(validate_radius_km(50.0), Ok(()));
        assert_eq!(validate_radius_km(50.1), Err(RadiusError::TooLarge(50.1)));
        assert_eq!(validate_radius_km(0.5), Ok(()));
    }

    #[test]
    fn candidates_are_ranked_nearest_first() {
        let reference = Coordinates::new(39.5696, 2.6502);
        let ranked = rank_candidates(
            reference,
            vec![
                place("far", 39.60, 2.70),
                place("near", 39.57, 2.6502),
                place("mid", 39.58, 2.66),
            ],
        );
        let names: Vec<&str> = ranked.iter().map(|r| r.place.name.as_str()).collect();
        assert_eq!(names, vec!["near", "mid", "far"]);
        assert!(ranked[0].distance_km < ranked[1].distance_km);
    }

    #[test]
    fn category_mode_attaches_anchoring_place_and_drops_distant_records() {
        let candidates = vec![place("Farmacia Centre", 39.5696, 2.6502)];
        // 0.01° of latitude is about 1.1 km.
        let ranked = rank_records_by_candidates(
            vec![
                record("inside", 39.5750, 2.6502),
                record("outside", 39.6700, 2.6502),
            ],
            &candidates,
            1.0,
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].record.key, "inside");
        assert_eq!(ranked[0].nearest_place.as_deref(), Some("Farmacia Centre"));
        assert!(ranked[0].distance_km < 1.0);
    }

    #[test]
    fn category_mode_with_no_candidates_keeps_nothing() {
        let ranked =
            rank_records_by_candidates(vec![record("a", 39.57, 2.65)], &[], 10.0);
        assert!(ranked.is_empty());
    }

    #[test]
    fn address_mode_ranks_around_the_reference_point() {
        let reference = Coordinates::new(39.5696, 2.6502);
        let ranked = rank_records_near_point(
            vec![
                record("far", 39.6100, 2.6502),
                record("near", 39.5710, 2.6502),
                record("outside", 40.0000, 2.6502),
            ],
            reference,
            10.0,
        );
        let keys: Vec<&str> = ranked.iter().map(|r| r.record.key.as_str()).collect();
        assert_eq!(keys, vec!["near", "far"]);
        assert!(ranked.iter().all(|r| r.nearest_place.is_none()));
    }
}
