//! Row types for the `furniture` table.

use chrono::{DateTime, Utc};

/// A row from the `furniture` table — one street installation.
///
/// The coordinate pair is either fully set or fully unset; a legacy
/// `(0, 0)` pair counts as unset (see [`FurnitureRow::has_coordinates`]).
/// A single zero component alongside a non-zero one is a real location.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FurnitureRow {
    pub id: i64,
    pub furniture_no: String,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub stop_type: Option<String>,
    pub cleaning_zone: Option<String>,
    pub operator: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub incident_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FurnitureRow {
    /// Whether the row carries a usable coordinate pair.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        matches!(
            (self.latitude, self.longitude),
            (Some(lat), Some(lon)) if lat != 0.0 || lon != 0.0
        )
    }

    /// The trimmed address, if present and non-blank.
    #[must_use]
    pub fn address_trimmed(&self) -> Option<&str> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(lat: Option<f64>, lon: Option<f64>, address: Option<&str>) -> FurnitureRow {
        FurnitureRow {
            id: 1,
            furniture_no: "1043".to_string(),
            description: Some("Plaça Espanya".to_string()),
            kind: None,
            stop_type: None,
            cleaning_zone: None,
            operator: None,
            address: address.map(ToOwned::to_owned),
            latitude: lat,
            longitude: lon,
            incident_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn null_pair_counts_as_unset() {
        assert!(!row(None, None, None).has_coordinates());
    }

    #[test]
    fn zero_pair_counts_as_unset() {
        assert!(!row(Some(0.0), Some(0.0), None).has_coordinates());
    }

    #[test]
    fn populated_pair_counts_as_set() {
        assert!(row(Some(39.5696), Some(2.6502), None).has_coordinates());
    }

    #[test]
    fn single_zero_component_counts_as_set() {
        // Only the full (0, 0) pair is the legacy unset marker.
        assert!(row(Some(0.0), Some(2.6502), None).has_coordinates());
        assert!(row(Some(39.5696), Some(0.0), None).has_coordinates());
    }

    #[test]
    fn blank_address_is_treated_as_absent() {
        assert_eq!(row(None, None, Some("   ")).address_trimmed(), None);
        assert_eq!(
            row(None, None, Some(" Carrer Aragó 22 ")).address_trimmed(),
            Some("Carrer Aragó 22")
        );
    }
}
