use serde::{Deserialize, Serialize};

mod app_config;
pub mod category;
mod config;
pub mod geo;
pub mod providers;

pub use app_config::{AppConfig, Environment};
pub use category::PlaceCategory;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use providers::{ProviderKind, ProviderRegistry, ProviderSettings};

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Input to one address resolution attempt.
///
/// `identifier` is the stop/placement number and is used only for log
/// correlation; `description` is the free-text placement label. Resolution
/// is driven by `address` — a blank address is not resolvable.
#[derive(Debug, Clone)]
pub struct GeocodeQuery {
    pub identifier: String,
    pub description: Option<String>,
    pub address: String,
}

impl GeocodeQuery {
    #[must_use]
    pub fn new(
        identifier: impl Into<String>,
        description: Option<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            description,
            address: address.into(),
        }
    }

    /// Whether the query carries a non-blank address.
    #[must_use]
    pub fn has_address(&self) -> bool {
        !self.address.trim().is_empty()
    }

    /// The trimmed description, if present and non-blank.
    #[must_use]
    pub fn description_trimmed(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// Outcome of a resolution attempt. Binary: there is no partial or
/// uncertain state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeocodeResult {
    Resolved(Coordinates),
    Unresolved,
}

impl GeocodeResult {
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    #[must_use]
    pub const fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::Resolved(c) => Some(*c),
            Self::Unresolved => None,
        }
    }
}

/// A point of interest returned by the places search. Ephemeral — never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub rating: Option<f64>,
    pub vicinity: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_address_is_detected() {
        let query = GeocodeQuery::new("P-104", None, "   ");
        assert!(!query.has_address());

        let query = GeocodeQuery::new("P-104", None, "Carrer Aragó 22");
        assert!(query.has_address());
    }

    #[test]
    fn blank_description_is_treated_as_absent() {
        let query = GeocodeQuery::new("P-104", Some("  ".to_string()), "Carrer Aragó 22");
        assert_eq!(query.description_trimmed(), None);

        let query = GeocodeQuery::new("P-104", Some(" Plaça Espanya ".to_string()), "x");
        assert_eq!(query.description_trimmed(), Some("Plaça Espanya"));
    }

    #[test]
    fn geocode_result_exposes_coordinates_only_when_resolved() {
        let resolved = GeocodeResult::Resolved(Coordinates::new(39.5696, 2.6502));
        assert!(resolved.is_resolved());
        assert_eq!(
            resolved.coordinates(),
            Some(Coordinates::new(39.5696, 2.6502))
        );

        assert!(!GeocodeResult::Unresolved.is_resolved());
        assert_eq!(GeocodeResult::Unresolved.coordinates(), None);
    }
}
