//! The fixed whitelist of place categories accepted by the nearby search.

use serde::{Deserialize, Serialize};

/// A place category code understood by the places-search provider.
///
/// Parsing rejects anything outside this whitelist so that a typo'd
/// category is a validation error rather than a silent empty search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceCategory {
    Restaurant,
    Cafe,
    Bar,
    Pharmacy,
    Hospital,
    School,
    Supermarket,
    Bank,
    Hotel,
    Parking,
    BusStation,
}

impl PlaceCategory {
    pub const ALL: [PlaceCategory; 11] = [
        Self::Restaurant,
        Self::Cafe,
        Self::Bar,
        Self::Pharmacy,
        Self::Hospital,
        Self::School,
        Self::Supermarket,
        Self::Bank,
        Self::Hotel,
        Self::Parking,
        Self::BusStation,
    ];

    /// The wire-format code for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Cafe => "cafe",
            Self::Bar => "bar",
            Self::Pharmacy => "pharmacy",
            Self::Hospital => "hospital",
            Self::School => "school",
            Self::Supermarket => "supermarket",
            Self::Bank => "bank",
            Self::Hotel => "hotel",
            Self::Parking => "parking",
            Self::BusStation => "bus_station",
        }
    }

    /// All category codes, for inclusion in validation error payloads.
    #[must_use]
    pub fn whitelist() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }
}

impl std::fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlaceCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Error for a category code outside the whitelist.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown place category '{0}'")]
pub struct UnknownCategory(pub String);
