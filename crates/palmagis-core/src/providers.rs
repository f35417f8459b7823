//! Static geocoding provider registry, loaded once at process start.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// The geocoding services the resolver knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Address-precise commercial geocoder; also serves the places search.
    GoogleMaps,
    /// Free-text OSM-backed geocoder with location bias.
    Photon,
    /// Open-data geocoder queried through the multi-strategy ladder.
    Nominatim,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [Self::GoogleMaps, Self::Photon, Self::Nominatim];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoogleMaps => "google_maps",
            Self::Photon => "photon",
            Self::Nominatim => "nominatim",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-provider static settings from the registry file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub enabled: bool,
    /// Lower is tried first among the non-contractual tail of the chain.
    pub priority: u32,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    providers: RegistryEntries,
}

#[derive(Debug, Deserialize)]
struct RegistryEntries {
    google_maps: ProviderSettings,
    photon: ProviderSettings,
    nominatim: ProviderSettings,
}

/// The full provider registry. Immutable after load; runtime enable/disable
/// lives in the resolver, not here.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    google_maps: ProviderSettings,
    photon: ProviderSettings,
    nominatim: ProviderSettings,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self {
            google_maps: ProviderSettings {
                enabled: true,
                priority: 1,
            },
            nominatim: ProviderSettings {
                enabled: true,
                priority: 2,
            },
            photon: ProviderSettings {
                enabled: true,
                priority: 3,
            },
        }
    }
}

impl ProviderRegistry {
    /// Load the registry from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ProviderRegistry`] if the file cannot be read
    /// or does not parse.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ProviderRegistry {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml(&raw).map_err(|reason| ConfigError::ProviderRegistry {
            path: path.display().to_string(),
            reason,
        })
    }

    fn from_yaml(raw: &str) -> Result<Self, String> {
        let file: RegistryFile = serde_yaml::from_str(raw).map_err(|e| e.to_string())?;
        Ok(Self {
            google_maps: file.providers.google_maps,
            photon: file.providers.photon,
            nominatim: file.providers.nominatim,
        })
    }

    #[must_use]
    pub const fn settings(&self, kind: ProviderKind) -> ProviderSettings {
        match kind {
            ProviderKind::GoogleMaps => self.google_maps,
            ProviderKind::Photon => self.photon,
            ProviderKind::Nominatim => self.nominatim,
        }
    }
}
