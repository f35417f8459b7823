//! Photon adapter — free-text OSM-backed search biased toward Palma.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use palmagis_core::{Coordinates, GeocodeQuery, GeocodeResult};

use crate::error::GeocodeError;
use crate::query::{self, REGION_BROAD};
use crate::relevance::{pick_best, Candidate, REGION_KEYWORDS};

const DEFAULT_BASE_URL: &str = "https://photon.komoot.io/";
const SEARCH_PATH: &str = "api";

/// Bias point for searches: Palma city center.
const BIAS_LAT: &str = "39.5696";
const BIAS_LON: &str = "2.6502";

/// Client for the Photon geocoding API. Keyless, so there is no
/// credential circuit breaker here.
pub struct PhotonClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct PhotonResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: FeatureGeometry,
    #[serde(default)]
    properties: FeatureProperties,
}

#[derive(Debug, Deserialize)]
struct FeatureGeometry {
    /// GeoJSON order: longitude first.
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct FeatureProperties {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

impl PhotonClient {
    /// Creates a client pointed at the public Photon instance.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built,
    /// or [`GeocodeError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("palmagis/0.1 (gis-inventory)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| GeocodeError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Resolve an address query to coordinates.
    ///
    /// Sends one free-text search combining the stop label (when
    /// buildable), the raw address, and the broad region qualifier, then
    /// runs the candidates through the relevance filter. All failures are
    /// absorbed as `Unresolved`.
    pub async fn resolve(&self, query: &GeocodeQuery) -> GeocodeResult {
        if !query.has_address() {
            return GeocodeResult::Unresolved;
        }

        let label = query::stop_label(query, "Parada bus");
        let search = query::join_terms([
            label.as_deref().unwrap_or_default(),
            query.address.as_str(),
            REGION_BROAD,
        ]);

        tracing::debug!(identifier = %query.identifier, %search, "photon geocode");

        let mut url = self
            .base_url
            .join(SEARCH_PATH)
            .unwrap_or_else(|_| self.base_url.clone());
        url.query_pairs_mut()
            .append_pair("q", &search)
            .append_pair("limit", "5")
            .append_pair("lat", BIAS_LAT)
            .append_pair("lon", BIAS_LON);

        let body = match self.request_json(&url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(identifier = %query.identifier, error = %e, "photon request failed");
                return GeocodeResult::Unresolved;
            }
        };

        let candidates: Vec<Candidate> = body
            .features
            .into_iter()
            .filter_map(|feature| {
                let [lon, lat] = feature.geometry.coordinates[..] else {
                    return None;
                };
                let text = query::join_terms([
                    feature.properties.name.as_deref().unwrap_or_default(),
                    feature.properties.city.as_deref().unwrap_or_default(),
                ]);
                Some(Candidate {
                    text,
                    coordinates: Coordinates::new(lat, lon),
                })
            })
            .collect();

        pick_best(&candidates, &REGION_KEYWORDS)
            .map_or(GeocodeResult::Unresolved, GeocodeResult::Resolved)
    }

    async fn request_json(&self, url: &Url) -> Result<PhotonResponse, reqwest::Error> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        response.json::<PhotonResponse>().await
    }
}
