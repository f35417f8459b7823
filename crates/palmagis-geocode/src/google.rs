//! Google Maps adapter: geocoding (address-precise) and places nearby
//! search.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use palmagis_core::{Coordinates, GeocodeQuery, GeocodeResult, PlaceCandidate, PlaceCategory, ProviderKind};

use crate::error::GeocodeError;
use crate::query::{self, REGION_CITY};
use crate::state::ResolverState;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";
const GEOCODE_PATH: &str = "maps/api/geocode/json";
const PLACES_PATH: &str = "maps/api/place/nearbysearch/json";

/// Client for the Google Maps Geocoding and Places APIs.
///
/// Holds a shared handle to the resolver's runtime state so that a
/// credential rejection (`REQUEST_DENIED`) can trip the provider's
/// circuit breaker from inside the adapter.
pub struct GoogleMapsClient {
    client: Client,
    api_key: String,
    base_url: Url,
    state: Arc<ResolverState>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeHit>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceHit>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceHit {
    name: String,
    geometry: Geometry,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    vicinity: Option<String>,
}

impl GoogleMapsClient {
    /// Creates a client pointed at the production Google Maps APIs.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        state: Arc<ResolverState>,
    ) -> Result<Self, GeocodeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL, state)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built,
    /// or [`GeocodeError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
        state: Arc<ResolverState>,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("palmagis/0.1 (gis-inventory)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| GeocodeError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            state,
        })
    }

    /// Resolve an address query to coordinates.
    ///
    /// When the synthetic stop label can be built, the raw address is
    /// deliberately omitted — the label plus the city qualifier keeps the
    /// match anchored to the bus stop itself rather than a nearby house
    /// number. Any transport, parse, or quota problem is logged and
    /// reported as `Unresolved`; a `REQUEST_DENIED` status additionally
    /// disables the provider for the rest of the process lifetime.
    pub async fn resolve(&self, query: &GeocodeQuery) -> GeocodeResult {
        if !query.has_address() {
            return GeocodeResult::Unresolved;
        }

        let search = match query::stop_label(query, "Bus stop") {
            Some(label) => query::join_terms([label.as_str(), REGION_CITY]),
            None => query::join_terms([query.address.as_str(), REGION_CITY]),
        };

        tracing::debug!(identifier = %query.identifier, %search, "google maps geocode");

        let url = self.build_url(
            GEOCODE_PATH,
            &[
                ("address", search.as_str()),
                ("key", &self.api_key),
                ("region", "es"),
                (
                    "components",
                    "country:ES|administrative_area:Islas Baleares",
                ),
            ],
        );

        match self.request_json::<GeocodeResponse>(&url).await {
            Ok(body) => self.interpret_geocode(query, &body),
            Err(e) => {
                tracing::warn!(identifier = %query.identifier, error = %e, "google maps request failed");
                GeocodeResult::Unresolved
            }
        }
    }

    /// Fetch points of interest of `category` within `radius_km` of a point.
    ///
    /// Failures follow the same policy as [`GoogleMapsClient::resolve`]:
    /// logged and degraded, here to an empty candidate list.
    pub async fn search_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        category: PlaceCategory,
        radius_km: f64,
    ) -> Vec<PlaceCandidate> {
        let location = format!("{latitude},{longitude}");
        let radius_m = format!("{:.0}", radius_km * 1000.0);
        let url = self.build_url(
            PLACES_PATH,
            &[
                ("location", location.as_str()),
                ("radius", radius_m.as_str()),
                ("type", category.as_str()),
                ("key", &self.api_key),
            ],
        );

        let body = match self.request_json::<PlacesResponse>(&url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "places request failed");
                return Vec::new();
            }
        };

        if body.status == "REQUEST_DENIED" {
            tracing::warn!(
                error_message = body.error_message.as_deref().unwrap_or_default(),
                "places credentials rejected"
            );
            self.state.disable(ProviderKind::GoogleMaps);
            return Vec::new();
        }
        if body.status != "OK" && body.status != "ZERO_RESULTS" {
            tracing::warn!(status = %body.status, "places search returned error status");
            return Vec::new();
        }

        body.results
            .into_iter()
            .map(|hit| PlaceCandidate {
                name: hit.name,
                latitude: hit.geometry.location.lat,
                longitude: hit.geometry.location.lng,
                category: category.as_str().to_string(),
                rating: hit.rating,
                vicinity: hit.vicinity,
            })
            .collect()
    }

    fn interpret_geocode(&self, query: &GeocodeQuery, body: &GeocodeResponse) -> GeocodeResult {
        if body.status == "REQUEST_DENIED" {
            tracing::warn!(
                identifier = %query.identifier,
                error_message = body.error_message.as_deref().unwrap_or_default(),
                "google maps credentials rejected"
            );
            self.state.disable(ProviderKind::GoogleMaps);
            return GeocodeResult::Unresolved;
        }

        if body.status != "OK" {
            tracing::debug!(identifier = %query.identifier, status = %body.status, "google maps: no result");
            return GeocodeResult::Unresolved;
        }

        body.results.first().map_or(GeocodeResult::Unresolved, |hit| {
            GeocodeResult::Resolved(Coordinates::new(
                hit.geometry.location.lat,
                hit.geometry.location.lng,
            ))
        })
    }

    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self
            .base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &Url,
    ) -> Result<T, reqwest::Error> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        response.json::<T>().await
    }
}
