//! Nominatim adapter — open-data geocoding through a query-narrowing
//! strategy ladder.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use palmagis_core::{Coordinates, GeocodeQuery, GeocodeResult};

use crate::error::GeocodeError;
use crate::query::{self, REGION_BROAD, REGION_FULL, REGION_MINIMAL};
use crate::relevance::{pick_best, Candidate, REGION_KEYWORDS};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";
const SEARCH_PATH: &str = "search";

/// Bounding box covering Mallorca, passed as `viewbox` with `bounded=1`.
const VIEWBOX: &str = "2.5,39.3,3.2,39.9";

/// Client for the Nominatim (OpenStreetMap) search API. Keyless.
pub struct NominatimClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

impl NominatimClient {
    /// Creates a client pointed at the public Nominatim instance.
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
            // Nominatim's usage policy requires an identifying user agent.
            .user_agent("palmagis/0.1 (gis-inventory)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| GeocodeError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Resolve an address query through the strategy ladder.
    ///
    /// Four compositions are tried in strict descending specificity,
    /// stopping at the first that yields a result. Free-tier matching gets
    /// sparser the more compound the query is, so each step trades
    /// precision for recall; the relevance filter guards against clearly
    /// wrong-region matches on the looser steps. Compositions whose
    /// distinguishing input is absent are skipped.
    pub async fn resolve(&self, query: &GeocodeQuery) -> GeocodeResult {
        if !query.has_address() {
            return GeocodeResult::Unresolved;
        }

        let address = query.address.trim();

        for search in Self::compositions(query, address) {
            tracing::debug!(identifier = %query.identifier, %search, "nominatim geocode");
            if let Some(coordinates) = self.try_search(query, &search).await {
                return GeocodeResult::Resolved(coordinates);
            }
        }

        GeocodeResult::Unresolved
    }

    /// The strategy ladder, most specific first.
    fn compositions(query: &GeocodeQuery, address: &str) -> Vec<String> {
        let mut searches = Vec::with_capacity(4);

        if let Some(label) = query::stop_label(query, "Parada bus") {
            searches.push(query::join_terms([label.as_str(), address, REGION_FULL]));
        }
        if let Some(description) = query.description_trimmed() {
            searches.push(query::join_terms([description, address, REGION_BROAD]));
        }
        searches.push(query::join_terms([address, REGION_BROAD]));
        searches.push(query::join_terms([address, REGION_MINIMAL]));

        searches
    }

    /// One ladder step: a single GET, parsed and relevance-filtered.
    /// Transport and parse failures are absorbed as "no result for this
    /// step" so the ladder can keep descending.
    async fn try_search(&self, query: &GeocodeQuery, search: &str) -> Option<Coordinates> {
        let mut url = self
            .base_url
            .join(SEARCH_PATH)
            .unwrap_or_else(|_| self.base_url.clone());
        url.query_pairs_mut()
            .append_pair("q", search)
            .append_pair("format", "json")
            .append_pair("limit", "3")
            .append_pair("countrycodes", "es")
            .append_pair("addressdetails", "1")
            .append_pair("bounded", "1")
            .append_pair("viewbox", VIEWBOX);

        let hits = match self.request_json(&url).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(identifier = %query.identifier, error = %e, "nominatim request failed");
                return None;
            }
        };

        let candidates: Vec<Candidate> = hits
            .into_iter()
            .filter_map(|hit| {
                let lat = hit.lat.parse::<f64>().ok()?;
                let lon = hit.lon.parse::<f64>().ok()?;
                Some(Candidate {
                    text: hit.display_name,
                    coordinates: Coordinates::new(lat, lon),
                })
            })
            .collect();

        pick_best(&candidates, &REGION_KEYWORDS)
    }

    async fn request_json(&self, url: &Url) -> Result<Vec<NominatimHit>, reqwest::Error> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        response.json::<Vec<NominatimHit>>().await
    }
}
