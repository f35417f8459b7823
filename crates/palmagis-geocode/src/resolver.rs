//! The resolution orchestrator: fixed-order provider fallback with
//! first-success short-circuit.

use std::sync::Arc;

use palmagis_core::{GeocodeQuery, GeocodeResult, ProviderKind, ProviderRegistry};

use crate::error::GeocodeError;
use crate::google::GoogleMapsClient;
use crate::nominatim::NominatimClient;
use crate::photon::PhotonClient;
use crate::state::ResolverState;

/// Outcome of running a single provider in isolation, for the diagnostics
/// endpoint.
#[derive(Debug, Clone)]
pub struct ProviderDiagnostic {
    pub provider: ProviderKind,
    pub result: GeocodeResult,
}

/// Orchestrates the provider chain.
///
/// Contractual order: the address-precise provider first, then the
/// strategy-ladder provider, then any remaining enabled providers by
/// ascending registry priority. Providers run strictly one at a time —
/// there is no fan-out, no consensus, and no cross-request cache; the
/// first resolved result wins.
pub struct Resolver {
    registry: ProviderRegistry,
    state: Arc<ResolverState>,
    google: GoogleMapsClient,
    photon: PhotonClient,
    nominatim: NominatimClient,
}

impl Resolver {
    /// Build a resolver against the production provider endpoints.
    ///
    /// A missing Google API key disables that provider at startup rather
    /// than failing: the rest of the chain still works keyless.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if an underlying HTTP client cannot be
    /// constructed.
    pub fn new(
        registry: ProviderRegistry,
        google_api_key: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, GeocodeError> {
        let state = Arc::new(ResolverState::new(&registry));

        let api_key = match google_api_key {
            Some(key) => key,
            None => {
                if state.is_enabled(ProviderKind::GoogleMaps) {
                    tracing::warn!("GOOGLE_MAPS_API_KEY not set; google_maps provider disabled");
                    state.disable(ProviderKind::GoogleMaps);
                }
                ""
            }
        };

        Ok(Self {
            google: GoogleMapsClient::new(api_key, timeout_secs, Arc::clone(&state))?,
            photon: PhotonClient::new(timeout_secs)?,
            nominatim: NominatimClient::new(timeout_secs)?,
            registry,
            state,
        })
    }

    /// Build a resolver with explicit base URLs (for testing with
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if a client cannot be constructed or a
    /// base URL does not parse.
    pub fn with_base_urls(
        registry: ProviderRegistry,
        google_api_key: &str,
        timeout_secs: u64,
        google_base: &str,
        photon_base: &str,
        nominatim_base: &str,
    ) -> Result<Self, GeocodeError> {
        let state = Arc::new(ResolverState::new(&registry));
        Ok(Self {
            google: GoogleMapsClient::with_base_url(
                google_api_key,
                timeout_secs,
                google_base,
                Arc::clone(&state),
            )?,
            photon: PhotonClient::with_base_url(timeout_secs, photon_base)?,
            nominatim: NominatimClient::with_base_url(timeout_secs, nominatim_base)?,
            registry,
            state,
        })
    }

    /// Shared runtime provider state (circuit-breaker flags).
    #[must_use]
    pub fn state(&self) -> Arc<ResolverState> {
        Arc::clone(&self.state)
    }

    /// The Google client, which also serves the places nearby search.
    #[must_use]
    pub fn google(&self) -> &GoogleMapsClient {
        &self.google
    }

    /// Resolve a query through the full fallback chain.
    ///
    /// A blank address short-circuits to `Unresolved` before any provider
    /// is contacted. Exhausting every enabled provider is a legitimate
    /// terminal state, not an error.
    pub async fn resolve(&self, query: &GeocodeQuery) -> GeocodeResult {
        if !query.has_address() {
            tracing::debug!(identifier = %query.identifier, "blank address, not resolvable");
            return GeocodeResult::Unresolved;
        }

        for kind in self.chain_order() {
            if !self.state.is_enabled(kind) {
                continue;
            }
            let result = self.run_provider(kind, query).await;
            if let GeocodeResult::Resolved(coordinates) = result {
                tracing::info!(
                    identifier = %query.identifier,
                    provider = %kind,
                    latitude = coordinates.latitude,
                    longitude = coordinates.longitude,
                    "address resolved"
                );
                return result;
            }
        }

        tracing::info!(identifier = %query.identifier, "all providers exhausted, address unresolved");
        GeocodeResult::Unresolved
    }

    /// Resolve through the address-precise provider only.
    ///
    /// Used by the nearby search's address mode, which wants one precise
    /// answer or none rather than a best-effort ladder result.
    pub async fn resolve_primary(&self, query: &GeocodeQuery) -> GeocodeResult {
        if !query.has_address() || !self.state.is_enabled(ProviderKind::GoogleMaps) {
            return GeocodeResult::Unresolved;
        }
        self.google.resolve(query).await
    }

    /// Run every enabled provider independently against the same input.
    pub async fn diagnostics(&self, query: &GeocodeQuery) -> Vec<ProviderDiagnostic> {
        let mut outcomes = Vec::new();
        for kind in self.chain_order() {
            if !self.state.is_enabled(kind) {
                continue;
            }
            let result = self.run_provider(kind, query).await;
            outcomes.push(ProviderDiagnostic {
                provider: kind,
                result,
            });
        }
        outcomes
    }

    async fn run_provider(&self, kind: ProviderKind, query: &GeocodeQuery) -> GeocodeResult {
        match kind {
            ProviderKind::GoogleMaps => self.google.resolve(query).await,
            ProviderKind::Nominatim => self.nominatim.resolve(query).await,
            ProviderKind::Photon => self.photon.resolve(query).await,
        }
    }

    /// The contractual chain: precise provider, ladder provider, then the
    /// rest by ascending priority.
    fn chain_order(&self) -> Vec<ProviderKind> {
        let mut order = vec![ProviderKind::GoogleMaps, ProviderKind::Nominatim];
        let mut tail: Vec<ProviderKind> = ProviderKind::ALL
            .into_iter()
            .filter(|kind| !order.contains(kind))
            .collect();
        tail.sort_by_key(|kind| self.registry.settings(*kind).priority);
        order.extend(tail);
        order
    }
}
