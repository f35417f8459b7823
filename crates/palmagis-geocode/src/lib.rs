//! Geocoding resolution engine.
//!
//! Turns free-text Mallorca addresses into WGS84 coordinate pairs by
//! orchestrating three external providers in a fixed fallback order:
//! Google Maps (address-precise) first, Nominatim through a query-narrowing
//! strategy ladder second, then the remaining enabled providers by
//! configured priority. Adapters absorb their own transport and parse
//! failures — the fallback chain is the error recovery mechanism, so a
//! provider problem is only ever an unresolved step, never an exception.

mod error;
mod google;
mod nearby;
mod nominatim;
mod photon;
pub mod query;
mod relevance;
mod resolver;
mod state;

pub use error::GeocodeError;
pub use google::GoogleMapsClient;
pub use nearby::{
    rank_candidates, rank_records_by_candidates, rank_records_near_point, validate_radius_km,
    NearbyRecord, RadiusError, RankedCandidate, RankedRecord, MAX_RADIUS_KM,
};
pub use nominatim::NominatimClient;
pub use photon::PhotonClient;
pub use relevance::{pick_best, Candidate, REGION_KEYWORDS};
pub use resolver::{ProviderDiagnostic, Resolver};
pub use state::ResolverState;
