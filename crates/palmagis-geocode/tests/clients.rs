//! Integration tests for the provider adapters using wiremock HTTP mocks.

use std::sync::Arc;

use palmagis_core::{
    GeocodeQuery, GeocodeResult, PlaceCategory, ProviderKind, ProviderRegistry,
};
use palmagis_geocode::{GoogleMapsClient, NominatimClient, PhotonClient, ResolverState};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn shared_state() -> Arc<ResolverState> {
    Arc::new(ResolverState::new(&ProviderRegistry::default()))
}

fn google_client(base_url: &str, state: Arc<ResolverState>) -> GoogleMapsClient {
    GoogleMapsClient::with_base_url("test-key", 30, base_url, state)
        .expect("client construction should not fail")
}

fn stop_query() -> GeocodeQuery {
    GeocodeQuery::new(
        "1043",
        Some("Plaça Espanya".to_string()),
        "Carrer Eusebi Estada 2",
    )
}

#[tokio::test]
async fn google_resolves_first_hit() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "results": [
            {
                "geometry": { "location": { "lat": 39.5763, "lng": 2.6544 } }
            },
            {
                "geometry": { "location": { "lat": 0.0, "lng": 0.0 } }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .and(query_param(
            "address",
            "Bus stop 1043- Plaça Espanya, Palma de Mallorca",
        ))
        .and(query_param("key", "test-key"))
        .and(query_param("region", "es"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = google_client(&server.uri(), shared_state());
    let result = client.resolve(&stop_query()).await;

    let coordinates = result.coordinates().expect("should resolve");
    assert!((coordinates.latitude - 39.5763).abs() < 1e-9);
    assert!((coordinates.longitude - 2.6544).abs() < 1e-9);
}

#[tokio::test]
async fn google_zero_results_is_unresolved_not_error() {
    let server = MockServer::start().await;

    let body = serde_json::json!({ "status": "ZERO_RESULTS", "results": [] });
    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let state = shared_state();
    let client = google_client(&server.uri(), Arc::clone(&state));
    assert_eq!(client.resolve(&stop_query()).await, GeocodeResult::Unresolved);
    // An empty result set must not touch the circuit breaker.
    assert!(state.is_enabled(ProviderKind::GoogleMaps));
}

#[tokio::test]
async fn google_request_denied_trips_the_breaker() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "REQUEST_DENIED",
        "error_message": "The provided API key is invalid.",
        "results": []
    });
    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let state = shared_state();
    let client = google_client(&server.uri(), Arc::clone(&state));

    assert_eq!(client.resolve(&stop_query()).await, GeocodeResult::Unresolved);
    assert!(!state.is_enabled(ProviderKind::GoogleMaps));
    assert!(state.is_enabled(ProviderKind::Nominatim));
}

#[tokio::test]
async fn google_transport_failure_degrades_to_unresolved() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let state = shared_state();
    let client = google_client(&server.uri(), Arc::clone(&state));
    assert_eq!(client.resolve(&stop_query()).await, GeocodeResult::Unresolved);
    // Transport failures are transient; the breaker is for credentials only.
    assert!(state.is_enabled(ProviderKind::GoogleMaps));
}

#[tokio::test]
async fn places_search_maps_hits_to_candidates() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "results": [
            {
                "name": "Farmacia Progrés",
                "geometry": { "location": { "lat": 39.5701, "lng": 2.6410 } },
                "rating": 4.4,
                "vicinity": "Plaça del Progrés, 13, Palma"
            },
            {
                "name": "Farmacia Santa Catalina",
                "geometry": { "location": { "lat": 39.5712, "lng": 2.6385 } }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/maps/api/place/nearbysearch/json"))
        .and(query_param("location", "39.5696,2.6502"))
        .and(query_param("radius", "1500"))
        .and(query_param("type", "pharmacy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = google_client(&server.uri(), shared_state());
    let places = client
        .search_nearby(39.5696, 2.6502, PlaceCategory::Pharmacy, 1.5)
        .await;

    assert_eq!(places.len(), 2);
    assert_eq!(places[0].name, "Farmacia Progrés");
    assert_eq!(places[0].category, "pharmacy");
    assert_eq!(places[0].rating, Some(4.4));
    assert_eq!(places[1].rating, None);
}

#[tokio::test]
async fn photon_prefers_region_matching_feature() {
    let server = MockServer::start().await;

    // GeoJSON order: [longitude, latitude]. The first feature is a
    // plausible wrong-region match; the second mentions Palma.
    let body = serde_json::json!({
        "features": [
            {
                "geometry": { "coordinates": [2.3522, 48.8566] },
                "properties": { "name": "Place d'Espagne", "city": "Paris" }
            },
            {
                "geometry": { "coordinates": [2.6544, 39.5763] },
                "properties": { "name": "Plaça Espanya", "city": "Palma" }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = PhotonClient::with_base_url(30, &server.uri()).expect("client");
    let result = client.resolve(&stop_query()).await;

    let coordinates = result.coordinates().expect("should resolve");
    assert!((coordinates.latitude - 39.5763).abs() < 1e-9);
    assert!((coordinates.longitude - 2.6544).abs() < 1e-9);
}

#[tokio::test]
async fn photon_empty_feature_list_is_unresolved() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "features": []
        })))
        .mount(&server)
        .await;

    let client = PhotonClient::with_base_url(30, &server.uri()).expect("client");
    assert_eq!(client.resolve(&stop_query()).await, GeocodeResult::Unresolved);
}

#[tokio::test]
async fn nominatim_first_ladder_step_wins_when_it_hits() {
    let server = MockServer::start().await;

    let hit = serde_json::json!([
        {
            "lat": "39.5763",
            "lon": "2.6544",
            "display_name": "Plaça d'Espanya, Palma, Illes Balears, España"
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param(
            "q",
            "Parada bus 1043- Plaça Espanya, Carrer Eusebi Estada 2, Mallorca, Islas Baleares, España",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(&hit))
        .expect(1)
        .mount(&server)
        .await;

    let client = NominatimClient::with_base_url(30, &server.uri()).expect("client");
    let result = client.resolve(&stop_query()).await;

    let coordinates = result.coordinates().expect("should resolve");
    assert!((coordinates.latitude - 39.5763).abs() < 1e-9);
    // The first step matched, so the looser steps must never be sent.
    let requests = server.received_requests().await.expect("request recording");
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn nominatim_descends_the_ladder_until_a_step_hits() {
    let server = MockServer::start().await;

    let empty = serde_json::json!([]);
    let hit = serde_json::json!([
        {
            "lat": "39.5763",
            "lon": "2.6544",
            "display_name": "Carrer d'Eusebi Estada, Palma, Illes Balears, España"
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param(
            "q",
            "Parada bus 1043- Plaça Espanya, Carrer Eusebi Estada 2, Mallorca, Islas Baleares, España",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(&empty))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param(
            "q",
            "Plaça Espanya, Carrer Eusebi Estada 2, Mallorca, España",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(&empty))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Carrer Eusebi Estada 2, Mallorca, España"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&hit))
        .expect(1)
        .mount(&server)
        .await;
    // The minimal step must not be reached once step three hits.
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Carrer Eusebi Estada 2, Mallorca"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&hit))
        .expect(0)
        .mount(&server)
        .await;

    let client = NominatimClient::with_base_url(30, &server.uri()).expect("client");
    let result = client.resolve(&stop_query()).await;

    assert!(result.is_resolved());
}

#[tokio::test]
async fn nominatim_prefers_regional_hit_over_list_order() {
    let server = MockServer::start().await;

    // The provider ranks the wrong-region match first; the relevance
    // filter must skip it in favour of the island hit.
    let body = serde_json::json!([
        {
            "lat": "48.8566",
            "lon": "2.3522",
            "display_name": "Place d'Espagne, Paris, Île-de-France, France"
        },
        {
            "lat": "39.5763",
            "lon": "2.6544",
            "display_name": "Plaça d'Espanya, Palma, Illes Balears, España"
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = NominatimClient::with_base_url(30, &server.uri()).expect("client");
    let result = client.resolve(&stop_query()).await;

    let coordinates = result.coordinates().expect("should resolve");
    assert!((coordinates.latitude - 39.5763).abs() < 1e-9);
}
