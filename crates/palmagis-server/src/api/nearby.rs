use std::str::FromStr;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use palmagis_core::{Coordinates, GeocodeQuery, PlaceCategory};
use palmagis_geocode::{
    rank_candidates, rank_records_by_candidates, rank_records_near_point, validate_radius_km,
    NearbyRecord, RankedCandidate, RankedRecord,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    lat: Option<f64>,
    lon: Option<f64>,
    category: Option<String>,
    address: Option<String>,
    radius_km: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(super) struct NearbyData {
    mode: &'static str,
    resolved: bool,
    reference: Option<ReferencePoint>,
    places: Vec<PlaceItem>,
    records: Vec<RecordItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct ReferencePoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct PlaceItem {
    name: String,
    latitude: f64,
    longitude: f64,
    category: String,
    rating: Option<f64>,
    vicinity: Option<String>,
    distance_km: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct RecordItem {
    key: String,
    name: String,
    record_kind: &'static str,
    latitude: f64,
    longitude: f64,
    distance_km: f64,
    nearest_place: Option<String>,
}

/// Nearby search in two modes.
///
/// Category mode (`lat`, `lon`, `category`): fetch points of interest of
/// that category around the point, then rank the located records against
/// them. Address mode (`address`): resolve the address through the precise
/// provider only, then rank the located records around the resolved point.
/// All input validation happens before anything leaves the process; an
/// empty result set is a normal response, not an error.
pub(super) async fn nearby(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<NearbyData>>, ApiError> {
    let Some(radius_km) = params.radius_km else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "radius_km is required",
        ));
    };
    if let Err(e) = validate_radius_km(radius_km) {
        return Err(ApiError::new(req_id.0, "validation_error", e.to_string()));
    }

    let data = match (&params.category, &params.address) {
        (Some(category), _) => {
            category_mode(&state, &req_id, &params, category, radius_km).await?
        }
        (None, Some(address)) => address_mode(&state, &req_id, address, radius_km).await?,
        (None, None) => {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                "either category with lat/lon, or address, is required",
            ));
        }
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

async fn category_mode(
    state: &AppState,
    req_id: &RequestId,
    params: &NearbyQuery,
    category: &str,
    radius_km: f64,
) -> Result<NearbyData, ApiError> {
    let category = PlaceCategory::from_str(category).map_err(|_| {
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            format!(
                "unknown category {category:?}; expected one of: {}",
                PlaceCategory::whitelist().join(", ")
            ),
        )
    })?;

    let (Some(lat), Some(lon)) = (params.lat, params.lon) else {
        return Err(ApiError::new(
            req_id.0.clone(),
            "validation_error",
            "lat and lon are required in category mode",
        ));
    };

    let reference = Coordinates::new(lat, lon);
    let candidates = state
        .resolver
        .google()
        .search_nearby(lat, lon, category, radius_km)
        .await;

    let records = load_records(state, req_id).await?;
    let ranked_records = rank_records_by_candidates(records, &candidates, radius_km);
    let ranked_places = rank_candidates(reference, candidates);

    Ok(NearbyData {
        mode: "category",
        resolved: true,
        reference: Some(ReferencePoint {
            latitude: lat,
            longitude: lon,
        }),
        places: ranked_places.into_iter().map(place_item).collect(),
        records: ranked_records.into_iter().map(record_item).collect(),
    })
}

async fn address_mode(
    state: &AppState,
    req_id: &RequestId,
    address: &str,
    radius_km: f64,
) -> Result<NearbyData, ApiError> {
    if address.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0.clone(),
            "validation_error",
            "address must be non-blank",
        ));
    }

    let query = GeocodeQuery::new("nearby", None, address);
    let Some(reference) = state.resolver.resolve_primary(&query).await.coordinates() else {
        return Ok(NearbyData {
            mode: "address",
            resolved: false,
            reference: None,
            places: Vec::new(),
            records: Vec::new(),
        });
    };

    let records = load_records(state, req_id).await?;
    let ranked = rank_records_near_point(records, reference, radius_km);

    Ok(NearbyData {
        mode: "address",
        resolved: true,
        reference: Some(ReferencePoint {
            latitude: reference.latitude,
            longitude: reference.longitude,
        }),
        places: Vec::new(),
        records: ranked.into_iter().map(record_item).collect(),
    })
}

/// Every record with a set coordinate pair, resources and furniture alike.
/// Keys are prefixed with the record kind so the two namespaces cannot
/// collide.
async fn load_records(state: &AppState, req_id: &RequestId) -> Result<Vec<NearbyRecord>, ApiError> {
    let resources = palmagis_db::list_resources(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let furniture = palmagis_db::list_furniture(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let mut records = Vec::new();
    for resource in resources {
        if let (true, Some(lat), Some(lon)) = (
            resource.has_coordinates(),
            resource.latitude,
            resource.longitude,
        ) {
            records.push(NearbyRecord {
                key: format!("resource:{}", resource.resource_no),
                name: resource.name,
                latitude: lat,
                longitude: lon,
            });
        }
    }
    for row in furniture {
        if let (true, Some(lat), Some(lon)) = (row.has_coordinates(), row.latitude, row.longitude) {
            records.push(NearbyRecord {
                key: format!("furniture:{}", row.furniture_no),
                name: row.description.unwrap_or_else(|| row.furniture_no.clone()),
                latitude: lat,
                longitude: lon,
            });
        }
    }
    Ok(records)
}

fn place_item(ranked: RankedCandidate) -> PlaceItem {
    PlaceItem {
        name: ranked.place.name,
        latitude: ranked.place.latitude,
        longitude: ranked.place.longitude,
        category: ranked.place.category,
        rating: ranked.place.rating,
        vicinity: ranked.place.vicinity,
        distance_km: ranked.distance_km,
    }
}

fn record_item(ranked: RankedRecord) -> RecordItem {
    let record_kind = if ranked.record.key.starts_with("resource:") {
        "resource"
    } else {
        "furniture"
    };
    RecordItem {
        key: ranked.record.key,
        name: ranked.record.name,
        record_kind,
        latitude: ranked.record.latitude,
        longitude: ranked.record.longitude,
        distance_km: ranked.distance_km,
        nearest_place: ranked.nearest_place,
    }
}
