//! GeoJSON export of every located record, for map frontends.

use axum::{extract::State, Extension, Json};
use serde::Serialize;
use serde_json::json;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct FeatureCollection {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
pub(super) struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    geometry: Geometry,
    properties: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub(super) struct Geometry {
    #[serde(rename = "type")]
    kind: &'static str,
    /// GeoJSON order: longitude first.
    coordinates: [f64; 2],
}

fn point(longitude: f64, latitude: f64, properties: serde_json::Value) -> Feature {
    Feature {
        kind: "Feature",
        geometry: Geometry {
            kind: "Point",
            coordinates: [longitude, latitude],
        },
        properties,
    }
}

/// Emit a `FeatureCollection` of all resources and furniture with a set
/// coordinate pair. Unlocated rows are silently skipped; this endpoint
/// never triggers resolution.
pub(super) async fn geodata(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<FeatureCollection>>, ApiError> {
    let resources = palmagis_db::list_resources(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let furniture = palmagis_db::list_furniture(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let mut features = Vec::new();
    for resource in resources {
        if !resource.has_coordinates() {
            continue;
        }
        let (Some(latitude), Some(longitude)) = (resource.latitude, resource.longitude) else {
            continue;
        };
        features.push(point(
            longitude,
            latitude,
            json!({
                "kind": "resource",
                "resource_no": resource.resource_no,
                "name": resource.name,
            }),
        ));
    }
    for row in furniture {
        if !row.has_coordinates() {
            continue;
        }
        let (Some(latitude), Some(longitude)) = (row.latitude, row.longitude) else {
            continue;
        };
        features.push(point(
            longitude,
            latitude,
            json!({
                "kind": "furniture",
                "furniture_no": row.furniture_no,
                "description": row.description,
                "stop_type": row.stop_type,
                "incident_count": row.incident_count,
            }),
        ));
    }

    Ok(Json(ApiResponse {
        data: FeatureCollection {
            kind: "FeatureCollection",
            features,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
