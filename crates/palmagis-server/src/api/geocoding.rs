use axum::{
    extract::{Query, State},
    Extension, Json,
};
use palmagis_core::GeocodeQuery;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct StatsData {
    total: i64,
    with_coordinates: i64,
    without_coordinates: i64,
    with_address: i64,
    geocodable: i64,
}

pub(super) async fn stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<StatsData>>, ApiError> {
    let stats = palmagis_db::geocoding_stats(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: StatsData {
            total: stats.total,
            with_coordinates: stats.with_coordinates,
            without_coordinates: stats.without_coordinates,
            with_address: stats.with_address,
            geocodable: stats.geocodable,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct DiagnosticsQuery {
    identifier: Option<String>,
    description: Option<String>,
    address: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct DiagnosticItem {
    provider: String,
    resolved: bool,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Run every enabled provider against one input and report each outcome
/// side by side, ignoring the fallback order. Meant for operators tuning
/// the provider registry.
pub(super) async fn diagnostics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<DiagnosticsQuery>,
) -> Result<Json<ApiResponse<Vec<DiagnosticItem>>>, ApiError> {
    let address = params.address.unwrap_or_default();
    if address.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "address must be non-blank",
        ));
    }

    let query = GeocodeQuery::new(
        params.identifier.unwrap_or_else(|| "diagnostics".to_string()),
        params.description,
        address,
    );

    let data = state
        .resolver
        .diagnostics(&query)
        .await
        .into_iter()
        .map(|outcome| {
            let coordinates = outcome.result.coordinates();
            DiagnosticItem {
                provider: outcome.provider.to_string(),
                resolved: coordinates.is_some(),
                latitude: coordinates.map(|c| c.latitude),
                longitude: coordinates.map(|c| c.longitude),
            }
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
