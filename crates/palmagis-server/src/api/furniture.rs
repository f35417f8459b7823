use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::NaiveDate;
use palmagis_core::{GeocodeQuery, GeocodeResult};
use palmagis_db::FurnitureRow;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct FurnitureItem {
    furniture_no: String,
    description: Option<String>,
    kind: Option<String>,
    stop_type: Option<String>,
    cleaning_zone: Option<String>,
    operator: Option<String>,
    address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    incident_count: i64,
    /// Whether the coordinates in this response came from an on-the-fly
    /// resolution rather than the stored row.
    geocoded: bool,
    /// Whether that resolution was also written back to the store.
    persisted: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct FurnitureIncidentItem {
    incident_no: String,
    occurred_on: NaiveDate,
    reason: Option<String>,
    blocking: bool,
}

/// List all furniture, resolving unlocated rows on the fly.
///
/// Rows with an unset coordinate pair and a usable address go through the
/// resolver sequentially; a success is written back conditionally and the
/// resolved pair is returned in the response either way. Rows the resolver
/// cannot place come back unchanged — an unresolved address is a normal
/// outcome here, never an error.
pub(super) async fn list_furniture(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<FurnitureItem>>>, ApiError> {
    let rows = palmagis_db::list_furniture(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let mut data = Vec::with_capacity(rows.len());
    for row in rows {
        data.push(locate_row(&state, row).await);
    }

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

async fn locate_row(state: &AppState, row: FurnitureRow) -> FurnitureItem {
    let mut item = FurnitureItem {
        latitude: row.latitude,
        longitude: row.longitude,
        geocoded: false,
        persisted: false,
        furniture_no: row.furniture_no.clone(),
        description: row.description.clone(),
        kind: row.kind.clone(),
        stop_type: row.stop_type.clone(),
        cleaning_zone: row.cleaning_zone.clone(),
        operator: row.operator.clone(),
        address: row.address.clone(),
        incident_count: row.incident_count,
    };

    if row.has_coordinates() {
        return item;
    }
    let Some(address) = row.address_trimmed() else {
        return item;
    };

    let query = GeocodeQuery::new(row.furniture_no.clone(), row.description.clone(), address);
    let GeocodeResult::Resolved(coordinates) = state.resolver.resolve(&query).await else {
        return item;
    };

    item.latitude = Some(coordinates.latitude);
    item.longitude = Some(coordinates.longitude);
    item.geocoded = true;
    item.persisted = match palmagis_db::update_furniture_coordinates_if_exists(
        &state.pool,
        &row.furniture_no,
        coordinates.latitude,
        coordinates.longitude,
    )
    .await
    {
        Ok(updated) => {
            if !updated {
                tracing::info!(furniture_no = %row.furniture_no, "row vanished before write-back");
            }
            updated
        }
        Err(e) => {
            tracing::error!(furniture_no = %row.furniture_no, error = %e, "coordinate write-back failed");
            false
        }
    };

    item
}

pub(super) async fn list_furniture_incidents(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(furniture_no): Path<String>,
) -> Result<Json<ApiResponse<Vec<FurnitureIncidentItem>>>, ApiError> {
    let furniture = palmagis_db::get_furniture(&state.pool, &furniture_no)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    if furniture.is_none() {
        return Err(ApiError::new(req_id.0, "not_found", "furniture not found"));
    }

    let rows = palmagis_db::list_furniture_incidents(&state.pool, &furniture_no)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|incident| FurnitureIncidentItem {
            incident_no: incident.incident_no,
            occurred_on: incident.occurred_on,
            reason: incident.reason,
            blocking: incident.blocking,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
