use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct IncidentItem {
    incident_no: String,
    occurred_on: NaiveDate,
    reason: Option<String>,
    kind: String,
    blocking: bool,
    resource_no: Option<String>,
    furniture_no: Option<String>,
}

pub(super) async fn list_incidents(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<IncidentItem>>>, ApiError> {
    let rows = palmagis_db::list_incidents(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|incident| IncidentItem {
            incident_no: incident.incident_no,
            occurred_on: incident.occurred_on,
            reason: incident.reason,
            kind: incident.kind,
            blocking: incident.blocking,
            resource_no: incident.resource_no,
            furniture_no: incident.furniture_no,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
