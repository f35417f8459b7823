use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct CampaignItem {
    resource_no: String,
    campaign: String,
    client: Option<String>,
    starts_on: Option<NaiveDate>,
    ends_on: Option<NaiveDate>,
}

pub(super) async fn list_campaigns(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<CampaignItem>>>, ApiError> {
    let rows = palmagis_db::list_campaigns(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|campaign| CampaignItem {
            resource_no: campaign.resource_no,
            campaign: campaign.campaign,
            client: campaign.client,
            starts_on: campaign.starts_on,
            ends_on: campaign.ends_on,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
