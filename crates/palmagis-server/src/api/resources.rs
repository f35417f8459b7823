use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::NaiveDate;
use palmagis_db::{CampaignRow, IncidentRow};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ResourceItem {
    resource_no: String,
    name: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    campaigns: Vec<CampaignItem>,
    incidents: Vec<IncidentItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct CampaignItem {
    campaign: String,
    client: Option<String>,
    starts_on: Option<NaiveDate>,
    ends_on: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(super) struct IncidentItem {
    incident_no: String,
    occurred_on: NaiveDate,
    reason: Option<String>,
    kind: String,
    blocking: bool,
}

impl From<IncidentRow> for IncidentItem {
    fn from(row: IncidentRow) -> Self {
        Self {
            incident_no: row.incident_no,
            occurred_on: row.occurred_on,
            reason: row.reason,
            kind: row.kind,
            blocking: row.blocking,
        }
    }
}

pub(super) async fn list_resources(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<ResourceItem>>>, ApiError> {
    let resources = palmagis_db::list_resources(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let campaigns = palmagis_db::list_campaigns(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let incidents = palmagis_db::list_incidents(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let mut campaigns_by_resource = group_campaigns(campaigns);
    let mut incidents_by_resource: HashMap<String, Vec<IncidentItem>> = HashMap::new();
    for incident in incidents {
        if let Some(resource_no) = incident.resource_no.clone() {
            incidents_by_resource
                .entry(resource_no)
                .or_default()
                .push(incident.into());
        }
    }

    let data = resources
        .into_iter()
        .map(|resource| ResourceItem {
            campaigns: campaigns_by_resource
                .remove(&resource.resource_no)
                .unwrap_or_default(),
            incidents: incidents_by_resource
                .remove(&resource.resource_no)
                .unwrap_or_default(),
            resource_no: resource.resource_no,
            name: resource.name,
            latitude: resource.latitude,
            longitude: resource.longitude,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_resource_incidents(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(resource_no): Path<String>,
) -> Result<Json<ApiResponse<Vec<IncidentItem>>>, ApiError> {
    require_resource(&state, &req_id, &resource_no).await?;

    let rows = palmagis_db::list_resource_incidents(&state.pool, &resource_no)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(Into::into).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_resource_campaigns(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(resource_no): Path<String>,
) -> Result<Json<ApiResponse<Vec<CampaignItem>>>, ApiError> {
    require_resource(&state, &req_id, &resource_no).await?;

    let rows = palmagis_db::list_resource_campaigns(&state.pool, &resource_no)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| CampaignItem {
            campaign: row.campaign,
            client: row.client,
            starts_on: row.starts_on,
            ends_on: row.ends_on,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

async fn require_resource(
    state: &AppState,
    req_id: &RequestId,
    resource_no: &str,
) -> Result<(), ApiError> {
    let resource = palmagis_db::get_resource(&state.pool, resource_no)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    if resource.is_none() {
        return Err(ApiError::new(
            req_id.0.clone(),
            "not_found",
            "resource not found",
        ));
    }
    Ok(())
}

/// Group campaign rows by resource, collapsing duplicate bookings.
///
/// Two rows with the same campaign name and date range count as one
/// booking; the lexicographically greatest client name survives, matching
/// the per-resource query's `MAX(client)`.
fn group_campaigns(rows: Vec<CampaignRow>) -> HashMap<String, Vec<CampaignItem>> {
    let mut grouped: HashMap<String, Vec<CampaignItem>> = HashMap::new();
    for row in rows {
        let items = grouped.entry(row.resource_no).or_default();
        if let Some(existing) = items.iter_mut().find(|item| {
            item.campaign == row.campaign
                && item.starts_on == row.starts_on
                && item.ends_on == row.ends_on
        }) {
            if row.client > existing.client {
                existing.client = row.client;
            }
            continue;
        }
        items.push(CampaignItem {
            campaign: row.campaign,
            client: row.client,
            starts_on: row.starts_on,
            ends_on: row.ends_on,
        });
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn campaign_row(resource_no: &str, campaign: &str, client: Option<&str>) -> CampaignRow {
        CampaignRow {
            id: 1,
            resource_no: resource_no.to_string(),
            campaign: campaign.to_string(),
            client: client.map(ToOwned::to_owned),
            starts_on: NaiveDate::from_ymd_opt(2026, 1, 1),
            ends_on: NaiveDate::from_ymd_opt(2026, 1, 31),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn duplicate_bookings_collapse_keeping_greatest_client() {
        let grouped = group_campaigns(vec![
            campaign_row("R-7", "Rebajas", Some("Client A")),
            campaign_row("R-7", "Rebajas", Some("Client B")),
            campaign_row("R-7", "Verano", Some("Client A")),
            campaign_row("R-9", "Rebajas", None),
        ]);

        let r7 = &grouped["R-7"];
        assert_eq!(r7.len(), 2);
        assert_eq!(r7[0].client.as_deref(), Some("Client B"));
        assert_eq!(grouped["R-9"].len(), 1);
    }
}
