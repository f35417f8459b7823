//! Read operations for the `campaigns` table.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

/// A row from the `campaigns` table — one booking of an advertising
/// resource by a client.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignRow {
    pub id: i64,
    pub resource_no: String,
    pub campaign: String,
    pub client: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// List every campaign, ordered by start date descending.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_campaigns(pool: &PgPool) -> Result<Vec<CampaignRow>, sqlx::Error> {
    sqlx::query_as::<_, CampaignRow>(
        "SELECT id, resource_no, campaign, client, starts_on, ends_on, created_at \
         FROM campaigns ORDER BY starts_on DESC NULLS LAST, id DESC",
    )
    .fetch_all(pool)
    .await
}

/// List the campaigns booked on one advertising resource.
///
/// Duplicate bookings (same campaign and dates) are collapsed, keeping the
/// lexicographically greatest client name, matching the legacy report.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_resource_campaigns(
    pool: &PgPool,
    resource_no: &str,
) -> Result<Vec<CampaignRow>, sqlx::Error> {
    sqlx::query_as::<_, CampaignRow>(
        "SELECT MIN(id) AS id, resource_no, campaign, MAX(client) AS client, \
                starts_on, ends_on, MIN(created_at) AS created_at \
         FROM campaigns \
         WHERE resource_no = $1 \
         GROUP BY resource_no, campaign, starts_on, ends_on \
         ORDER BY starts_on DESC NULLS LAST",
    )
    .bind(resource_no)
    .fetch_all(pool)
    .await
}
