//! Read operations for the `resources` table (advertising assets).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// A row from the `resources` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResourceRow {
    pub id: i64,
    pub resource_no: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResourceRow {
    /// Whether the row carries a usable coordinate pair. Only the full
    /// `(0, 0)` pair counts as the legacy unset marker.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        matches!(
            (self.latitude, self.longitude),
            (Some(lat), Some(lon)) if lat != 0.0 || lon != 0.0
        )
    }
}

/// Fetch one resource by its business key.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_resource(
    pool: &PgPool,
    resource_no: &str,
) -> Result<Option<ResourceRow>, sqlx::Error> {
    sqlx::query_as::<_, ResourceRow>(
        "SELECT id, resource_no, name, latitude, longitude, created_at, updated_at \
         FROM resources WHERE resource_no = $1",
    )
    .bind(resource_no)
    .fetch_optional(pool)
    .await
}

/// List every resource, ordered by `resource_no`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_resources(pool: &PgPool) -> Result<Vec<ResourceRow>, sqlx::Error> {
    sqlx::query_as::<_, ResourceRow>(
        "SELECT id, resource_no, name, latitude, longitude, created_at, updated_at \
         FROM resources ORDER BY resource_no",
    )
    .fetch_all(pool)
    .await
}
