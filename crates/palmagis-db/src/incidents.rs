//! Read operations for the `incidents` table.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

/// A row from the `incidents` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IncidentRow {
    pub id: i64,
    pub incident_no: String,
    pub occurred_on: NaiveDate,
    pub reason: Option<String>,
    pub kind: String,
    pub blocking: bool,
    pub resource_no: Option<String>,
    pub furniture_no: Option<String>,
    pub created_at: DateTime<Utc>,
}

const INCIDENT_COLUMNS: &str =
    "id, incident_no, occurred_on, reason, kind, blocking, resource_no, furniture_no, created_at";

/// List every incident, newest first.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_incidents(pool: &PgPool) -> Result<Vec<IncidentRow>, sqlx::Error> {
    sqlx::query_as::<_, IncidentRow>(&format!(
        "SELECT {INCIDENT_COLUMNS} FROM incidents ORDER BY occurred_on DESC, id DESC"
    ))
    .fetch_all(pool)
    .await
}

/// List the incidents recorded against one furniture installation, newest
/// first.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_furniture_incidents(
    pool: &PgPool,
    furniture_no: &str,
) -> Result<Vec<IncidentRow>, sqlx::Error> {
    sqlx::query_as::<_, IncidentRow>(&format!(
        "SELECT {INCIDENT_COLUMNS} FROM incidents \
         WHERE furniture_no = $1 AND kind = 'furniture' \
         ORDER BY occurred_on DESC, id DESC"
    ))
    .bind(furniture_no)
    .fetch_all(pool)
    .await
}

/// List the incidents recorded against one advertising resource, newest
/// first.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_resource_incidents(
    pool: &PgPool,
    resource_no: &str,
) -> Result<Vec<IncidentRow>, sqlx::Error> {
    sqlx::query_as::<_, IncidentRow>(&format!(
        "SELECT {INCIDENT_COLUMNS} FROM incidents \
         WHERE resource_no = $1 \
         ORDER BY occurred_on DESC, id DESC"
    ))
    .bind(resource_no)
    .fetch_all(pool)
    .await
}
