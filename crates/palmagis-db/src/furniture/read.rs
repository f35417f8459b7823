//! Read operations for the `furniture` table.

use sqlx::PgPool;

use super::types::FurnitureRow;

const FURNITURE_COLUMNS: &str = "id, furniture_no, description, kind, stop_type, cleaning_zone, \
     operator, address, latitude, longitude, incident_count, created_at, updated_at";

/// List every furniture row, ordered by `furniture_no`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_furniture(pool: &PgPool) -> Result<Vec<FurnitureRow>, sqlx::Error> {
    sqlx::query_as::<_, FurnitureRow>(&format!(
        "SELECT {FURNITURE_COLUMNS} FROM furniture ORDER BY furniture_no"
    ))
    .fetch_all(pool)
    .await
}

/// Fetch one furniture row by its business key.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_furniture(
    pool: &PgPool,
    furniture_no: &str,
) -> Result<Option<FurnitureRow>, sqlx::Error> {
    sqlx::query_as::<_, FurnitureRow>(&format!(
        "SELECT {FURNITURE_COLUMNS} FROM furniture WHERE furniture_no = $1"
    ))
    .bind(furniture_no)
    .fetch_optional(pool)
    .await
}

/// List furniture rows whose coordinate pair is unset (NULL or the legacy
/// `(0, 0)` pair) and whose address is non-blank — the geocoding work list.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_furniture_missing_coordinates(
    pool: &PgPool,
) -> Result<Vec<FurnitureRow>, sqlx::Error> {
    sqlx::query_as::<_, FurnitureRow>(&format!(
        "SELECT {FURNITURE_COLUMNS} FROM furniture \
         WHERE (latitude IS NULL OR longitude IS NULL \
                OR (latitude = 0 AND longitude = 0)) \
           AND address IS NOT NULL AND btrim(address) <> '' \
         ORDER BY furniture_no"
    ))
    .fetch_all(pool)
    .await
}
