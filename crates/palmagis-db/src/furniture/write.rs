//! Write operations for the `furniture` table.

use sqlx::PgPool;

/// Conditionally persist a resolved coordinate pair.
///
/// Performs an existence check on `furniture_no` first: an absent key
/// returns `false` without writing — this function never inserts. A present
/// key has both coordinate columns written in a single `UPDATE`, so no
/// partially-written pair is ever observable.
///
/// Returns `true` iff at least one row was affected.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if either statement fails.
pub async fn update_furniture_coordinates_if_exists(
    pool: &PgPool,
    furniture_no: &str,
    latitude: f64,
    longitude: f64,
) -> Result<bool, sqlx::Error> {
    let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM furniture WHERE furniture_no = $1")
        .bind(furniture_no)
        .fetch_optional(pool)
        .await?;

    if exists.is_none() {
        return Ok(false);
    }

    let rows_affected = sqlx::query(
        "UPDATE furniture \
         SET latitude = $2, longitude = $3, updated_at = NOW() \
         WHERE furniture_no = $1",
    )
    .bind(furniture_no)
    .bind(latitude)
    .bind(longitude)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected > 0)
}
