//! Geocoding coverage statistics over the `furniture` table.

use sqlx::PgPool;

/// Counts summarizing how much of the furniture inventory is geocoded.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct GeocodingStats {
    /// All furniture rows.
    pub total: i64,
    /// Rows with a usable (non-null, non-zero) coordinate pair.
    pub with_coordinates: i64,
    /// Rows whose coordinate pair is unset.
    pub without_coordinates: i64,
    /// Rows with a non-blank address.
    pub with_address: i64,
    /// Rows missing coordinates that carry an address — the backfill work
    /// list size.
    pub geocodable: i64,
}

/// Compute the geocoding coverage summary in one round-trip.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn geocoding_stats(pool: &PgPool) -> Result<GeocodingStats, sqlx::Error> {
    sqlx::query_as::<_, GeocodingStats>(
        "SELECT COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE latitude IS NOT NULL AND longitude IS NOT NULL \
                                   AND NOT (latitude = 0 AND longitude = 0)) AS with_coordinates, \
                COUNT(*) FILTER (WHERE latitude IS NULL OR longitude IS NULL \
                                    OR (latitude = 0 AND longitude = 0)) AS without_coordinates, \
                COUNT(*) FILTER (WHERE address IS NOT NULL AND btrim(address) <> '') AS with_address, \
                COUNT(*) FILTER (WHERE (latitude IS NULL OR longitude IS NULL \
                                     OR (latitude = 0 AND longitude = 0)) \
                                   AND address IS NOT NULL AND btrim(address) <> '') AS geocodable \
         FROM furniture",
    )
    .fetch_one(pool)
    .await
}
