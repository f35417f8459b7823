//! One-shot coordinate backfill over the unlocated furniture rows.

use palmagis_core::{AppConfig, GeocodeQuery, GeocodeResult, ProviderRegistry};
use palmagis_geocode::Resolver;
use sqlx::PgPool;

/// Walk every unlocated row with an address, resolve it through the
/// provider chain, and persist successes. Rows are processed one at a
/// time; a summary is printed at the end.
///
/// # Errors
///
/// Returns an error if the provider registry cannot be loaded, the
/// resolver cannot be built, or the work list query fails. Per-row
/// resolution and write-back failures are logged and counted instead.
pub async fn run(pool: &PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let registry = ProviderRegistry::from_path(&config.providers_path)?;
    let resolver = Resolver::new(
        registry,
        config.google_api_key.as_deref(),
        config.geocode_timeout_secs,
    )?;

    let rows = palmagis_db::list_furniture_missing_coordinates(pool).await?;
    if rows.is_empty() {
        println!("every addressed row is located; nothing to do");
        return Ok(());
    }

    let total = rows.len();
    let mut resolved = 0_usize;
    let mut persisted = 0_usize;

    for row in rows {
        let Some(address) = row.address_trimmed() else {
            continue;
        };
        let query = GeocodeQuery::new(row.furniture_no.clone(), row.description.clone(), address);

        let GeocodeResult::Resolved(coordinates) = resolver.resolve(&query).await else {
            tracing::info!(furniture_no = %row.furniture_no, "unresolved");
            continue;
        };
        resolved += 1;

        match palmagis_db::update_furniture_coordinates_if_exists(
            pool,
            &row.furniture_no,
            coordinates.latitude,
            coordinates.longitude,
        )
        .await
        {
            Ok(true) => persisted += 1,
            Ok(false) => {
                tracing::info!(furniture_no = %row.furniture_no, "row vanished before write-back");
            }
            Err(e) => {
                tracing::error!(furniture_no = %row.furniture_no, error = %e, "write-back failed");
            }
        }
    }

    println!("processed:  {total}");
    println!("resolved:   {resolved}");
    println!("persisted:  {persisted}");
    println!("unresolved: {}", total - resolved);

    Ok(())
}
