mod backfill;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "palmagis-cli")]
#[command(about = "Palma GIS inventory command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve and persist coordinates for every unlocated row.
    Backfill,
    /// Print the geocoding coverage summary.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = palmagis_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = palmagis_db::PoolConfig::from_app_config(&config);
    let pool = palmagis_db::connect_pool(&config.database_url, pool_config).await?;
    palmagis_db::run_migrations(&pool).await?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Backfill => backfill::run(&pool, &config).await?,
        Commands::Stats => {
            let stats = palmagis_db::geocoding_stats(&pool).await?;
            println!("furniture rows:        {}", stats.total);
            println!("  with coordinates:    {}", stats.with_coordinates);
            println!("  without coordinates: {}", stats.without_coordinates);
            println!("  with address:        {}", stats.with_address);
            println!("  geocodable backlog:  {}", stats.geocodable);
        }
    }

    Ok(())
}
