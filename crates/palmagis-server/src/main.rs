mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use palmagis_core::ProviderRegistry;
use palmagis_geocode::Resolver;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

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

    let registry = ProviderRegistry::from_path(&config.providers_path)?;
    let resolver = Arc::new(Resolver::new(
        registry,
        config.google_api_key.as_deref(),
        config.geocode_timeout_secs,
    )?);

    let _scheduler =
        scheduler::build_scheduler(pool.clone(), Arc::clone(&resolver), &config).await?;

    let app = build_app(AppState { pool, resolver });

    tracing::info!(addr = %config.bind_addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
