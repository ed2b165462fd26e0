use anyhow::{Context, Result};
use order_engine::{config::myconfig::Config, handler::AppRouter, state::AppState};
use shared::{
    config::{ConnectionManager, ConnectionPool},
    utils::{Telemetry, init_logger},
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let (config, state, telemetry) = setup().await.context("Failed to setup application")?;

    let served = AppRouter::serve(config.port, state).await;
    if let Err(e) = &served {
        error!("❌ HTTP server stopped with error: {e:?}");
    }

    shutdown(telemetry).await;

    served
}

async fn setup() -> Result<(Config, AppState, Telemetry)> {
    dotenv::dotenv().ok();

    let config = Config::init().context("Failed to load configuration")?;

    let telemetry = Telemetry::new("order-service", config.otel_endpoint.clone());
    let logger_provider = telemetry
        .init_logger()
        .context("Failed to initialize OpenTelemetry logger")?;
    telemetry
        .init_meter()
        .context("Failed to initialize OpenTelemetry meter")?;
    telemetry
        .init_tracer()
        .context("Failed to initialize OpenTelemetry tracer")?;

    init_logger(
        logger_provider,
        "order-service",
        config.is_dev,
        config.enable_file_log,
    );

    let db_pool =
        ConnectionManager::new_pool(&config.database_url, config.db_min_conn, config.db_max_conn)
            .await
            .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&db_pool)
            .await
            .context("failed to migration database")?;
    }

    let state = AppState::new(db_pool, &config)
        .await
        .context("Failed to create AppState")?;

    info!("✅ Application setup completed successfully.");
    Ok((config, state, telemetry))
}

async fn shutdown(telemetry: Telemetry) {
    info!("🛑 Shutting down order service...");

    if let Err(e) = telemetry.shutdown().await {
        error!("Failed to shutdown telemetry: {}", e);
    }

    info!("✅ Order service shutdown complete.");
}

async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    info!("📜 Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;

    Ok(())
}
