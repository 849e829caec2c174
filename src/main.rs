use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::config::{allowed_origins_from_env_value, api_prefix_from_env_value};
use api_rest::{AppState, RestConfig, config::DEFAULT_REST_ADDR, habit_router, serve};
use habit_core::config::{fanout_capacity_from_env_value, store_kind_from_env_value};
use habit_core::{CoreConfig, DEFAULT_HABIT_DATA_DIR, StoreKind};

/// Main entry point for the habit tracker server
///
/// Serves the habit REST endpoints, the `/ws` real-time channel and the Swagger UI on one
/// listener, and shuts down gracefully on Ctrl-C.
///
/// # Environment Variables
/// - `HABIT_REST_ADDR`: listen address (default: "0.0.0.0:5001")
/// - `HABIT_API_PREFIX`: path prefix for the habit routes (default: "/api"; empty mounts at root)
/// - `HABIT_ALLOWED_ORIGINS`: comma-separated CORS origins (default: any origin)
/// - `HABIT_STORE`: `file` or `memory` (default: "file")
/// - `HABIT_DATA_DIR`: data directory for the file store (default: "habit_data")
/// - `HABIT_FANOUT_CAPACITY`: snapshots buffered per real-time subscriber (default: 16)
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration is invalid or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("habit_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("habit_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("HABIT_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    let rest_cfg = RestConfig::new(
        rest_addr,
        api_prefix_from_env_value(std::env::var("HABIT_API_PREFIX").ok()),
        allowed_origins_from_env_value(std::env::var("HABIT_ALLOWED_ORIGINS").ok()),
    )?;

    let store_kind = store_kind_from_env_value(std::env::var("HABIT_STORE").ok())?;
    let data_dir = std::env::var("HABIT_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_HABIT_DATA_DIR));
    let core_cfg = CoreConfig::new(
        store_kind,
        data_dir,
        fanout_capacity_from_env_value(std::env::var("HABIT_FANOUT_CAPACITY").ok())?,
    )?;

    match core_cfg.store_kind() {
        StoreKind::File => tracing::info!("++ Habit store: {}", core_cfg.habits_dir().display()),
        StoreKind::Memory => tracing::info!("++ Habit store: in memory"),
    }

    let state = AppState::from_config(&core_cfg)?;
    let app = habit_router(state, &rest_cfg);

    let listener = tokio::net::TcpListener::bind(rest_cfg.addr()).await?;
    tracing::info!(
        "++ Starting habit tracker on {} (habits under '{}/habits')",
        listener.local_addr()?,
        rest_cfg.api_prefix()
    );

    serve(listener, app, shutdown_signal()).await?;
    tracing::info!("habit tracker stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
