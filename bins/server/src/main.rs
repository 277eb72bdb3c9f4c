//! Fundtrack API Server
//!
//! Main entry point for the research funding tracker.

use anyhow::Context;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fundtrack_api::{AppState, create_router};
use fundtrack_core::storage::{StorageConfig, StorageService};
use fundtrack_db::{Migrator, connect};
use fundtrack_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fundtrack=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect(&config.database).await?;
    Migrator::up(&db, None).await?;
    info!(url = %config.database.url, "Connected to database");

    let storage = StorageService::from_config(StorageConfig::from(&config.storage))?;
    info!(
        root = %config.storage.root,
        max_file_size = config.storage.max_file_size,
        "Attachment storage ready"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = create_router(AppState::new(db, storage, config));

    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
