use std::sync::Arc;

use anyhow::Context;
use common::storage::s3::S3ObjectStore;
use tracing::info;

use server::config::AppConfig;
use server::database;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    info!("Database connected");

    let store = S3ObjectStore::new(
        &config.storage.bucket,
        &config.storage.region,
        &config.storage.access_key,
        &config.storage.secret_key,
        config.storage.endpoint.as_deref(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize object store: {e}"))?;
    info!(bucket = %config.storage.bucket, "Object store ready");

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState {
        db,
        config,
        store: Arc::new(store),
        http: reqwest::Client::new(),
    };

    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("PassBank server listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
