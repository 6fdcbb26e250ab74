use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use common::Catalog;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    config.warn_on_dev_defaults();

    let catalog = Catalog::open(
        config.storage.upload_dir.clone(),
        config.storage.data_file.clone(),
    )
    .await
    .context("Failed to open paper catalog")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState::new(Arc::new(catalog), config)
        .map_err(|e| anyhow::anyhow!("Failed to hash upload password: {e}"))?;
    let app = server::build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
