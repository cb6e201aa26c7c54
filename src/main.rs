use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;

mod config;
mod dashboard;
mod innings;
mod models;

use config::Config;
use dashboard::AppState;
use models::ModelRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    // Models are loaded once here and shared read-only by every request
    let models = ModelRegistry::load(&config.score_model, &config.win_model)
        .context("Failed to load prediction models")?;

    let app = dashboard::router(AppState { models });
    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("IPL predictor listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app).await?;

    Ok(())
}
