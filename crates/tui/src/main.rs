mod app;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    sync::Mutex,
};

use gamedex_core::{
    catalog::CatalogGateway,
    config::{self, AppConfig},
    route::Route,
};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    if config.api_key.trim().is_empty() {
        tracing::warn!("No API key configured; catalog requests will likely be rejected");
    }

    let start = std::env::args()
        .nth(1)
        .map(|path| Route::parse(&path))
        .unwrap_or(Route::Browse);
    info!(base_url = %config.base_url, route = %start, "Starting gamedex");

    let gateway = CatalogGateway::from_config(&config)?;
    let mut app = app::GamedexApp::new(gateway);
    app.run(start).await
}

// The terminal is owned by the UI, so logs only go to a file.
fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("gamedex.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
