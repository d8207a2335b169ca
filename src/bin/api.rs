//! DrConnect API Server
//!
//! Run with: cargo run --bin drconnect-api
//!
//! # Configuration
//!
//! Read from `--config <path>` or the default locations
//! (`~/.config/drconnect/config.toml`, `./config.toml`), then overridden by:
//! - `DRCONNECT_DATA_DIR`: Storage directory
//! - `DRCONNECT_STORAGE_QUOTA`: Storage quota in bytes
//! - `DRCONNECT_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `DRCONNECT_API_PORT`: Port to listen on (default: 8090)
//! - `DRCONNECT_ALLOW_ANONYMOUS`: Accept intake without an email (default: false)
//! - `RUST_LOG`: Log filter (default: drconnect=info,tower_http=debug)

use anyhow::Context;
use clap::Parser;
use drconnect::api::{serve, ApiConfig, AppState};
use drconnect::config::Config;
use drconnect::intake::IntakeService;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "drconnect-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "DrConnect patient intake API server")]
struct Args {
    /// Config file (default: standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match args.config.as_deref() {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    drconnect::logging::init(&config.logging, "tower_http=debug");

    tracing::info!("Starting DrConnect API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Data directory: {:?}", config.storage.data_dir());
    if config.intake.allow_anonymous {
        tracing::warn!("Anonymous intake enabled: submissions without an email share one profile");
    }

    let store = config
        .storage
        .open_store()
        .context("failed to open storage area")?;
    let intake = IntakeService::new(store).allow_anonymous(config.intake.allow_anonymous);

    let api_config = ApiConfig::from(&config.api);
    serve(AppState::new(intake, api_config.clone()), &api_config).await?;

    tracing::info!("DrConnect API server stopped");
    Ok(())
}
