//! dentscan-web - tooth photo upload and analysis service
//!
//! Serves a login form, an upload form and result pages, plus a JSON
//! analysis endpoint. Uploaded photos pass a tooth-likeness gate before a
//! dark-pixel severity estimate is rendered with a canned recommendation.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dentscan_common::config::{default_config_path, TomlConfig};
use dentscan_common::dataset::ReferenceDataset;
use dentscan_common::RecommendationTable;
use dentscan_web::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for dentscan-web
#[derive(Parser, Debug)]
#[command(name = "dentscan-web")]
#[command(about = "Tooth photo upload and analysis service")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "DENTSCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind (overrides config)
    #[arg(long, env = "DENTSCAN_HOST")]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "DENTSCAN_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is loaded before tracing so its log level can seed the filter
    let config_path = args.config.clone().or_else(default_config_path);
    let mut config =
        TomlConfig::load(config_path.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting DentScan (dentscan-web) v{}",
        env!("CARGO_PKG_VERSION")
    );
    match &config_path {
        Some(path) if path.exists() => info!("Configuration: {}", path.display()),
        Some(path) => warn!("Config file {} not found, using built-in defaults", path.display()),
        None => warn!("No config directory on this platform, using built-in defaults"),
    }

    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    // Missing recommendation table is fatal
    let recommendations = RecommendationTable::load(&config.recommendations_path)
        .with_context(|| {
            format!(
                "Failed to load recommendations from {}",
                config.recommendations_path.display()
            )
        })?;

    let dataset = match &config.dataset_path {
        Some(path) => ReferenceDataset::load(path).context("Failed to load reference dataset")?,
        None => ReferenceDataset::default(),
    };

    std::fs::create_dir_all(&config.upload_dir).with_context(|| {
        format!(
            "Failed to create upload directory {}",
            config.upload_dir.display()
        )
    })?;
    info!("Upload directory: {}", config.upload_dir.display());

    let state = AppState::new(&config, recommendations, dataset);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", config.host, config.port))?;
    let addr: SocketAddr = listener.local_addr()?;
    info!("dentscan-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
