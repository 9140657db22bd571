//! camsync Daemon - mirrors photos from a Wi-Fi camera storage adapter
//!
//! This binary runs in the foreground (or as a user service) and handles:
//! - Loading and validating the YAML configuration
//! - Wiring the HTTP, filesystem and Wi-Fi adapters into a `SyncEngine`
//! - Polling the adapter on a fixed interval
//! - Graceful shutdown on SIGTERM/SIGINT
//!
//! # Architecture
//!
//! Everything runs on a single-threaded runtime: one crawl, one reconcile
//! and one apply per cycle, then a sleep. The loop is controlled by a
//! `CancellationToken` that is triggered on receipt of SIGTERM or SIGINT.

use std::{path::Path, sync::Arc};

use anyhow::{bail, Context, Result};
use camsync_core::config::Config;
use camsync_device::DeviceClient;
use camsync_sync::{
    applier::Applier,
    engine::SyncEngine,
    filesystem::LocalFileSystemAdapter,
    lister::RemoteLister,
    network::{ConnectivityOracle, SystemNetworkMonitor},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Startup
// ============================================================================

/// Loads the configuration at `path`, or defaults if there is no file
fn load_config(path: &Path) -> Result<Config> {
    Config::load_or_default(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Builds the tracing filter: `RUST_LOG` if set, else the configured level
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Wires adapters and components into a ready-to-run engine
fn build_engine(config: &Config) -> Result<SyncEngine> {
    let client = Arc::new(
        DeviceClient::from_config(&config.device).context("Failed to create device client")?,
    );
    let monitor = Arc::new(SystemNetworkMonitor::new(config.network.interface.clone()));

    let oracle = ConnectivityOracle::from_config(monitor, &config.network);
    let lister = RemoteLister::from_config(client.clone(), &config.device);
    let applier = Applier::new(
        client,
        Arc::new(LocalFileSystemAdapter::new()),
        config.sync.destination.clone(),
    );

    Ok(SyncEngine::from_config(oracle, lister, applier, config))
}

// ============================================================================
// Graceful shutdown signal handler
// ============================================================================

/// Waits for SIGTERM or SIGINT and triggers the cancellation token
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

// ============================================================================
// Main entry point
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config_path = Config::resolve_path();
    let config = load_config(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.logging.level))
        .with_target(true)
        .init();

    info!(config_path = %config_path.display(), "camsync daemon starting (camsyncd)");

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!(field = %e.field, "Invalid configuration: {}", e.message);
        }
        bail!("Invalid configuration in {}", config_path.display());
    }

    let mut engine = build_engine(&config)?;

    let shutdown_token = CancellationToken::new();
    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal(signal_token).await;
    });

    engine.run(config.poll_interval(), shutdown_token).await;

    info!("camsync daemon shut down gracefully");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
