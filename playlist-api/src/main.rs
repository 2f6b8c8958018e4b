//! playlist-api - song record service
//!
//! Loads a configuration profile, connects to the record store and serves the
//! song Remote Interface over HTTP.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use playlist_api::{build_router, db, AppState};
use playlist_common::config::{profile_path, resolve_profile, AppConfig};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for playlist-api
#[derive(Parser, Debug)]
#[command(name = "playlist-api")]
#[command(about = "Song record service for the music playlist")]
#[command(version)]
struct Args {
    /// Configuration profile; loads <config-dir>/<profile>-config.toml
    #[arg(env = "PLAYLIST_PROFILE")]
    profile: Option<String>,

    /// Directory holding the profile files
    #[arg(short, long, env = "PLAYLIST_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Port to listen on (overrides rpc.port)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (profile, config_dir) = resolve_profile(args.profile.as_deref(), args.config_dir.as_deref());
    let mut config = AppConfig::load(&profile, &config_dir)
        .with_context(|| format!("Failed to load profile '{}'", profile))?;
    if let Some(port) = args.port {
        config.rpc.port = port;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        "Starting playlist-api v{} (profile '{}')",
        env!("CARGO_PKG_VERSION"),
        profile
    );
    info!("Configuration: {}", profile_path(&profile, &config_dir).display());

    info!("Creating connection to database");
    let pool = match db::connect(&config.database).await {
        Ok(pool) => {
            info!("Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {:#}", e);
            return Err(e);
        }
    };

    let state = AppState::from_pool(pool.clone(), &config.database);
    let app = build_router(state);

    let addr = config.rpc.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Could not listen on {}", addr))?;
    info!("playlist-api listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
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
