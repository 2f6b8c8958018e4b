//! playlist-web - HTML form front-end
//!
//! Serves the playlist page and forwards form actions to playlist-api.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use playlist_common::config::{profile_path, resolve_profile, AppConfig};
use playlist_web::{build_router, AppState, SongApiClient};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for playlist-web
#[derive(Parser, Debug)]
#[command(name = "playlist-web")]
#[command(about = "HTML front-end for the music playlist")]
#[command(version)]
struct Args {
    /// Configuration profile; loads <config-dir>/<profile>-config.toml
    #[arg(env = "PLAYLIST_PROFILE")]
    profile: Option<String>,

    /// Directory holding the profile files
    #[arg(short, long, env = "PLAYLIST_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Port to listen on (overrides web.port)
    #[arg(short, long)]
    port: Option<u16>,

    /// playlist-api base URL (overrides the one derived from rpc.host/rpc.port)
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (profile, config_dir) = resolve_profile(args.profile.as_deref(), args.config_dir.as_deref());
    let mut config = AppConfig::load(&profile, &config_dir)
        .with_context(|| format!("Failed to load profile '{}'", profile))?;
    if let Some(port) = args.port {
        config.web.port = port;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        "Starting playlist-web v{} (profile '{}')",
        env!("CARGO_PKG_VERSION"),
        profile
    );
    info!("Configuration: {}", profile_path(&profile, &config_dir).display());

    let api_url = args.api_url.unwrap_or_else(|| config.rpc.base_url());
    let client = SongApiClient::new(api_url).context("Failed to create song API client")?;
    info!("Song API: {}", client.base_url());

    let app = build_router(AppState::new(client));

    let addr = config.web.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Could not listen on {}", addr))?;
    info!("playlist-web listening on http://{}/playlist", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

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
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
