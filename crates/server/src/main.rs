use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediadesk_core::{
    apply_port_override, check_tools, load_config, validate_config, FfmpegEngine, ToolsConfig,
};
use mediadesk_server::{api::create_router, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config file picked up from the working directory when present
const DEFAULT_CONFIG_FILE: &str = "mediadesk.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("mediadesk {}", VERSION);

    // An explicit path must exist; the default file is optional
    let config_path = match std::env::var("MEDIADESK_CONFIG") {
        Ok(path) => Some(PathBuf::from(path)),
        Err(_) => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
    };

    match &config_path {
        Some(path) => info!("Loading configuration from {:?}", path),
        None => info!("No configuration file, using defaults and environment"),
    }
    let mut config = load_config(config_path.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    let port_var = std::env::var("PORT").ok();
    apply_port_override(&mut config, port_var.as_deref())
        .context("Failed to apply PORT override")?;

    validate_config(&config).context("Configuration validation failed")?;

    let base_dir = match &config.media.base_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to get working directory")?,
    };
    info!("Media base directory: {}", base_dir.display());
    log_tool_status(&config.tools).await;

    let engine = FfmpegEngine::from_config(config.tools.clone());
    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, engine, base_dir));

    let app = create_router(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server successfully shut down");
    Ok(())
}

/// Startup check only; the service still runs without ffmpeg.
async fn log_tool_status(tools: &ToolsConfig) {
    let report = check_tools(tools).await;
    match report.ffmpeg_version {
        Some(version) => info!("Using {}", version),
        None => warn!(
            "ffmpeg not found at {:?}; processing requests will fail",
            tools.ffmpeg_path
        ),
    }
    if !report.ffprobe_available {
        warn!("ffprobe not found at {:?}", tools.ffprobe_path);
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}
