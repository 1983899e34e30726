//! bookwardend - The bookwarden HTTP service
//!
//! Wires together:
//! - Configuration loading
//! - Logging setup
//! - The axum router and its shared state
//! - Graceful shutdown on SIGINT / SIGTERM

use anyhow::{Context, Result};
use bookwarden_config::{ServerConfig, load_config};
use bookwarden_util::{config_path_without_env, is_mock_time_active, now};
use bookwardend::{AppState, build_router};
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// bookwardend - Reservation policy evaluation service
#[derive(Parser, Debug)]
#[command(name = "bookwardend")]
#[command(about = "Reservation policy evaluation service", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/bookwarden/config.toml)
    #[arg(short, long, env = "BOOKWARDEN_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address override (or set BOOKWARDEN_BIND env var)
    #[arg(short, long, env = "BOOKWARDEN_BIND")]
    bind: Option<SocketAddr>,

    /// Log level (default: server.log_level from config, then "info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Config file in use, and whether it came from the default location
struct LoadedConfig {
    config: ServerConfig,
    path: PathBuf,
    found: bool,
}

fn load_server_config(explicit: Option<&PathBuf>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?;
        return Ok(LoadedConfig {
            config,
            path: path.clone(),
            found: true,
        });
    }

    // A missing default config is not an error; the service runs with no groups
    let path = config_path_without_env();
    if !path.exists() {
        return Ok(LoadedConfig {
            config: ServerConfig::default(),
            path,
            found: false,
        });
    }

    let config =
        load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))?;
    Ok(LoadedConfig {
        config,
        path,
        found: true,
    })
}

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = load_server_config(args.config.as_ref())?;

    let log_level = args
        .log_level
        .clone()
        .or_else(|| loaded.config.server.log_level.clone())
        .unwrap_or_else(|| "info".to_string());
    init_logging(&log_level, args.log_format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "bookwardend starting"
    );

    if loaded.found {
        info!(
            config_path = %loaded.path.display(),
            group_count = loaded.config.groups.len(),
            "Configuration loaded"
        );
    } else {
        info!(
            config_path = %loaded.path.display(),
            "No config file found, starting without groups"
        );
    }

    if is_mock_time_active() {
        warn!(now = %now(), "Mock time is active");
    }

    let bind = args.bind.unwrap_or(loaded.config.server.bind);
    let app = build_router(AppState::new(loaded.config));

    // Set up signal handlers
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
    let mut sigint =
        signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    info!(%bind, "Service running");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM, shutting down gracefully"),
                _ = sigint.recv() => info!("Received SIGINT, shutting down gracefully"),
            }
        })
        .await
        .context("HTTP server error")?;

    info!("Shutdown complete");
    Ok(())
}
