//! Basewatch Service - HTTP API for location change tracking.
//!
//! Run with: `cargo run -p basewatch-service`

use std::path::PathBuf;

use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use basewatch_service::{AppState, Config, StorageKind, api, default_config_path};

/// Basewatch Service - HTTP REST API for location change tracking.
#[derive(Parser, Debug)]
#[command(name = "basewatch-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config).
    #[arg(short, long)]
    bind: Option<String>,

    /// Store path (overrides config).
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Storage backend (overrides config).
    #[arg(long, value_enum)]
    backend: Option<StorageKind>,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("basewatch_service=info".parse()?)
                .add_directive("basewatch_core=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(path) = args.store {
        config.storage.path = path;
    }
    if let Some(backend) = args.backend {
        config.storage.backend = backend;
    }
    config.validate()?;

    if args.write_config {
        let path = args.config.unwrap_or_else(default_config_path);
        config.save(&path)?;
        info!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    info!(
        "Opening {:?} store at {}",
        config.storage.backend,
        config.storage.path.display()
    );
    let state = AppState::from_config(config.clone())?;

    let app = Router::new()
        .merge(api::router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr = config.server.resolve().await?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
