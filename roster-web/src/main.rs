//! roster-web - fleet roster dashboard service
//!
//! Syncs the fleet roster spreadsheet into a JSON snapshot and serves it,
//! together with the dashboard query views, over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roster_common::config::TomlConfig;
use roster_common::recommend::Recommender;
use roster_common::store::JsonFileStore;
use roster_common::sync::SyncService;
use roster_common::time::SystemClock;
use roster_web::api::buildinfo::BUILD_INFO;
use roster_web::services::{GeminiClient, SheetsClient};
use roster_web::{build_router, AppState};

/// Command-line arguments for roster-web
#[derive(Parser, Debug)]
#[command(name = "roster-web")]
#[command(about = "Fleet roster dashboard service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "ROSTER_PORT")]
    port: Option<u16>,

    /// Directory for the snapshot, sync status and admin files
    #[arg(short, long, env = "ROSTER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "ROSTER_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: std::net::IpAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing so its log level can seed the filter
    let config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?
        .apply_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "roster_web={level},roster_common={level},tower_http={level}",
                    level = config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting fleet roster (roster-web) v{} [{}] built {} ({})",
        BUILD_INFO.version, BUILD_INFO.git_hash, BUILD_INFO.build_timestamp, BUILD_INFO.build_profile
    );

    let data_dir = args.data_dir.clone().unwrap_or_else(|| config.data_dir());
    let store = Arc::new(
        JsonFileStore::open(&data_dir)
            .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?,
    );
    info!("Data directory: {}", data_dir.display());

    if config.sheets.validate().is_err() {
        warn!("Google Sheets configuration incomplete; syncs will fail until it is set");
    }

    let recommender: Option<Arc<dyn Recommender>> =
        match GeminiClient::from_config(&config.recommender)? {
            Some(client) => {
                info!("Recommendations enabled (model {})", config.recommender.model());
                Some(Arc::new(client))
            }
            None => {
                info!("Recommendation backend not configured; /api/recommendations disabled");
                None
            }
        };

    let admin_token = config.admin_token().map(str::to_string);
    if admin_token.is_none() {
        warn!("ADMIN_TOKEN not set; admin routes will reject every request");
    }

    let sync = Arc::new(SyncService::new(
        Arc::new(SheetsClient::new()?),
        store,
        Arc::new(SystemClock),
        config.sheets.clone(),
    ));

    let app = build_router(AppState::new(sync, recommender, admin_token));

    let port = args.port.unwrap_or_else(|| config.port());
    let addr = SocketAddr::new(args.bind, port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("roster-web listening on http://{}", addr);
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
            warn!("Failed to install Ctrl+C handler: {}", e);
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
                warn!("Failed to install terminate handler: {}", e);
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
