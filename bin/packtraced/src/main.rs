//! `packtraced` — the pack tracking server binary.
//!
//! Usage:
//!   packtraced [-c <config-path>] [--listen <addr>] [--data-dir <dir>]
//!
//! All settings have defaults; CLI flags override the config file.

mod bootstrap;
mod config;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use packtrace_core::Module;
use tracing::info;

use config::ServerConfig;

/// Pack tracking server.
#[derive(Parser, Debug)]
#[command(name = "packtraced", about = "Battery pack serial tracking server")]
struct Cli {
    /// Path to config file.
    #[arg(short = 'c', long = "config", default_value = "/etc/packtrace/packtraced.toml")]
    config: PathBuf,

    /// Listen address (overrides the config file).
    #[arg(long = "listen")]
    listen: Option<String>,

    /// Data directory (overrides the config file).
    #[arg(long = "data-dir")]
    data_dir: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration, then apply CLI overrides.
    info!("Loading configuration from {}", cli.config.display());
    let mut server_config = ServerConfig::load(&cli.config)?;
    if let Some(listen) = cli.listen {
        server_config.listen = listen;
    }
    if let Some(data_dir) = cli.data_dir {
        server_config.storage.data_dir = data_dir;
    }
    bootstrap::verify_config(&server_config)?;

    // Initialize storage.
    let data_dir = PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = packtrace_core::ServiceConfig {
        data_dir: Some(data_dir.clone()),
        listen: server_config.listen.clone(),
        ..Default::default()
    };

    let backend = packtrace_store::RedbDocStore::open(&core_config.resolve_db_path())
        .map_err(|e| anyhow::anyhow!("failed to open document store: {}", e))?;
    let store = fleet::store::FleetStore::new(Box::new(backend));

    // Bootstrap: ensure the fleet document exists.
    bootstrap::ensure_fleet_document(&store)?;

    let labels_dir = core_config.resolve_labels_dir();
    std::fs::create_dir_all(&labels_dir)?;
    let renderer = Arc::new(fleet::labels::DiskLabelRenderer::new(labels_dir));

    let fleet_module = fleet::FleetModule::new(fleet::service::FleetService::new(store, renderer));
    info!("Fleet module initialized");

    let module_routes = vec![(fleet_module.name(), fleet_module.routes())];
    let app = routes::build_router(module_routes);

    let listener = tokio::net::TcpListener::bind(&server_config.listen).await?;
    info!("Listening on {}", server_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
