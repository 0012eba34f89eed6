//! Devwarden Server
//!
//! HTTP console where devices sign in and administrators manage them.

use clap::Parser;
use tracing::info;

use devwarden_core::tracing_init::{LogTarget, init_tracing};
use devwarden_server::ServerConfig;
use devwarden_server::routes::{AppState, build_router};
use devwarden_server::storage::DeviceDatabase;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    init_tracing("devwarden_server=info,tower_http=info", config.log_json, LogTarget::Stdout);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.addr,
        "Starting devwarden-server"
    );

    let credentials = config.credentials()?;
    let db_path = config.resolved_db_path()?;
    info!(path = %db_path.display(), "Opening device database");
    let db = DeviceDatabase::open(&db_path).await?;

    let app = build_router(AppState::new(db, credentials));
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "Console listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received shutdown signal");
        })
        .await?;

    info!("Console stopped");
    Ok(())
}
