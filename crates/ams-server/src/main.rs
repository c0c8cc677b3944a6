//! # AMS Server
//!
//! Serves the role API the admin console talks to. Configuration comes from
//! `config.toml` / `AMS_*` environment variables; command-line flags win.

use ams_api::{AppState, build_router};
use clap::Parser;
use std::net::SocketAddr;

#[derive(Debug, Parser)]
#[command(name = "ams-server", version, about = "AMS role API server")]
struct Args {
    /// Interface to bind (overrides `server.host`)
    #[arg(long, env = "AMS_HOST")]
    host: Option<String>,

    /// Port to bind (overrides `server.port`)
    #[arg(long, short, env = "AMS_PORT")]
    port: Option<u16>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = ams_common::config::init()?;

    // Initialize tracing (structured logging)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ams=debug,ams_api=debug,tower_http=debug".into());
    if args.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    }

    tracing::info!("Starting AMS role API v{}", env!("CARGO_PKG_VERSION"));

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let addr = SocketAddr::new(host.parse()?, port);

    if config.server.api_token.is_some() {
        tracing::info!("Bearer token required on /api/role");
    }

    let state = AppState::new(config.limits.clone(), config.server.api_token.clone());
    let router = build_router(state);

    tracing::info!("REST API listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
