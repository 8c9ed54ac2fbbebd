//! CI Trigger - Local Daemon
//!
//! Accepts authenticated requests from CI jobs, answers the mock `test`
//! action and runs the host maintenance script as a side effect.

#![forbid(unsafe_code)]

mod auth;
mod dispatch;
mod http_api;
mod listener;
mod maintenance;

use anyhow::{Context, Result};
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use trigger_common::AuthToken;

use dispatch::Dispatcher;
use http_api::{DEFAULT_BODY_READ_TIMEOUT, HttpState};
use listener::ListenerConfig;
use maintenance::{MaintenanceConfig, MaintenanceRunner};

const DEFAULT_PORT: u16 = 8000;

#[derive(Parser)]
#[command(name = "triggerd")]
#[command(author, version, about = "CI trigger daemon - authenticated test endpoint")]
struct Cli {
    /// TCP port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    bind: IpAddr,

    /// Maintenance script path [default: ~/server-maintenance.sh]
    #[arg(long)]
    maintenance_script: Option<PathBuf>,

    /// Maximum run time for the maintenance script
    #[arg(long, default_value = "300s", value_parser = humantime::parse_duration)]
    maintenance_timeout: Duration,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    info!("Starting CI trigger daemon...");

    let token = AuthToken::from_env();
    info!("Auth token loaded ({})", token.source);

    let script = cli
        .maintenance_script
        .or_else(maintenance::default_script_path);
    match &script {
        Some(path) => info!(
            "Maintenance script: {} (timeout {})",
            path.display(),
            humantime::format_duration(cli.maintenance_timeout)
        ),
        None => warn!("No home directory found; maintenance is disabled"),
    }

    let runner = MaintenanceRunner::new(MaintenanceConfig {
        script,
        timeout: cli.maintenance_timeout,
        ..MaintenanceConfig::default()
    });
    let router = http_api::create_router(HttpState {
        dispatcher: Dispatcher::new(token.value, runner),
        body_timeout: DEFAULT_BODY_READ_TIMEOUT,
    });

    let addr = SocketAddr::new(cli.bind, cli.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{}", listener.local_addr()?);
    info!("Press Ctrl+C to stop");

    listener::serve(
        listener,
        router,
        &ListenerConfig::default(),
        shutdown_signal(),
    )
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install interrupt handler: {}", e);
        std::future::pending::<()>().await;
    }
}
