//! Probe Spaces coordination server
//!
//! WebSocket signaling for collaborative browsing sessions: spaces are
//! created and joined over `/ws`, with `/health` and `/spaces` as the HTTP
//! side channel.

mod http;
mod hub;
mod ws;

use anyhow::Result;
use clap::Parser;
use http::AppState;
use hub::ConnectionHub;
use probespaces_core::config::Config;
use probespaces_core::logging::{init_logging_with_config, LogConfig, LogLevel};
use probespaces_core::shutdown::ShutdownCoordinator;
use probespaces_core::{Broadcaster, SpaceCoordinator};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "probespaces-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides PORT and config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(host) = &args.host {
        let port = config.server.bind_address.port();
        config.server.bind_address = format!("{}:{}", host, port).parse()?;
    }
    if let Some(port) = args.port {
        config.server.bind_address.set_port(port);
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.json_format = true;
    }

    let log_level: LogLevel = config.logging.level.parse().unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level '{}', using 'info'",
            config.logging.level
        );
        LogLevel::Info
    });
    init_logging_with_config(LogConfig::new(log_level).json_format(config.logging.json_format))?;

    let hub = Arc::new(ConnectionHub::new());
    let broadcaster: Arc<dyn Broadcaster> = hub.clone();
    let coordinator = Arc::new(SpaceCoordinator::new(broadcaster));
    let shutdown = Arc::new(ShutdownCoordinator::new(config.server.shutdown_timeout));

    let app = http::router(AppState { coordinator, hub });

    let addr = config.server.bind_address;
    let listener = TcpListener::bind(addr).await?;
    info!("Probe Spaces server running on {}", addr);
    info!("WebSocket endpoint: ws://{}/ws", addr);
    info!("Health check: http://{}/health", addr);

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            wait_for_signal().await;
            shutdown.shutdown();
        }
    });

    let mut shutdown_rx = shutdown.subscribe();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve on SIGTERM or ctrl-c, whichever comes first
async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install ctrl-c handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl-c"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
