//! Heartbeat relay
//!
//! Keeps a heartbeat, generates demo errors, and forwards structured logs
//! in batches to a remote HTTP log intake.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────┐   ┌──────────────┐        ┌─────────────────────┐
//!   │  heartbeat   │   │ mock errors  │        │   HTTP handlers     │
//!   │    task      │   │    task      │        │ /health /heartbeat  │
//!   └──────┬───────┘   └──────┬───────┘        │ /api/status ...     │
//!          │ writes           │ writes         └───┬─────────┬───────┘
//!          ▼                  ▼                    │ reads   │ tracing
//!   ┌──────────────┐   ┌──────────────┐ ◀──────────┘         ▼
//!   │  Heartbeat   │   │   ErrorLog   │          ┌─────────────────────┐
//!   └──────────────┘   └──────────────┘          │    IntakeLayer      │
//!                                                └──────────┬──────────┘
//!                                                           ▼
//!                      ┌──────────────┐  POST    ┌─────────────────────┐
//!     log intake  ◀────│ flusher task │◀─────────│     Forwarder       │
//!                      └──────────────┘          └─────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use clap::Parser;
use tokio::net::TcpListener;

use heartbeat_relay::config::load_config;
use heartbeat_relay::lifecycle::{wait_for_signal, Services, Shutdown};
use heartbeat_relay::observability::{init_logging, metrics};
use heartbeat_relay::{HttpServer, RelayError};

#[derive(Parser)]
#[command(name = "heartbeat-relay", version)]
#[command(about = "Demo service that forwards its logs to a remote intake")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), RelayError> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    let services = Services::build(&config)?;
    init_logging(&config.observability, services.log_sink())?;

    tracing::info!("heartbeat-relay v{} starting", env!("CARGO_PKG_VERSION"));
    if services.forwarder.is_some() {
        tracing::info!(
            service = %config.intake.service,
            env = %config.intake.env,
            site = %config.intake.site,
            endpoint = %config.intake.endpoint(),
            "Log intake enabled"
        );
    } else {
        tracing::warn!(
            api_key_env = %config.intake.api_key_env,
            "Log intake disabled, API key not set. Logging to console only"
        );
    }

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
            metrics::init_metrics(addr)?;
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| RelayError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let tasks = services.spawn_tasks(&config, &shutdown);

    let server = HttpServer::new(&config.listener, services.app_state(&config));
    let server_shutdown = shutdown.subscribe();
    let server_handle = tokio::spawn(server.run(listener, server_shutdown));

    wait_for_signal().await;
    shutdown.trigger();

    for task in tasks {
        let _ = task.await;
    }
    match server_handle.await {
        Ok(result) => result?,
        Err(e) => tracing::error!(error = %e, "HTTP server task failed"),
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
