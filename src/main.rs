//! Chat gateway binary.
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │                CHAT GATEWAY                  │
//!                 │                                              │
//!  Client ────────┼─▶ http ──▶ admission ──▶ chat backend ──▶    │
//!  Request        │    server    │  validate → rate-limit        │
//!                 │              ▼                               │
//!                 │         quota store (keyed daily counters)   │
//!                 │                                              │
//!  Client ◀───────┼── security headers ◀── response ◀────────────┼── Upstream
//!  Response       │                                              │
//!                 └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use chat_gateway::chat::UpstreamChatBackend;
use chat_gateway::config::loader::load_config;
use chat_gateway::net::BoundedListener;
use chat_gateway::observability::{logging, metrics};
use chat_gateway::quota::InMemoryQuotaStore;
use chat_gateway::{GatewayConfig, HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "chat-gateway")]
#[command(about = "Admission-controlled public chat endpoint")]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_tracing("chat_gateway=debug,tower_http=debug");

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(port) = args.port {
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{host}:{port}");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        daily_request_limit = config.admission.daily_request_limit,
        max_message_length = config.admission.max_message_length,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = BoundedListener::bind(&config.listener).await?;

    let store = Arc::new(InMemoryQuotaStore::new());
    let chat = Arc::new(UpstreamChatBackend::new(&config.chat_backend));

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config, store, chat);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
