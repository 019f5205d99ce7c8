//! TOS MCP Server CLI
//!
//! Reads `TOS_ACCESS_KEY`, `TOS_SECRET_KEY`, `TOS_REGION` and `TOS_ENDPOINT`
//! from the environment and serves the tool catalog over stdio.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use mcp_server::transport::{StreamTransport, TransportMode};
use tos_mcp::{TosClient, TosConfig, build_server};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tos-mcp")]
#[command(about = "TOS object storage Model Context Protocol server", version, long_about = None)]
struct Cli {
    /// Transport to serve on (stdio, sse)
    #[arg(short, long, default_value = "stdio")]
    transport: TransportMode,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the protocol, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = cli.transport.ensure_available() {
        tracing::error!("{e}");
        std::process::exit(2);
    }

    let config = match TosConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(region = %config.region, endpoint = %config.endpoint, "Starting TOS MCP Server in stdio mode");

    let server = build_server(Arc::new(TosClient::new(&config)))?;
    let session = server.serve(StreamTransport::stdio()).await?;

    tracing::info!(requests = session.requests_handled(), "Client disconnected, shutting down");
    Ok(())
}
