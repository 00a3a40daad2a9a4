//! Strictly Ascend - Unified CLI
//!
//! Workshop quest server with REST and MCP modes of operation.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use rmcp::ServiceExt;
use strictly_ascend::{AscendConfig, GameServer, rest};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Server => run_mcp_server(&cli.config).await,
        Command::Http { port, host, seed } => {
            run_http_server(&cli.config, host, port, seed).await
        }
    }
}

/// Run the MCP tool server (stdio mode)
async fn run_mcp_server(config_path: &std::path::Path) -> Result<()> {
    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("Starting Strictly Ascend MCP server");

    let config = AscendConfig::load(config_path)?;
    let store = config.session_store()?;
    let server = GameServer::with_store(store, &config);

    info!("Server ready - connect via MCP protocol");
    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;

    Ok(())
}

/// Run the REST API and browser front-end
#[instrument(skip(config_path))]
async fn run_http_server(
    config_path: &std::path::Path,
    host: Option<String>,
    port: Option<u16>,
    seed: Option<u64>,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let mut config = AscendConfig::load(config_path)?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if seed.is_some() {
        config = config.with_quiz_seed(seed);
    }

    let store = config.session_store()?;
    let app = rest::app(store, config.static_dir());

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(
        host = %config.host(),
        port = config.port(),
        static_dir = %config.static_dir().display(),
        "AWS Ascend Game running on http://localhost:{}",
        config.port()
    );

    axum::serve(listener, app).await?;

    Ok(())
}
