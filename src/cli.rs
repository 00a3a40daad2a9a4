//! Command-line interface for strictly_ascend.

use clap::{Parser, Subcommand};

/// Strictly Ascend - workshop quest server with REST and MCP interfaces
#[derive(Parser, Debug)]
#[command(name = "strictly_ascend")]
#[command(about = "Workshop quest game server for browsers and LLM agents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file (optional)
    #[arg(short, long, global = true, default_value = "ascend.toml")]
    pub config: std::path::PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the MCP tool server (stdio mode)
    Server,

    /// Run the REST API and browser front-end
    Http {
        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Fixed quiz shuffle seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },
}
