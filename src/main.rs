//! # Corpus Harness CLI (`cor`)
//!
//! The `cor` binary is the primary interface for Corpus Harness. It starts
//! the MCP-compatible HTTP server and provides introspection of the
//! registered tool set.
//!
//! ## Usage
//!
//! ```bash
//! cor --config ./config/cor.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cor serve mcp` | Start the MCP-compatible HTTP server |
//! | `cor tools` | List the registered tools and their parameter schemas |
//!
//! ## Examples
//!
//! ```bash
//! # Start the server on the configured bind address
//! cor serve mcp --config ./config/cor.toml
//!
//! # Show the tool protocol exposed to agents
//! cor tools
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use corpus_harness::{config, server, tools::ToolRegistry};

/// Corpus Harness CLI — an in-memory document ingestion and full-text
/// search service for AI tools.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/cor.example.toml` for a full example; a missing file
/// falls back to defaults.
#[derive(Parser)]
#[command(
    name = "cor",
    about = "Corpus Harness — an in-memory document ingestion and full-text search service for AI tools",
    version,
    long_about = "Corpus Harness stores already-extracted document text in a volatile in-memory \
    index and answers substring search queries with match positions, bounded context, and \
    highlighted previews, exposed to LLM agents via an MCP-compatible HTTP server."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/cor.toml`. Server bind address and search
    /// defaults are read from this file; a missing file uses built-in
    /// defaults.
    #[arg(long, global = true, default_value = "./config/cor.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the MCP-compatible HTTP server.
    ///
    /// Exposes the register, search, get_content, list, and remove tools
    /// via a JSON API and an MCP Streamable HTTP endpoint for integration
    /// with Cursor, Claude, and other MCP-compatible AI tools. The store
    /// starts empty and lives exactly as long as the process.
    Serve {
        #[command(subcommand)]
        service: ServeService,
    },

    /// List the registered tools and their parameter schemas.
    ///
    /// Prints the tool protocol exactly as agents discover it via
    /// `GET /tools/list`.
    Tools,
}

/// Server protocols.
#[derive(Subcommand)]
enum ServeService {
    /// MCP-compatible HTTP server (JSON tools API + Streamable HTTP).
    Mcp,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve { service } => match service {
            ServeService::Mcp => {
                server::run_server(&cfg).await?;
            }
        },
        Commands::Tools => {
            let registry = ToolRegistry::with_builtins();
            for tool in registry.tools() {
                println!("{} — {}", tool.name(), tool.description());
                println!(
                    "{}",
                    serde_json::to_string_pretty(&tool.parameters_schema())?
                );
                println!();
            }
        }
    }

    Ok(())
}
