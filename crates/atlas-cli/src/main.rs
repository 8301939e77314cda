//! Atlas CLI Application
//!
//! Command-line and MCP front end for the Atlas trip-planning orchestrator.

mod args;
mod cli;
mod mcp;
mod renderer;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands};
use atlas_core::{
    display::OperationStatus, AtlasError, MemoryStore, OrchestratorBuilder, OrchestratorConfig,
};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, AtlasMcpServer};
use renderer::TerminalRenderer;

/// Exit status for rejected requests (bad input, unknown plan, wrong state).
const EXIT_CLIENT: u8 = 2;
/// Exit status for conflicts that may clear up on retry (EX_TEMPFAIL).
const EXIT_TRANSIENT: u8 = 75;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<AtlasError>() {
            Some(atlas) => {
                eprint!("{}", OperationStatus::from_error(atlas));
                if atlas.is_client_error() {
                    ExitCode::from(EXIT_CLIENT)
                } else if atlas.is_transient() {
                    ExitCode::from(EXIT_TRANSIENT)
                } else {
                    ExitCode::FAILURE
                }
            }
            None => {
                eprintln!("Error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(args: Args) -> Result<()> {
    let Args {
        database_file,
        config,
        ephemeral,
        no_color,
        json,
        command,
    } = args;

    let config = OrchestratorConfig::load(config.as_deref())
        .context("Failed to load orchestrator config")?;

    let mut builder = OrchestratorBuilder::new().with_config(config);
    builder = if ephemeral {
        builder.with_store(Arc::new(MemoryStore::new()))
    } else {
        builder.with_database_path(database_file)
    };
    let orchestrator = builder
        .build()
        .await
        .context("Failed to initialize orchestrator")?;

    info!("Atlas started");

    let renderer = TerminalRenderer::new(!no_color, json);
    match command {
        Commands::Start(args) => Cli::new(orchestrator, renderer).start(args).await,
        Commands::Continue(args) => Cli::new(orchestrator, renderer).continue_plan(args).await,
        Commands::Status(args) => Cli::new(orchestrator, renderer).status(args).await,
        Commands::Finalize(args) => Cli::new(orchestrator, renderer).finalize(args).await,
        Commands::Serve => {
            info!("Starting Atlas MCP server");
            run_stdio_server(AtlasMcpServer::new(orchestrator))
                .await
                .context("MCP server failed")
        }
    }
}
