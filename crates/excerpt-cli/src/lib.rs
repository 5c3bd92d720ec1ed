//! excerpt CLI - include anchored, highlighted source snippets in documentation
//!
//! Command implementations live in [`commands`]; this module wires argument
//! parsing, logging and configuration together.

use anyhow::Result;
use clap::Parser;
use excerpt_core::Config;
use tracing::debug;

mod cli;
mod commands;
pub mod error;
mod output;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::utils::initialize_logging;

/// Execute the excerpt CLI with the current arguments and environment.
///
/// # Errors
///
/// Returns an error if configuration loading or the selected command fails.
pub async fn run() -> Result<()> {
    // Exit quietly when a pipe reader goes away
    std::panic::set_hook(Box::new(|info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe") || msg.contains("broken pipe") {
            std::process::exit(0);
        }
        eprintln!("{msg}");
    }));

    let cli = Cli::parse();
    initialize_logging(&cli)?;

    let config = Config::load(cli.config.as_deref()).map_err(CliError::core)?;
    debug!(timeout_secs = config.fetch.timeout_secs, "configuration loaded");

    execute_command(cli, &config).await
}

async fn execute_command(cli: Cli, config: &Config) -> Result<()> {
    match cli.command {
        Commands::Render(args) => commands::render_document(&args, config, cli.quiet).await,
        Commands::Extract(args) => commands::extract_snippet(&args, config).await,
        Commands::Classify { references, format } => {
            commands::classify_references(&references, format, config)
        },
        Commands::Languages { format } => commands::list_languages(format, config),
    }
}
