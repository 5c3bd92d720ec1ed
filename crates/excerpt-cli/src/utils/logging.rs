//! Logging initialization and color control.

use anyhow::Result;
use colored::control as color_control;
use is_terminal::IsTerminal;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;

/// Initialize the tracing subscriber from the global flags.
///
/// Logs always go to stderr so rendered output on stdout stays clean. JSON
/// output raises the level to errors only unless `--verbose` was given.
/// Colors are disabled for `--no-color`, `NO_COLOR`, JSON output and when
/// stdout is not a terminal.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let machine_output = cli.machine_output();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet || machine_output {
        Level::ERROR
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let env_no_color = std::env::var_os("NO_COLOR").is_some();
    let piped = !std::io::stdout().is_terminal();
    if cli.no_color || env_no_color || machine_output || piped {
        color_control::set_override(false);
    }
    Ok(())
}
