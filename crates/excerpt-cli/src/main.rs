//! excerpt binary entry point

use std::process::ExitCode;

use colored::Colorize;
use excerpt_cli::error::exit_code_from_error;

#[tokio::main]
async fn main() -> ExitCode {
    match excerpt_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(exit_code_from_error(&err))
        },
    }
}
