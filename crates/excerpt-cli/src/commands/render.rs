//! Render command: fill every placeholder of a host document

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use excerpt_core::{Config, Includer, IncludeReport};
use tracing::{debug, info};

use crate::cli::RenderArgs;
use crate::error::{CliError, ErrorCategory};

/// Execute the render command
pub async fn execute(args: &RenderArgs, config: &Config, quiet: bool) -> Result<()> {
    let document = read_document(&args.document).await?;

    let fetcher = config.fetcher()?;
    let fetcher = match args.base.as_deref() {
        Some(base) if is_url(base) => fetcher.with_base_url(base)?,
        Some(base) => fetcher.with_base_dir(base),
        None => fetcher.with_base_dir(document_dir(&args.document)),
    };

    let includer = Includer::from_config(fetcher, config)?;
    let report = includer.include(&document).await;
    info!(
        placeholders = report.snippets.len(),
        sources = includer.cache().len(),
        "rendered {}",
        args.document.display()
    );

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &report.document)
                .await
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            debug!("wrote {} bytes to {}", report.document.len(), path.display());
        },
        None => print!("{}", report.document),
    }

    if !quiet {
        print_summary(&report, includer.cache().len());
    }

    if args.strict {
        check_strict(&report)?;
    }
    Ok(())
}

async fn read_document(path: &Path) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CliError::not_found(anyhow!(
            "No such document '{}'",
            path.display()
        ))
        .into()),
        Err(e) => Err(anyhow::Error::new(e).context(format!("Failed to read '{}'", path.display()))),
    }
}

fn is_url(base: &str) -> bool {
    base.starts_with("http://") || base.starts_with("https://") || base.starts_with("file://")
}

/// Directory sources are resolved from when no `--base` is given.
fn document_dir(document: &Path) -> PathBuf {
    document
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn print_summary(report: &IncludeReport, sources: usize) {
    for failed in report.failures() {
        if let Err(err) = &failed.outcome {
            eprintln!(
                "{} {}: {err}",
                "warning:".yellow().bold(),
                failed.placeholder.source_reference
            );
        }
    }

    let total = report.snippets.len();
    let failed = report.failures().count();
    let mark = if failed == 0 { "✓".green() } else { "!".yellow() };
    eprintln!(
        "{mark} {} of {total} snippet(s) included from {sources} source(s)",
        total - failed
    );
}

fn check_strict(report: &IncludeReport) -> Result<()> {
    let failed = report.failures().count();
    let Some(first) = report.failures().next() else {
        return Ok(());
    };

    let category = first
        .outcome
        .as_ref()
        .err()
        .map_or(ErrorCategory::Internal, ErrorCategory::from_core);
    Err(CliError::new(
        category,
        anyhow!(
            "{failed} of {} placeholder(s) failed; first: {}",
            report.snippets.len(),
            first.placeholder.source_reference
        ),
    )
    .into())
}
