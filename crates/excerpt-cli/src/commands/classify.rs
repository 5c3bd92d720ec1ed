//! Classify command: language tag per reference

use anyhow::Result;
use colored::Colorize;
use excerpt_core::Config;
use serde_json::json;

use crate::output::ListFormat;

/// Execute the classify command
pub fn execute(references: &[String], format: ListFormat, config: &Config) -> Result<()> {
    let classifier = config.classifier();
    let rows: Vec<(&str, &str)> = references
        .iter()
        .map(|reference| (reference.as_str(), classifier.classify(reference)))
        .collect();

    match format {
        ListFormat::Text => {
            let width = rows.iter().map(|(reference, _)| reference.len()).max().unwrap_or(0);
            for (reference, tag) in rows {
                println!("{reference:<width$}  {}", tag.cyan());
            }
        },
        ListFormat::Json => {
            let out: Vec<_> = rows
                .into_iter()
                .map(|(reference, language)| json!({ "reference": reference, "language": language }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        },
    }
    Ok(())
}
