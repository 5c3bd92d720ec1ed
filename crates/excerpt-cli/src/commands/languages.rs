//! Languages command: registered grammars and the suffixes that select them

use std::collections::BTreeMap;

use anyhow::Result;
use colored::Colorize;
use excerpt_core::Config;
use excerpt_core::language::builtin_suffixes;
use serde_json::json;

use crate::output::ListFormat;

/// Execute the languages command
pub fn execute(format: ListFormat, config: &Config) -> Result<()> {
    let registry = config.grammar_registry()?;

    // Configured rules are consulted before the built-in table
    let mut suffixes: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let configured = config
        .languages
        .iter()
        .map(|rule| (rule.suffix.clone(), rule.tag.clone()));
    let builtin = builtin_suffixes().map(|(suffix, tag)| (suffix.to_string(), tag.to_string()));
    for (suffix, tag) in configured.chain(builtin) {
        suffixes.entry(tag).or_default().push(suffix);
    }

    let mut tags: Vec<String> = registry.tags().into_iter().map(str::to_string).collect();
    for tag in suffixes.keys() {
        if !tags.iter().any(|known| known == tag) {
            tags.push(tag.clone());
        }
    }
    tags.sort();

    let rows: Vec<(String, usize, Vec<String>)> = tags
        .into_iter()
        .map(|tag| {
            let rules = registry.rules(&tag).map_or(0, <[_]>::len);
            let matched = suffixes.remove(&tag).unwrap_or_default();
            (tag, rules, matched)
        })
        .collect();

    match format {
        ListFormat::Text => {
            let width = rows.iter().map(|(tag, ..)| tag.len()).max().unwrap_or(0);
            for (tag, rules, matched) in &rows {
                let grammar = if registry.contains(tag) {
                    format!("{rules:>2} rule(s)").normal()
                } else {
                    "no grammar".dimmed()
                };
                println!(
                    "{}  {grammar}  {}",
                    format!("{tag:<width$}").bold(),
                    matched.join(" ").dimmed()
                );
            }
        },
        ListFormat::Json => {
            let out: Vec<_> = rows
                .into_iter()
                .map(|(tag, rules, matched)| {
                    json!({
                        "language": tag,
                        "grammar": registry.contains(&tag),
                        "rules": rules,
                        "suffixes": matched,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        },
    }
    Ok(())
}
