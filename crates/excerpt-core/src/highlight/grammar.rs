//! Grammar rules and the tag → rules registry.

use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::builtin;
use crate::{Error, Result};

/// What happens to one capture group of a matching rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// Paint the group with a token classification.
    Class(String),
    /// Re-tokenize the group with another grammar.
    Language(String),
}

/// A compiled tokenizer rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    name: Option<String>,
    captures: Vec<(usize, Capture)>,
}

impl Rule {
    /// A rule that classifies its whole match as `name`.
    pub fn named(name: impl Into<String>, pattern: &str) -> Result<Self> {
        RuleSpec {
            name: Some(name.into()),
            pattern: pattern.to_string(),
            matches: BTreeMap::new(),
        }
        .compile()
    }

    /// The rule's pattern.
    pub const fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Classification of the whole match, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Capture group actions, ordered by group index.
    pub fn captures(&self) -> &[(usize, Capture)] {
        &self.captures
    }
}

/// Declarative form of a [`Capture`], as written in grammar files.
///
/// Either a bare classification string or `{ language = "tag" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaptureSpec {
    /// Token classification.
    Class(String),
    /// Nested language.
    Language {
        /// Tag of the grammar used for the group.
        language: String,
    },
}

/// Declarative form of a [`Rule`].
///
/// ```toml
/// [[grammars.ned.rules]]
/// pattern = '\b(module|network)\b'
/// matches = { 1 = "keyword" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Classification of the whole match.
    #[serde(default)]
    pub name: Option<String>,
    /// Regular expression; use `(?m)` for line anchors.
    pub pattern: String,
    /// Capture group (index or name) → action.
    #[serde(default)]
    pub matches: BTreeMap<String, CaptureSpec>,
}

impl RuleSpec {
    /// Compile the pattern and resolve capture keys to group indices.
    pub fn compile(&self) -> Result<Rule> {
        let pattern = Regex::new(&self.pattern)
            .map_err(|e| Error::Config(format!("invalid rule pattern {:?}: {e}", self.pattern)))?;

        let mut captures = Vec::with_capacity(self.matches.len());
        for (key, spec) in &self.matches {
            let index = capture_index(&pattern, key).ok_or_else(|| {
                Error::Config(format!(
                    "rule pattern {:?} has no capture group '{key}'",
                    self.pattern
                ))
            })?;
            let action = match spec {
                CaptureSpec::Class(class) => Capture::Class(class.clone()),
                CaptureSpec::Language { language } => Capture::Language(language.clone()),
            };
            captures.push((index, action));
        }
        captures.sort_by_key(|(index, _)| *index);

        Ok(Rule {
            pattern,
            name: self.name.clone(),
            captures,
        })
    }
}

fn capture_index(pattern: &Regex, key: &str) -> Option<usize> {
    if let Ok(index) = key.parse::<usize>() {
        return (index > 0 && index < pattern.captures_len()).then_some(index);
    }
    pattern
        .capture_names()
        .position(|name| name == Some(key))
}

/// An ordered rule list loaded from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarSpec {
    /// Rules in priority order.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

impl GrammarSpec {
    /// Compile every rule.
    pub fn compile(&self) -> Result<Vec<Rule>> {
        self.rules.iter().map(RuleSpec::compile).collect()
    }
}

/// Language tag → ordered rule list.
///
/// Built explicitly and then only read, so tests can create as many
/// independent registries as they like.
#[derive(Debug, Clone, Default)]
pub struct GrammarRegistry {
    grammars: HashMap<String, Vec<Rule>>,
}

impl GrammarRegistry {
    /// A registry without any grammar; every tag renders as plain text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry with the bundled grammars.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for (tag, spec) in builtin::grammars() {
            match spec.compile() {
                Ok(rules) => registry.register(tag, rules),
                Err(e) => error!(tag, error = %e, "skipping bundled grammar"),
            }
        }
        registry
    }

    /// Add or replace the grammar for `tag`.
    pub fn register(&mut self, tag: impl Into<String>, rules: Vec<Rule>) {
        self.grammars.insert(tag.into(), rules);
    }

    /// Compile and register a declarative grammar.
    pub fn register_spec(&mut self, tag: impl Into<String>, spec: &GrammarSpec) -> Result<()> {
        let rules = spec.compile()?;
        self.register(tag, rules);
        Ok(())
    }

    /// Rules for `tag`, if registered.
    pub fn rules(&self, tag: &str) -> Option<&[Rule]> {
        self.grammars.get(tag).map(Vec::as_slice)
    }

    /// Whether `tag` is registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.grammars.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.grammars.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}
