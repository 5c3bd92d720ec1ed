//! Configuration for fetching, rendering and grammars.
//!
//! Configuration is stored as TOML. Every section is optional; a missing file
//! behaves like an empty one.
//!
//! ## File location
//!
//! 1. An explicit path (the CLI's `--config`)
//! 2. `$EXCERPT_CONFIG`
//! 3. The platform config directory, e.g. `~/.config/excerpt/config.toml` on
//!    Linux
//!
//! ## Example
//!
//! ```toml
//! [fetch]
//! timeout_secs = 10
//!
//! [render]
//! line_numbers = false
//!
//! [[languages]]
//! suffix = ".msg"
//! tag = "ned"
//!
//! [grammars.toml]
//! rules = [ { name = "comment", pattern = "(?m)#.*$" } ]
//! ```
//!
//! ```rust
//! use excerpt_core::Config;
//!
//! let config: Config = toml::from_str("[fetch]\ntimeout_secs = 5")?;
//! assert_eq!(config.fetch.timeout_secs, 5);
//! assert!(config.render.line_numbers);
//! # Ok::<(), toml::de::Error>(())
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::highlight::{GrammarRegistry, GrammarSpec};
use crate::language::{LanguageClassifier, LanguageRule};
use crate::{Error, Fetcher, NO_MATCH_MESSAGE, Result};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "EXCERPT_CONFIG";

/// Environment variable overriding `fetch.timeout_secs`.
pub const TIMEOUT_ENV: &str = "EXCERPT_FETCH_TIMEOUT_SECS";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source fetching.
    pub fetch: FetchConfig,
    /// Snippet rendering.
    pub render: RenderConfig,
    /// Extra suffix rules, tried before the built-in table.
    pub languages: Vec<LanguageRule>,
    /// Extra or replacement grammars by tag.
    pub grammars: BTreeMap<String, GrammarSpec>,
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header for remote sources.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("excerpt/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Text shown in place of a snippet whose anchors matched nothing.
    pub no_match_message: String,
    /// Whether rendered snippets carry line numbers.
    pub line_numbers: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            no_match_message: NO_MATCH_MESSAGE.to_string(),
            line_numbers: true,
        }
    }
}

impl Config {
    /// Load from `explicit`, else `$EXCERPT_CONFIG`, else the platform config
    /// directory, then apply environment overrides.
    ///
    /// A missing file at the platform location yields defaults. A missing
    /// file named explicitly (argument or environment) is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed, or if an
    /// override variable holds an invalid value.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match named {
            Some(path) => Self::load_from(&path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load a specific file without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config '{}': {e}", path.display()))
        })?;
        let config = toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse config '{}': {e}", path.display()))
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Platform location of `config.toml`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "excerpt", "excerpt")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply `EXCERPT_*` overrides using `lookup` to read variables.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup(TIMEOUT_ENV) {
            self.fetch.timeout_secs = value.trim().parse().map_err(|_| {
                Error::Config(format!("{TIMEOUT_ENV} must be a whole number of seconds, got {value:?}"))
            })?;
        }
        Ok(())
    }

    /// Request timeout as a [`Duration`].
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_secs)
    }

    /// A fetcher with this configuration's client settings.
    pub fn fetcher(&self) -> Result<Fetcher> {
        Fetcher::with_options(self.timeout(), &self.fetch.user_agent)
    }

    /// A classifier with the configured suffix rules.
    pub fn classifier(&self) -> LanguageClassifier {
        LanguageClassifier::with_rules(self.languages.clone())
    }

    /// The bundled grammars plus the configured ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the grammar whose rules fail to compile.
    pub fn grammar_registry(&self) -> Result<GrammarRegistry> {
        let mut registry = GrammarRegistry::builtin();
        for (tag, spec) in &self.grammars {
            registry
                .register_spec(tag.as_str(), spec)
                .map_err(|e| Error::Config(format!("grammar '{tag}': {e}")))?;
        }
        Ok(registry)
    }
}
