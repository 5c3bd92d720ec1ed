//! # CLI Structure and Argument Parsing
//!
//! ```bash
//! # Fill every placeholder of a page, resolving sources next to it
//! excerpt render docs/tutorial/step1.html -o site/step1.html
//!
//! # Try out anchors against one file
//! excerpt extract WirelessA.ned --from '^network' --upto '^}'
//!
//! # Inspect the language table and grammars
//! excerpt classify omnetpp.ini Dockerfile
//! excerpt languages
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::{ListFormat, OutputFormat};

/// Main CLI structure for the `excerpt` command
#[derive(Parser, Clone, Debug)]
#[command(name = "excerpt")]
#[command(version)]
#[command(about = "excerpt - Include anchored, highlighted source snippets in documentation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Path to configuration file (overrides `EXCERPT_CONFIG` and autodiscovery)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available subcommands for the `excerpt` CLI
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Fill every `<pre src=…>` placeholder of a document
    ///
    /// Each placeholder is replaced by the highlighted snippet its anchors
    /// select. Sources are resolved relative to the document's directory
    /// unless `--base` is given, and each distinct source is fetched once.
    /// A placeholder whose source cannot be fetched or whose pattern is
    /// malformed is replaced by an inline error; the others are unaffected.
    Render(RenderArgs),

    /// Extract one snippet from a file or URL
    ///
    /// `--from` / `--after` choose the start (anchor line kept / skipped);
    /// `--until` / `--upto` choose the end (anchor line skipped / kept).
    /// Without any anchor the whole file is printed.
    Extract(ExtractArgs),

    /// Print the language tag chosen for each reference
    Classify {
        /// File names, paths or URLs
        #[arg(value_name = "REF", required = true)]
        references: Vec<String>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },

    /// List the registered grammars and the suffixes mapped to them
    Languages {
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },
}

/// Arguments for `excerpt render`
#[derive(Args, Clone, Debug)]
pub struct RenderArgs {
    /// Host document (HTML or Markdown with embedded HTML)
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short = 'o', long, value_name = "OUT")]
    pub output: Option<PathBuf>,

    /// Directory or URL relative source references resolve against
    #[arg(long, value_name = "DIR|URL")]
    pub base: Option<String>,

    /// Exit with an error if any placeholder failed
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `excerpt extract`
#[derive(Args, Clone, Debug)]
pub struct ExtractArgs {
    /// Source file path or URL
    #[arg(value_name = "SRC")]
    pub source: String,

    /// Start at the first line matching this pattern (line included)
    #[arg(long, value_name = "PATTERN")]
    pub from: Option<String>,

    /// Start after the first line matching this pattern (line excluded)
    #[arg(long, value_name = "PATTERN")]
    pub after: Option<String>,

    /// Stop before the next line matching this pattern (line excluded)
    #[arg(long, value_name = "PATTERN")]
    pub until: Option<String>,

    /// Stop at the next line matching this pattern (line included)
    #[arg(long, value_name = "PATTERN")]
    pub upto: Option<String>,

    /// Strip everything from this pattern to the end of each line
    #[arg(long, value_name = "PATTERN")]
    pub comment: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Highlight with this grammar instead of the one the suffix selects
    #[arg(short = 'l', long, value_name = "TAG")]
    pub language: Option<String>,
}

impl Cli {
    /// Whether the selected command writes machine-readable output.
    pub const fn machine_output(&self) -> bool {
        match &self.command {
            Commands::Extract(args) => matches!(args.format, OutputFormat::Json),
            Commands::Classify { format, .. } | Commands::Languages { format } => {
                matches!(format, ListFormat::Json)
            },
            Commands::Render(_) => false,
        }
    }
}
