//! # Output Formatting
//!
//! - **Text**: line-numbered snippets painted with ANSI colors
//! - **JSON**: the rendered snippet with its tokens, for scripting
//! - **HTML**: the same table the `render` command splices into documents

mod text;

pub use text::paint_snippet;

/// Output format for `extract`
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Line-numbered, colored text (default)
    Text,
    /// Single JSON object
    Json,
    /// HTML table
    Html,
}

/// Output format for listing commands
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ListFormat {
    /// Aligned text (default)
    Text,
    /// JSON array
    Json,
}
