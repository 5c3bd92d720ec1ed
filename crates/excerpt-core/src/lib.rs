//! # excerpt-core
//!
//! Core functionality for excerpt: include line ranges of source files in
//! documentation, selected by pattern anchors and syntax highlighted.
//!
//! ## Architecture
//!
//! - **Extraction**: [`extract`] selects a line range from a source text using
//!   the anchors of a [`BoundarySpec`]
//! - **Classification**: [`language::classify`] maps a reference to a grammar tag
//! - **Fetching**: [`Fetcher`] resolves local paths and `http(s)` URLs
//! - **Caching**: [`DocumentCache`] holds each fetched source exactly once
//! - **Highlighting**: [`GrammarRegistry`] tokenizes and renders snippets
//! - **Pipeline**: [`Includer`] fills every placeholder of a host document
//!
//! ## Quick Start
//!
//! ```rust
//! use excerpt_core::{BoundarySpec, extract};
//!
//! let source = "A\nB\nC\nD\nE";
//!
//! let result = extract(source, &BoundarySpec::new().from("B").until("D"))?;
//! assert_eq!((result.start_line, result.snippet.as_str()), (2, "B\nC"));
//!
//! let result = extract(source, &BoundarySpec::new().after("B").upto("D"))?;
//! assert_eq!((result.start_line, result.snippet.as_str()), (3, "C\nD"));
//! # Ok::<(), excerpt_core::Error>(())
//! ```
//!
//! ## Processing a document
//!
//! ```rust,no_run
//! use excerpt_core::{Config, Includer};
//!
//! # async fn run() -> excerpt_core::Result<()> {
//! let config = Config::load(None)?;
//! let includer = Includer::from_config(config.fetcher()?.with_base_dir("docs"), &config)?;
//!
//! let report = includer.include(r#"<pre src="net/Wireless.ned" from="network"></pre>"#).await;
//! for failed in report.failures() {
//!     eprintln!("placeholder {} failed", failed.placeholder.index);
//! }
//! println!("{}", report.document);
//! # Ok(())
//! # }
//! ```

/// Document cache keyed by source reference
pub mod cache;
/// Configuration file and environment overrides
pub mod config;
/// Error types and result aliases
pub mod error;
/// Range extraction by boundary anchors
pub mod extract;
/// Source resolution for local files and URLs
pub mod fetcher;
pub mod highlight;
pub mod language;
/// Document processing from placeholders to rendered output
pub mod pipeline;
pub mod placeholder;
/// Core data types and structures
pub mod types;

// Re-export commonly used types
pub use cache::DocumentCache;
pub use config::Config;
pub use error::{Error, Result};
pub use extract::{Extractor, extract};
pub use fetcher::{Fetcher, SourceResolver};
pub use highlight::{GrammarRegistry, RenderedSnippet};
pub use language::{LanguageClassifier, classify};
pub use pipeline::{IncludeReport, IncludedSnippet, Includer};
pub use types::*;
