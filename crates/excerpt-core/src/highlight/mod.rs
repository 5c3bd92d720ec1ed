//! Syntax highlighting for extracted snippets.
//!
//! A [`GrammarRegistry`] maps language tags to ordered rule lists. Rules are
//! regular expressions that either classify their whole match, classify
//! individual capture groups, or hand a capture group to another grammar.
//! [`GrammarRegistry::tokenize`] turns text into [`Token`]s and
//! [`GrammarRegistry::render`] groups them into numbered lines ready for the
//! HTML, JSON or terminal back ends.
//!
//! ```rust
//! use excerpt_core::highlight::GrammarRegistry;
//!
//! let registry = GrammarRegistry::builtin();
//! let rendered = registry.render("network Wireless\n{\n}", "ned", 3);
//! assert_eq!(rendered.lines[0].number, Some(3));
//! assert_eq!(rendered.lines[0].tokens[0].class(), Some("keyword"));
//! ```

mod builtin;
mod grammar;
mod render;
mod tokenize;

pub use grammar::{Capture, CaptureSpec, GrammarRegistry, GrammarSpec, Rule, RuleSpec};
pub use render::{RenderedLine, RenderedSnippet};
pub use tokenize::Token;
