//! Command implementations for the excerpt CLI
//!
//! Each command lives in its own submodule and exposes a single `execute`.

mod classify;
mod extract;
mod languages;
mod render;

pub use classify::execute as classify_references;
pub use extract::execute as extract_snippet;
pub use languages::execute as list_languages;
pub use render::execute as render_document;
