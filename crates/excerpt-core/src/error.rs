//! Error types and handling for excerpt-core operations.
//!
//! A single [`Error`] enum covers every failure the library can surface. Two of
//! the variants carry the include-specific taxonomy:
//!
//! - [`Error::SourceUnavailable`]: a source reference could not be resolved.
//!   The pipeline renders it inline in place of every snippet bound to that
//!   reference; placeholders bound to other references are unaffected.
//! - [`Error::MalformedPattern`]: a boundary attribute is not a valid regular
//!   expression. It is raised synchronously when a [`BoundarySpec`] is compiled.
//!
//! "No matching lines" is deliberately absent: it is a normal
//! [`ExtractionResult`] sentinel, not an error.
//!
//! ```rust
//! use excerpt_core::{BoundarySpec, Error, extract};
//!
//! let spec = BoundarySpec::new().from("fn main(");
//! match extract("fn main() {}\n", &spec) {
//!     Ok(result) => println!("snippet starts at line {}", result.start_line),
//!     Err(Error::MalformedPattern { attribute, .. }) => eprintln!("bad {attribute} pattern"),
//!     Err(e) => eprintln!("{} error: {e}", e.category()),
//! }
//! ```
//!
//! [`BoundarySpec`]: crate::BoundarySpec
//! [`ExtractionResult`]: crate::ExtractionResult

use std::sync::Arc;

use thiserror::Error;

/// The main error type for excerpt-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers reading local source files and configuration files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed (connection, timeout or HTTP status).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Requested source does not exist (missing file or HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// A source reference could not be turned into a path or URL.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// A boundary attribute is not a valid regular expression fragment.
    #[error("Malformed '{attribute}' pattern {pattern:?}: {source}")]
    MalformedPattern {
        /// Placeholder attribute that carried the fragment (`from`, `until`, ...).
        attribute: &'static str,
        /// The fragment as declared.
        pattern: String,
        /// Compilation failure reported by the regex engine.
        #[source]
        source: regex::Error,
    },

    /// A source reference failed to resolve.
    ///
    /// Carries the underlying fetch failure with the reference it belongs to
    /// so it can be rendered in place of every affected snippet. The cause is
    /// shared between all placeholders bound to the reference.
    #[error("Source '{reference}' unavailable: {source}")]
    SourceUnavailable {
        /// The reference exactly as written in the placeholder.
        reference: String,
        /// The fetch failure.
        #[source]
        source: Arc<Error>,
    },

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Wrap a shared fetch failure as [`Error::SourceUnavailable`] for
    /// `reference`.
    ///
    /// A cause that already is `SourceUnavailable` is unwrapped first so the
    /// reference is never nested.
    #[must_use]
    pub fn unavailable(reference: &str, cause: &Arc<Self>) -> Self {
        let source = match cause.as_ref() {
            Self::SourceUnavailable { source, .. } => Arc::clone(source),
            _ => Arc::clone(cause),
        };
        Self::SourceUnavailable {
            reference: reference.to_string(),
            source,
        }
    }

    /// The innermost library error, looking through `SourceUnavailable`.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::SourceUnavailable { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Useful for grouping errors in logs:
    ///
    /// - `"io"`, `"network"`, `"not_found"`, `"invalid_reference"`
    /// - `"malformed_pattern"`, `"source_unavailable"`
    /// - `"config"`, `"serialization"`, `"other"`
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::NotFound(_) => "not_found",
            Self::InvalidReference(_) => "invalid_reference",
            Self::MalformedPattern { .. } => "malformed_pattern",
            Self::SourceUnavailable { .. } => "source_unavailable",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for Results with our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::io;

    fn malformed() -> Error {
        let source = regex::Regex::new("(").unwrap_err();
        Error::MalformedPattern {
            attribute: "from",
            pattern: "(".to_string(),
            source,
        }
    }

    #[test]
    fn test_error_display_formatting() {
        let err = Error::NotFound("missing.ned".to_string());
        assert_eq!(err.to_string(), "Not found: missing.ned");

        let err = Error::unavailable(
            "../WirelessA.ned",
            &Arc::new(Error::Other("connection refused".to_string())),
        );
        assert_eq!(
            err.to_string(),
            "Source '../WirelessA.ned' unavailable: connection refused"
        );

        let display = malformed().to_string();
        assert!(display.starts_with("Malformed 'from' pattern \"(\""));
    }

    #[test]
    fn test_malformed_pattern_keeps_source_chain() {
        use std::error::Error as _;

        let err = malformed();
        assert!(err.source().is_some());
    }

    #[test]
    fn test_unavailable_keeps_cause_variant() {
        use std::error::Error as _;

        let cause = Arc::new(Error::NotFound("No such file 'docs/timeout.ned'".to_string()));
        let wrapped = Error::unavailable("docs/timeout.ned", &cause);
        match &wrapped {
            Error::SourceUnavailable { reference, source } => {
                assert_eq!(reference, "docs/timeout.ned");
                assert!(matches!(source.as_ref(), Error::NotFound(_)));
            },
            other => panic!("unexpected variant: {other:?}"),
        }
        assert!(matches!(wrapped.root_cause(), Error::NotFound(_)));
        assert!(wrapped.source().is_some());

        let again = Error::unavailable("other.ini", &Arc::new(wrapped));
        match &again {
            Error::SourceUnavailable { reference, source } => {
                assert_eq!(reference, "other.ini");
                assert!(matches!(source.as_ref(), Error::NotFound(_)));
            },
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_error_categories() {
        let cases: Vec<(Error, &str)> = vec![
            (Error::Io(io::Error::other("x")), "io"),
            (Error::NotFound("x".into()), "not_found"),
            (Error::InvalidReference("x".into()), "invalid_reference"),
            (malformed(), "malformed_pattern"),
            (
                Error::unavailable("x", &Arc::new(Error::Other("y".into()))),
                "source_unavailable",
            ),
            (Error::Config("x".into()), "config"),
            (Error::Serialization("x".into()), "serialization"),
            (Error::Other("x".into()), "other"),
        ];

        for (error, expected) in cases {
            assert_eq!(error.category(), expected, "category of {error}");
        }
    }

    #[test]
    fn test_from_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(Error::from(json_err), Error::Serialization(_)));

        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        assert!(matches!(Error::from(toml_err), Error::Serialization(_)));
    }
}
