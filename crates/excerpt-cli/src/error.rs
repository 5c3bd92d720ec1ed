//! CLI error handling with semantic exit codes.
//!
//! Errors are categorized so shell scripts and CI jobs can react to the kind
//! of failure without parsing messages.
//!
//! | Code | Category | Description |
//! |------|----------|-------------|
//! | 0 | Success | Command completed successfully |
//! | 1 | `Internal` | Unexpected/internal error |
//! | 2 | `Usage` | Invalid arguments, references or configuration |
//! | 3 | `NotFound` | Document or source file not found |
//! | 4 | `InvalidPattern` | A boundary pattern is not a valid regex |
//! | 5 | `Network` | Fetching a remote source failed |
//! | 6 | `Timeout` | Fetching a remote source timed out |
//!
//! ```bash
//! excerpt render docs/step1.html --strict -o out/step1.html
//! case $? in
//!     0) echo "all snippets included" ;;
//!     3) echo "a source file is missing" ;;
//!     4) echo "fix the anchors" ;;
//!     *) echo "other error" ;;
//! esac
//! ```

use std::fmt;
use std::process::ExitCode;

/// Semantic error category determining the exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Unexpected or internal error (exit code 1).
    Internal = 1,

    /// Invalid arguments, references or configuration (exit code 2).
    Usage = 2,

    /// Document or source not found (exit code 3).
    NotFound = 3,

    /// Malformed boundary pattern (exit code 4).
    InvalidPattern = 4,

    /// HTTP errors, DNS failures or refused connections (exit code 5).
    Network = 5,

    /// A request exceeded its time limit (exit code 6).
    Timeout = 6,
}

impl ErrorCategory {
    /// Get the exit code for this category.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        self as u8
    }

    /// Create an `ExitCode` from this category.
    #[must_use]
    pub fn as_exit_code(self) -> ExitCode {
        ExitCode::from(self.exit_code())
    }

    /// Get a short description of this error category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Internal => "internal error",
            Self::Usage => "usage error",
            Self::NotFound => "not found",
            Self::InvalidPattern => "invalid pattern",
            Self::Network => "network error",
            Self::Timeout => "timeout",
        }
    }

    /// Category of a library error.
    ///
    /// `SourceUnavailable` takes the category of the fetch failure it wraps.
    #[must_use]
    pub fn from_core(err: &excerpt_core::Error) -> Self {
        use excerpt_core::Error;

        match err {
            Error::Network(e) if e.is_timeout() => Self::Timeout,
            Error::Network(_) => Self::Network,
            Error::NotFound(_) => Self::NotFound,
            Error::InvalidReference(_) | Error::Config(_) | Error::Serialization(_) => Self::Usage,
            Error::MalformedPattern { .. } => Self::InvalidPattern,
            Error::SourceUnavailable { source, .. } => Self::from_core(source),
            Error::Io(_) | Error::Other(_) => Self::Internal,
        }
    }

    /// Infer the error category from an error message.
    ///
    /// Fallback for errors that were never categorized explicitly.
    #[must_use]
    pub fn infer_from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        if msg_lower.contains("timeout") || msg_lower.contains("timed out") {
            return Self::Timeout;
        }

        // Checked before network: not-found messages usually quote a URL
        if msg_lower.contains("not found")
            || msg_lower.contains("no such")
            || msg_lower.contains("does not exist")
        {
            return Self::NotFound;
        }

        if msg_lower.contains("network")
            || msg_lower.contains("connection")
            || msg_lower.contains("dns")
            || msg_lower.contains("http")
            || msg_lower.contains("unreachable")
        {
            return Self::Network;
        }

        if msg_lower.contains("malformed") || msg_lower.contains("regex parse error") {
            return Self::InvalidPattern;
        }

        if msg_lower.contains("invalid argument")
            || msg_lower.contains("invalid reference")
            || msg_lower.contains("invalid value")
            || msg_lower.contains("configuration error")
        {
            return Self::Usage;
        }

        Self::Internal
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A CLI error with a semantic category for exit code mapping.
///
/// ```rust,ignore
/// use excerpt_cli::error::CliError;
///
/// let err = CliError::not_found(anyhow::anyhow!("No such document 'step1.html'"));
/// assert_eq!(err.exit_code(), 3);
/// ```
#[derive(Debug)]
pub struct CliError {
    /// The semantic category of this error.
    pub category: ErrorCategory,
    /// The underlying error with full context.
    pub source: anyhow::Error,
}

impl CliError {
    /// Create a new CLI error with explicit category.
    pub fn new(category: ErrorCategory, source: impl Into<anyhow::Error>) -> Self {
        Self {
            category,
            source: source.into(),
        }
    }

    /// Wrap a library error, keeping its category.
    pub fn core(err: excerpt_core::Error) -> Self {
        Self::new(ErrorCategory::from_core(&err), err)
    }

    /// Create a not-found error.
    pub fn not_found(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::NotFound, source)
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.category.exit_code()
    }

    /// Create an `ExitCode` from this error.
    #[must_use]
    pub fn as_exit_code(&self) -> ExitCode {
        self.category.as_exit_code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<excerpt_core::Error> for CliError {
    fn from(err: excerpt_core::Error) -> Self {
        Self::core(err)
    }
}

/// Determine the exit code from an `anyhow::Error`.
///
/// A `CliError` keeps its category, a bare library error is categorized by
/// variant, and anything else is inferred from the message.
#[must_use]
pub fn exit_code_from_error(err: &anyhow::Error) -> u8 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }

    if let Some(core_err) = err.downcast_ref::<excerpt_core::Error>() {
        return ErrorCategory::from_core(core_err).exit_code();
    }

    ErrorCategory::infer_from_message(&err.to_string()).exit_code()
}
