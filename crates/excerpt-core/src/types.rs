use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::ops::Range;

/// Snippet text returned in place of an extraction whose anchors did not match.
pub const NO_MATCH_MESSAGE: &str = "!!! No matching lines !!!";

/// A fetched source file. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// The reference exactly as written in the placeholder's `src` attribute.
    pub reference: String,
    /// Full text of the source.
    pub raw_text: String,
    /// When the text was resolved.
    pub fetched_at: DateTime<Utc>,
    /// Base64 SHA-256 of `raw_text`.
    pub sha256: String,
}

impl SourceDocument {
    /// Wrap freshly resolved text, stamping it with the current time and digest.
    pub fn new(reference: impl Into<String>, raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let sha256 = calculate_sha256(&raw_text);
        Self {
            reference: reference.into(),
            raw_text,
            fetched_at: Utc::now(),
            sha256,
        }
    }

    /// Number of `\n`-separated lines in the document.
    pub fn line_count(&self) -> usize {
        self.raw_text.split('\n').count()
    }
}

/// Declarative line-range boundaries for one placeholder.
///
/// Every field is a regular-expression fragment matched as a substring of a
/// single source line. Fragments are used verbatim: literal metacharacters
/// must be escaped by whoever writes the placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundarySpec {
    /// Exclusive start anchor; ignored when `from` is set.
    pub after: Option<String>,
    /// Inclusive start anchor.
    pub from: Option<String>,
    /// Exclusive end anchor.
    pub until: Option<String>,
    /// Inclusive end anchor; ignored when `until` is set.
    pub upto: Option<String>,
    /// Inline comment leader stripped from every emitted line.
    pub comment: Option<String>,
}

impl BoundarySpec {
    /// An empty spec: selects the whole document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the exclusive start anchor.
    #[must_use]
    pub fn after(mut self, pattern: impl Into<String>) -> Self {
        self.after = Some(pattern.into());
        self
    }

    /// Set the inclusive start anchor.
    #[must_use]
    pub fn from(mut self, pattern: impl Into<String>) -> Self {
        self.from = Some(pattern.into());
        self
    }

    /// Set the exclusive end anchor.
    #[must_use]
    pub fn until(mut self, pattern: impl Into<String>) -> Self {
        self.until = Some(pattern.into());
        self
    }

    /// Set the inclusive end anchor.
    #[must_use]
    pub fn upto(mut self, pattern: impl Into<String>) -> Self {
        self.upto = Some(pattern.into());
        self
    }

    /// Set the inline comment leader.
    #[must_use]
    pub fn comment(mut self, pattern: impl Into<String>) -> Self {
        self.comment = Some(pattern.into());
        self
    }

    /// Whether any start or end anchor is present.
    pub const fn has_anchors(&self) -> bool {
        self.after.is_some() || self.from.is_some() || self.until.is_some() || self.upto.is_some()
    }
}

/// A placeholder element discovered in a host document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    /// Position of the element among all placeholders of the document.
    pub index: usize,
    /// Value of the `src` attribute.
    pub source_reference: String,
    /// Boundary attributes of the element.
    pub spec: BoundarySpec,
    /// Byte range of the whole element (open tag through close tag).
    pub span: Range<usize>,
}

/// Outcome of running the range extractor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// 1-based line of the original document the snippet begins at; 0 means no match.
    pub start_line: usize,
    /// The extracted text, or [`NO_MATCH_MESSAGE`] for the sentinel.
    pub snippet: String,
}

impl ExtractionResult {
    /// The "no matching lines" sentinel.
    pub fn no_match() -> Self {
        Self {
            start_line: 0,
            snippet: NO_MATCH_MESSAGE.to_string(),
        }
    }

    /// Whether this is the no-match sentinel.
    pub const fn is_no_match(&self) -> bool {
        self.start_line == 0
    }

    /// 1-based line of the original document the snippet ends at.
    ///
    /// `None` for the no-match sentinel and for an empty snippet, which covers
    /// no line of the document.
    pub fn end_line(&self) -> Option<usize> {
        if self.is_no_match() || self.snippet.is_empty() {
            return None;
        }
        Some(self.start_line + self.snippet.split('\n').count() - 1)
    }
}

pub(crate) fn calculate_sha256(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    STANDARD.encode(result)
}
