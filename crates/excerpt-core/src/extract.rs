//! Line-range extraction driven by pattern anchors.
//!
//! A [`BoundarySpec`] names up to two anchors. The start anchor is either
//! `from` (anchor line kept) or `after` (anchor line dropped); the end anchor is
//! either `until` (anchor line dropped) or `upto` (anchor line kept). When both
//! alternatives of a pair are given, `from` and `until` win.
//!
//! ```rust
//! use excerpt_core::{BoundarySpec, extract};
//!
//! let text = "A\nB\nC\nD\nE";
//!
//! let result = extract(text, &BoundarySpec::new().from("B").until("D"))?;
//! assert_eq!((result.start_line, result.snippet.as_str()), (2, "B\nC"));
//!
//! let result = extract(text, &BoundarySpec::new().after("B").upto("D"))?;
//! assert_eq!((result.start_line, result.snippet.as_str()), (3, "C\nD"));
//! # Ok::<(), excerpt_core::Error>(())
//! ```
//!
//! Anchors are found line by line: the first line containing the start pattern
//! opens the range, and the first line *after it* containing the end pattern
//! closes it. If either anchor is missing the result is the
//! [`ExtractionResult::no_match`] sentinel rather than an error. Only pattern
//! compilation can fail.

use regex::Regex;

use crate::{BoundarySpec, Error, ExtractionResult, Result};

/// One resolved boundary: the pattern in effect and whether its line is emitted.
#[derive(Debug, Clone)]
struct Anchor {
    pattern: Regex,
    inclusive: bool,
}

impl Anchor {
    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line_content(line))
    }
}

/// A compiled [`BoundarySpec`].
///
/// Compiling up front surfaces malformed fragments at declaration time; the
/// extraction itself is then infallible and can be repeated against any
/// number of documents.
#[derive(Debug, Clone)]
pub struct Extractor {
    start: Option<Anchor>,
    end: Option<Anchor>,
    comment: Option<Regex>,
}

impl Extractor {
    /// Compile every fragment present in `spec`.
    ///
    /// Fragments shadowed by precedence (`after` next to `from`, `upto` next to
    /// `until`) are still validated so a broken declaration is never silently
    /// accepted.
    pub fn new(spec: &BoundarySpec) -> Result<Self> {
        let from = compile("from", spec.from.as_deref())?;
        let after = compile("after", spec.after.as_deref())?;
        let until = compile("until", spec.until.as_deref())?;
        let upto = compile("upto", spec.upto.as_deref())?;

        let start = match (from, after) {
            (Some(pattern), _) => Some(Anchor {
                pattern,
                inclusive: true,
            }),
            (None, Some(pattern)) => Some(Anchor {
                pattern,
                inclusive: false,
            }),
            (None, None) => None,
        };

        let end = match (until, upto) {
            (Some(pattern), _) => Some(Anchor {
                pattern,
                inclusive: false,
            }),
            (None, Some(pattern)) => Some(Anchor {
                pattern,
                inclusive: true,
            }),
            (None, None) => None,
        };

        let comment = match spec.comment.as_deref() {
            Some(fragment) => {
                compile("comment", Some(fragment))?;
                // Swallow the horizontal whitespace leading up to the comment as well.
                compile("comment", Some(&format!(r"[^\S\n]*(?:{fragment})")))?
            },
            None => None,
        };

        Ok(Self {
            start,
            end,
            comment,
        })
    }

    /// Whether a start or end anchor is in effect.
    pub const fn has_anchors(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Select the anchored line range of `text`.
    pub fn extract(&self, text: &str) -> ExtractionResult {
        if !self.has_anchors() {
            return ExtractionResult {
                start_line: 1,
                snippet: text.to_string(),
            };
        }

        let lines: Vec<&str> = text.split('\n').collect();

        // Index of the first emitted line, and where the end scan resumes.
        let (first, scan_from) = match &self.start {
            Some(anchor) => {
                let Some(idx) = lines.iter().position(|line| anchor.matches(line)) else {
                    return ExtractionResult::no_match();
                };
                let first = if anchor.inclusive { idx } else { idx + 1 };
                (first, idx + 1)
            },
            // The first line plays the part of an inclusive start anchor.
            None => (0, 1),
        };

        // Exclusive upper bound of the emitted lines.
        let last = match &self.end {
            Some(anchor) => {
                let Some(offset) = lines
                    .iter()
                    .skip(scan_from)
                    .position(|line| anchor.matches(line))
                else {
                    return ExtractionResult::no_match();
                };
                let idx = scan_from + offset;
                if anchor.inclusive { idx + 1 } else { idx }
            },
            None => lines.len(),
        };

        let selected = lines.get(first..last).unwrap_or_default().join("\n");
        let mut snippet = selected.trim_end().to_string();

        if let Some(comment) = &self.comment {
            snippet = strip_comments(&snippet, comment);
        }

        ExtractionResult {
            start_line: first + 1,
            snippet,
        }
    }
}

/// Compile `spec` and extract from `text` in one step.
///
/// Fails only with [`Error::MalformedPattern`]; an unmatched anchor yields the
/// no-match sentinel.
pub fn extract(text: &str, spec: &BoundarySpec) -> Result<ExtractionResult> {
    Ok(Extractor::new(spec)?.extract(text))
}

fn compile(attribute: &'static str, fragment: Option<&str>) -> Result<Option<Regex>> {
    fragment
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| Error::MalformedPattern {
                attribute,
                pattern: pattern.to_string(),
                source,
            })
        })
        .transpose()
}

/// The line without a trailing carriage return.
fn line_content(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

/// Cut every line at the first comment match, keeping line terminators.
fn strip_comments(snippet: &str, comment: &Regex) -> String {
    snippet
        .split('\n')
        .map(|line| {
            let content = line_content(line);
            match comment.find(content) {
                Some(found) => {
                    let cr = &line[content.len()..];
                    format!("{}{cr}", &content[..found.start()])
                },
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
