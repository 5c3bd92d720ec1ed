//! Language tags from source references.
//!
//! The tag picks the grammar used to highlight a snippet. It is derived purely
//! from the end of the reference's path, so `../WirelessA.ned`,
//! `https://example.com/code/worker.py?raw=1` and `docker/Dockerfile` all
//! classify without touching the network or the filesystem.
//!
//! ```rust
//! use excerpt_core::language::classify;
//!
//! assert_eq!(classify("../WirelessA.ned"), "ned");
//! assert_eq!(classify("cloud/Dockerfile"), "dockerfile");
//! assert_eq!(classify("README"), "generic");
//! ```

use serde::{Deserialize, Serialize};

/// Tag returned when no rule matches.
pub const GENERIC: &str = "generic";

/// Ordered suffix table; the first matching entry wins.
const SUFFIX_TABLE: &[(&str, &str)] = &[
    (".ned", "ned"),
    (".xml", "xml"),
    (".ini", "ini"),
    (".py", "python"),
    ("Dockerfile", "dockerfile"),
    (".yaml", "yaml"),
    (".yml", "yaml"),
];

/// Classify `reference` against the built-in suffix table.
pub fn classify(reference: &str) -> &'static str {
    let path = reference_path(reference);
    SUFFIX_TABLE
        .iter()
        .find(|(suffix, _)| path.ends_with(suffix))
        .map_or(GENERIC, |(_, tag)| *tag)
}

/// The built-in `(suffix, tag)` table in matching order.
pub fn builtin_suffixes() -> impl Iterator<Item = (&'static str, &'static str)> {
    SUFFIX_TABLE.iter().copied()
}

/// A user supplied suffix rule, consulted before the built-in table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageRule {
    /// Case-sensitive suffix of the reference path (`.cc`, `Makefile`).
    pub suffix: String,
    /// Tag to assign.
    pub tag: String,
}

/// Classifier with optional extra rules layered over [`classify`].
#[derive(Debug, Clone, Default)]
pub struct LanguageClassifier {
    rules: Vec<LanguageRule>,
}

impl LanguageClassifier {
    /// A classifier that only knows the built-in table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A classifier that tries `rules` in order before the built-in table.
    pub const fn with_rules(rules: Vec<LanguageRule>) -> Self {
        Self { rules }
    }

    /// Tag for `reference`.
    pub fn classify<'a>(&'a self, reference: &str) -> &'a str {
        let path = reference_path(reference);
        self.rules
            .iter()
            .find(|rule| path.ends_with(rule.suffix.as_str()))
            .map_or_else(|| classify(reference), |rule| rule.tag.as_str())
    }
}

/// The reference with any URL query string or fragment removed.
fn reference_path(reference: &str) -> &str {
    reference
        .split(['?', '#'])
        .next()
        .unwrap_or(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let cases = [
            ("../WirelessA.ned", "ned"),
            ("config/omnetpp.xml", "xml"),
            ("omnetpp.ini", "ini"),
            ("code/worker.py", "python"),
            ("Dockerfile", "dockerfile"),
            ("images/worker/Dockerfile", "dockerfile"),
            ("deploy/stack.yaml", "yaml"),
            ("deploy/stack.yml", "yaml"),
            ("notes.txt", "generic"),
            ("", "generic"),
        ];

        for (reference, expected) in cases {
            assert_eq!(classify(reference), expected, "classify({reference:?})");
        }
    }

    #[test]
    fn test_suffix_must_be_at_the_end() {
        assert_eq!(classify("model.ned.bak"), "generic");
        assert_eq!(classify("python.py.txt"), "generic");
        assert_eq!(classify("Dockerfile.dev"), "generic");
    }

    #[test]
    fn test_url_query_and_fragment_ignored() {
        assert_eq!(classify("https://example.org/code/worker.py?raw=1"), "python");
        assert_eq!(classify("https://example.org/net/Net.ned#L10"), "ned");
    }

    #[test]
    fn test_classification_uses_final_suffix() {
        assert_eq!(classify("a.ned.ini"), "ini");
    }

    #[test]
    fn test_custom_rules_take_precedence() {
        let classifier = LanguageClassifier::with_rules(vec![
            LanguageRule {
                suffix: ".ini".to_string(),
                tag: "generic".to_string(),
            },
            LanguageRule {
                suffix: ".msg".to_string(),
                tag: "ned".to_string(),
            },
        ]);

        assert_eq!(classifier.classify("omnetpp.ini"), "generic");
        assert_eq!(classifier.classify("Packet.msg"), "ned");
        assert_eq!(classifier.classify("worker.py"), "python");
        assert_eq!(LanguageClassifier::new().classify("omnetpp.ini"), "ini");
    }
}
