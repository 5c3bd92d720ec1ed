//! First-match tokenizer.
//!
//! At every scan position each rule of the grammar is searched from that
//! position; the match that begins earliest wins and ties go to the rule
//! declared first. Text between matches is emitted unclassified. A capture
//! mapped to another language is tokenized again with that grammar, its
//! tokens inheriting the enclosing classes.

use std::ops::Range;

use regex::{Captures, Regex};
use serde::Serialize;

use super::grammar::{Capture, GrammarRegistry, Rule};

/// Nested-language recursion stops here and the rest is left plain.
const MAX_NESTING: usize = 8;

/// A run of text and the classifications that apply to it, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The covered text.
    pub text: String,
    /// Classification stack; empty for plain text.
    pub classes: Vec<String>,
}

impl Token {
    /// Whether no rule classified this text.
    pub fn is_plain(&self) -> bool {
        self.classes.is_empty()
    }

    /// The innermost classification.
    pub fn class(&self) -> Option<&str> {
        self.classes.last().map(String::as_str)
    }
}

impl GrammarRegistry {
    /// Split `text` into tokens using the grammar registered for `tag`.
    ///
    /// An unknown tag yields one plain token. Concatenating the token texts
    /// always reproduces `text`.
    pub fn tokenize(&self, text: &str, tag: &str) -> Vec<Token> {
        let mut sink = Sink::default();
        self.tokenize_into(text, tag, &[], 0, &mut sink);
        sink.tokens
    }

    fn tokenize_into(
        &self,
        text: &str,
        tag: &str,
        outer: &[String],
        depth: usize,
        sink: &mut Sink,
    ) {
        let rules = match self.rules(tag) {
            Some(rules) if !rules.is_empty() && depth < MAX_NESTING => rules,
            _ => {
                sink.push(text, outer);
                return;
            },
        };

        // Next match of each rule, reused while it still lies ahead of `pos`.
        let mut pending: Vec<Option<Captures<'_>>> = rules.iter().map(|_| None).collect();
        let mut exhausted = vec![false; rules.len()];
        let mut pos = 0;

        while pos < text.len() {
            let mut best: Option<(usize, usize)> = None;
            for (i, rule) in rules.iter().enumerate() {
                if exhausted[i] {
                    continue;
                }
                let stale = pending[i]
                    .as_ref()
                    .is_none_or(|caps| whole(caps).start < pos);
                if stale {
                    pending[i] = next_match(rule.pattern(), text, pos);
                }
                match pending[i].as_ref().map(|caps| whole(caps).start) {
                    Some(start) if best.is_none_or(|(earliest, _)| start < earliest) => {
                        best = Some((start, i));
                    },
                    Some(_) => {},
                    None => exhausted[i] = true,
                }
            }

            let Some((start, i)) = best else { break };
            let Some(caps) = pending[i].take() else { break };
            sink.push(&text[pos..start], outer);
            pos = self.emit(&rules[i], &caps, text, outer, depth, sink);
        }

        if pos < text.len() {
            sink.push(&text[pos..], outer);
        }
    }

    /// Emit one rule match and return the offset just past it.
    fn emit(
        &self,
        rule: &Rule,
        caps: &Captures<'_>,
        text: &str,
        outer: &[String],
        depth: usize,
        sink: &mut Sink,
    ) -> usize {
        let span = whole(caps);
        let mut classes = outer.to_vec();
        if let Some(name) = rule.name() {
            classes.push(name.to_string());
        }

        let mut groups: Vec<(Range<usize>, &Capture)> = rule
            .captures()
            .iter()
            .filter_map(|(index, action)| caps.get(*index).map(|m| (m.range(), action)))
            .filter(|(range, _)| !range.is_empty())
            .collect();
        groups.sort_by_key(|(range, _)| range.start);

        let mut cursor = span.start;
        for (range, action) in groups {
            // Nested groups are covered by their parent.
            if range.start < cursor {
                continue;
            }
            sink.push(&text[cursor..range.start], &classes);
            match action {
                Capture::Class(class) => {
                    let mut inner = classes.clone();
                    inner.push(class.clone());
                    sink.push(&text[range.clone()], &inner);
                },
                Capture::Language(tag) => {
                    self.tokenize_into(&text[range.clone()], tag, &classes, depth + 1, sink);
                },
            }
            cursor = range.end;
        }
        sink.push(&text[cursor..span.end], &classes);

        span.end
    }
}

fn whole(caps: &Captures<'_>) -> Range<usize> {
    caps.get(0).map_or(0..0, |m| m.range())
}

/// The first non-empty match of `pattern` at or after `from`.
fn next_match<'t>(pattern: &Regex, text: &'t str, mut from: usize) -> Option<Captures<'t>> {
    while from <= text.len() {
        let caps = pattern.captures_at(text, from)?;
        let span = whole(&caps);
        if !span.is_empty() {
            return Some(caps);
        }
        from = span.end + text[span.end..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Collects tokens, merging neighbours with identical classes.
#[derive(Default)]
struct Sink {
    tokens: Vec<Token>,
}

impl Sink {
    fn push(&mut self, text: &str, classes: &[String]) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.tokens.last_mut() {
            if last.classes == classes {
                last.text.push_str(text);
                return;
            }
        }
        self.tokens.push(Token {
            text: text.to_string(),
            classes: classes.to_vec(),
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::highlight::grammar::{GrammarSpec, RuleSpec};

    fn registry(tag: &str, toml_rules: &str) -> GrammarRegistry {
        let spec: GrammarSpec = toml::from_str(toml_rules).unwrap();
        let mut registry = GrammarRegistry::empty();
        registry.register_spec(tag, &spec).unwrap();
        registry
    }

    fn classified<'a>(tokens: &'a [Token]) -> Vec<(&'a str, &'a str)> {
        tokens
            .iter()
            .filter_map(|t| t.class().map(|c| (t.text.as_str(), c)))
            .collect()
    }

    fn joined(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_unknown_tag_is_plain() {
        let tokens = GrammarRegistry::builtin().tokenize("anything at all", "cobol");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_plain());
        assert_eq!(tokens[0].text, "anything at all");
    }

    #[test]
    fn test_generic_grammar_is_plain() {
        let tokens = GrammarRegistry::builtin().tokenize("network X {}", "generic");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_plain());
    }

    #[test]
    fn test_earliest_match_wins() {
        let registry = registry(
            "t",
            r#"
            [[rules]]
            name = "late"
            pattern = "bbb"

            [[rules]]
            name = "early"
            pattern = "a+"
            "#,
        );
        let tokens = registry.tokenize("xaa bbb", "t");
        assert_eq!(classified(&tokens), vec![("aa", "early"), ("bbb", "late")]);
    }

    #[test]
    fn test_tie_goes_to_first_declared_rule() {
        let registry = registry(
            "t",
            r#"
            [[rules]]
            name = "first"
            pattern = "ab"

            [[rules]]
            name = "second"
            pattern = "abc"
            "#,
        );
        let tokens = registry.tokenize("abc", "t");
        assert_eq!(classified(&tokens), vec![("ab", "first")]);
        assert_eq!(joined(&tokens), "abc");
    }

    #[test]
    fn test_empty_matches_are_skipped() {
        let registry = registry(
            "t",
            r#"
            [[rules]]
            name = "digits"
            pattern = '\d*'
            "#,
        );
        let tokens = registry.tokenize("ab12c", "t");
        assert_eq!(classified(&tokens), vec![("12", "digits")]);
        assert_eq!(joined(&tokens), "ab12c");
    }

    #[test]
    fn test_capture_groups_classified() {
        let tokens = GrammarRegistry::builtin().tokenize("simple Node\n{\n}", "ned");
        assert_eq!(classified(&tokens), vec![("simple", "keyword")]);
    }

    #[test]
    fn test_keywords_respect_word_boundaries() {
        let tokens = GrammarRegistry::builtin().tokenize("networking network", "ned");
        assert_eq!(classified(&tokens), vec![("network", "keyword")]);
        assert_eq!(tokens[0].text, "networking ");
    }

    #[test]
    fn test_nested_language() {
        let tokens = GrammarRegistry::builtin().tokenize("x = $(include y)", "ini");
        let nested: Vec<_> = tokens
            .iter()
            .filter(|t| t.classes.first().map(String::as_str) == Some("ini"))
            .collect();
        assert!(nested.iter().any(|t| t.text == "include"
            && t.classes == vec!["ini".to_string(), "keyword".to_string()]));
        assert_eq!(joined(&tokens), "x = $(include y)");
    }

    #[test]
    fn test_nested_unknown_language_is_plain_under_parent() {
        let mut registry = GrammarRegistry::empty();
        let rule = RuleSpec {
            name: Some("embed".to_string()),
            pattern: r"<<(.*?)>>".to_string(),
            matches: [(
                "1".to_string(),
                crate::highlight::CaptureSpec::Language {
                    language: "missing".to_string(),
                },
            )]
            .into_iter()
            .collect(),
        };
        registry.register("t", vec![rule.compile().unwrap()]);

        let tokens = registry.tokenize("a <<b>> c", "t");
        assert_eq!(
            tokens,
            vec![
                Token {
                    text: "a ".to_string(),
                    classes: vec![],
                },
                Token {
                    text: "<<b>>".to_string(),
                    classes: vec!["embed".to_string()],
                },
                Token {
                    text: " c".to_string(),
                    classes: vec![],
                },
            ]
        );
    }

    #[test]
    fn test_comment_then_keyword_ned() {
        let source = "// the network\nnetwork Net // trailing\n";
        let tokens = GrammarRegistry::builtin().tokenize(source, "ned");
        assert_eq!(
            classified(&tokens),
            vec![
                ("// the network", "comment"),
                ("network", "keyword"),
                ("// trailing", "comment"),
            ]
        );
        assert_eq!(joined(&tokens), source);
    }

    #[test]
    fn test_dockerfile_lines() {
        let source = "FROM ubuntu:22.04\nRUN apt-get update\n# note";
        let tokens = GrammarRegistry::builtin().tokenize(source, "dockerfile");
        assert_eq!(
            classified(&tokens),
            vec![
                ("FROM", "dockerfile-command"),
                (" ubuntu:22.04", "dockerfile-command-head"),
                ("RUN", "dockerfile-command"),
                (" apt-get", "dockerfile-command-head"),
                (" update", "dockerfile-command-tail"),
                ("# note", "comment"),
            ]
        );
        assert_eq!(joined(&tokens), source);
    }

    #[test]
    fn test_multibyte_text_survives() {
        let source = "name = 'Grüße' # ✓\n";
        let tokens = GrammarRegistry::builtin().tokenize(source, "ini");
        assert_eq!(joined(&tokens), source);
        assert!(classified(&tokens).contains(&("'Grüße'", "string")));
    }
}
