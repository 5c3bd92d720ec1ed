//! Property tests for range extraction and tokenization.

#![allow(clippy::unwrap_used)]

use std::sync::LazyLock;

use excerpt_core::{BoundarySpec, Extractor, GrammarRegistry, extract};
use proptest::prelude::*;

static REGISTRY: LazyLock<GrammarRegistry> = LazyLock::new(GrammarRegistry::builtin);

/// Lines that can never match the uppercase markers used as anchors.
fn body() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z #]{0,12}", 0..12)
}

fn join(parts: &[&[String]]) -> String {
    parts
        .iter()
        .flat_map(|part| part.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n")
}

fn marker(text: &str) -> Vec<String> {
    vec![text.to_string()]
}

proptest! {
    #[test]
    fn whole_document_without_anchors(
        text in "(?s).{0,200}",
        comment in proptest::option::of("#|;|//"),
    ) {
        let spec = BoundarySpec { comment, ..BoundarySpec::default() };
        let result = extract(&text, &spec).unwrap();
        prop_assert_eq!(result.start_line, 1);
        prop_assert_eq!(result.snippet, text);
    }

    #[test]
    fn extraction_is_repeatable(
        before in body(),
        middle in body(),
        after in body(),
        other in "(?s).{0,120}",
    ) {
        let text = join(&[&before, &marker("START"), &middle, &marker("END"), &after]);
        let spec = BoundarySpec::new().after("START").until("END").comment("#");
        let extractor = Extractor::new(&spec).unwrap();

        let first = extractor.extract(&text);
        let _ = extractor.extract(&other);
        prop_assert_eq!(&first, &extractor.extract(&text));
        prop_assert_eq!(&first, &extract(&text, &spec).unwrap());
    }

    #[test]
    fn inclusive_start_exclusive_end(before in body(), middle in body(), after in body()) {
        let text = join(&[&before, &marker("START"), &middle, &marker("END"), &after]);
        let result = extract(&text, &BoundarySpec::new().from("START").until("END")).unwrap();

        let expected = join(&[&marker("START"), &middle]);
        prop_assert_eq!(result.start_line, before.len() + 1);
        prop_assert_eq!(result.snippet, expected.trim_end());
    }

    #[test]
    fn exclusive_start_inclusive_end(before in body(), middle in body(), after in body()) {
        let text = join(&[&before, &marker("START"), &middle, &marker("END"), &after]);
        let result = extract(&text, &BoundarySpec::new().after("START").upto("END")).unwrap();

        prop_assert_eq!(result.start_line, before.len() + 2);
        prop_assert_eq!(result.snippet, join(&[&middle, &marker("END")]));
    }

    #[test]
    fn snippet_is_taken_verbatim_from_source(before in body(), middle in body(), after in body()) {
        let text = join(&[&before, &marker("START"), &middle, &marker("END"), &after]);
        let result = extract(&text, &BoundarySpec::new().from("START").upto("END")).unwrap();
        prop_assert!(text.contains(&result.snippet));
        prop_assert!(result.snippet.ends_with("END"));
    }

    #[test]
    fn comment_stripping_preserves_line_count(
        before in body(),
        middle in body(),
        after in body(),
    ) {
        let text = join(&[&before, &marker("START"), &middle, &marker("END"), &after]);
        let plain = BoundarySpec::new().from("START").until("END");
        let stripped = plain.clone().comment("#");

        let plain = extract(&text, &plain).unwrap();
        let stripped = extract(&text, &stripped).unwrap();

        prop_assert_eq!(plain.start_line, stripped.start_line);
        prop_assert_eq!(
            plain.snippet.split('\n').count(),
            stripped.snippet.split('\n').count()
        );
        prop_assert!(!stripped.snippet.contains('#'));
    }

    #[test]
    fn missing_start_anchor_yields_sentinel(lines in body()) {
        let text = lines.join("\n");
        let result = extract(&text, &BoundarySpec::new().from("START")).unwrap();
        prop_assert!(result.is_no_match());
        prop_assert_eq!(result.start_line, 0);
    }

    #[test]
    fn tokens_cover_the_text(
        text in "(?s).{0,200}",
        tag in prop::sample::select(vec!["generic", "ned", "ini", "yaml", "dockerfile", "python", "xml", "unknown"]),
    ) {
        let tokens = REGISTRY.tokenize(&text, tag);
        let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
        prop_assert_eq!(&joined, &text);
        prop_assert!(tokens.iter().all(|t| !t.text.is_empty()));

        let rendered = REGISTRY.render(&text, tag, 1);
        prop_assert_eq!(rendered.text(), text);
    }
}

#[test]
fn five_line_sample_document() {
    let text = "A\nB\nC\nD\nE";

    let result = extract(text, &BoundarySpec::new().from("B").until("D")).unwrap();
    assert_eq!((result.start_line, result.snippet.as_str()), (2, "B\nC"));

    let result = extract(text, &BoundarySpec::new().after("B").upto("D")).unwrap();
    assert_eq!((result.start_line, result.snippet.as_str()), (3, "C\nD"));
}
