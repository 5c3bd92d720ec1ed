//! Discovery of include placeholders in a host document.
//!
//! A placeholder is an empty `pre` element carrying a `src` attribute:
//!
//! ```html
//! <pre src="../WirelessA.ned" from="network" until="^}"></pre>
//! ```
//!
//! The boundary attributes `from`, `after`, `until`, `upto` and `comment` are
//! optional; any other attribute is ignored. Values may be double quoted,
//! single quoted or bare, and HTML entities in them are decoded, so
//! `until="&lt;/module&gt;"` anchors on `</module>`. `pre` elements with
//! content or without `src` are left alone.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{BoundarySpec, Placeholder};

/// An empty `pre` element; group 1 is the attribute list.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<pre((?:\s+[^\s=>/]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?)*)\s*>\s*</pre\s*>"#,
    )
    .unwrap()
});

/// One attribute: name, then a double quoted, single quoted or bare value.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s=>/]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#).unwrap()
});

/// Every placeholder in `document`, in document order.
pub fn discover(document: &str) -> Vec<Placeholder> {
    let mut placeholders = Vec::new();
    for caps in ELEMENT_RE.captures_iter(document) {
        let (Some(whole), Some(attrs)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        let mut source = None;
        let mut spec = BoundarySpec::default();
        for attr in ATTRIBUTE_RE.captures_iter(attrs.as_str()) {
            let Some(name) = attr.get(1) else { continue };
            let value = [2, 3, 4]
                .into_iter()
                .find_map(|group| attr.get(group))
                .map_or_else(String::new, |m| {
                    html_escape::decode_html_entities(m.as_str()).into_owned()
                });

            match name.as_str().to_ascii_lowercase().as_str() {
                "src" => source = Some(value),
                "from" => spec.from = Some(value),
                "after" => spec.after = Some(value),
                "until" => spec.until = Some(value),
                "upto" => spec.upto = Some(value),
                "comment" => spec.comment = Some(value),
                _ => {},
            }
        }

        let Some(source_reference) = source else {
            continue;
        };
        debug!(
            index = placeholders.len(),
            source = %source_reference,
            offset = whole.start(),
            "found placeholder"
        );
        placeholders.push(Placeholder {
            index: placeholders.len(),
            source_reference,
            spec,
            span: whole.range(),
        });
    }
    placeholders
}

/// Replace each span of `document` with its text.
///
/// Spans must be sorted and must not overlap, which holds for the spans
/// returned by [`discover`].
pub fn splice<'a>(
    document: &str,
    replacements: impl IntoIterator<Item = (std::ops::Range<usize>, &'a str)>,
) -> String {
    let mut out = String::with_capacity(document.len());
    let mut cursor = 0;
    for (span, text) in replacements {
        if span.start < cursor || span.end > document.len() {
            continue;
        }
        out.push_str(&document[cursor..span.start]);
        out.push_str(text);
        cursor = span.end;
    }
    out.push_str(&document[cursor..]);
    out
}
