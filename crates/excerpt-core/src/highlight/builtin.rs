//! Bundled grammars.
//!
//! These are plain rule tables in the same shape users write in the config
//! file. Patterns use the `regex` crate dialect: no backreferences and no
//! lookaround, so quoted strings are spelled out per quote character and
//! keyword lists close with `\b`.

use std::collections::BTreeMap;

use super::grammar::{CaptureSpec, GrammarSpec, RuleSpec};

const QUOTED: &str = r#"'[^']*'|"[^"]*""#;

const NED_KEYWORDS: &str = "allowunconnected|bool|channel|channelinterface|connections|const|\
default|double|extends|false|for|gates|if|import|index|inout|input|int|like|module|\
moduleinterface|network|output|package|parameters|property|simple|sizeof|string|submodules|\
this|true|typename|types|volatile|xml|xmldoc";

const PYTHON_KEYWORDS: &str = "and|as|assert|async|await|break|class|continue|def|del|elif|\
else|except|finally|for|from|global|if|import|in|is|lambda|nonlocal|not|or|pass|raise|return|\
try|while|with|yield";

/// Every bundled `(tag, grammar)` pair.
pub(crate) fn grammars() -> Vec<(&'static str, GrammarSpec)> {
    vec![
        ("generic", GrammarSpec::default()),
        ("ned", ned()),
        ("ini", ini()),
        ("yaml", yaml()),
        ("dockerfile", dockerfile()),
        ("python", python()),
        ("xml", xml()),
    ]
}

fn ned() -> GrammarSpec {
    GrammarSpec {
        rules: vec![
            nested("ned"),
            quoted_after_delimiter(),
            named("constant.symbol", r"@[a-zA-Z0-9_]+"),
            named("comment", r"(?m)//.*$"),
            groups(&format!(r"\b({NED_KEYWORDS})\b"), &[(1, "keyword")]),
        ],
    }
}

fn ini() -> GrammarSpec {
    GrammarSpec {
        rules: vec![
            nested("ini"),
            quoted_after_delimiter(),
            named("comment", r"(?m)#.*$"),
            named("config", r"\[Config.*?\]"),
            named("config", r"\[General\]"),
            groups(r"\b(include)\b", &[(1, "keyword")]),
        ],
    }
}

fn yaml() -> GrammarSpec {
    GrammarSpec {
        rules: vec![
            nested("yaml"),
            named("string", QUOTED),
            named("literal", r"true|false|yes|no|null"),
            named("attribute", r#"(?m)[ \-]?[ '"]*[a-zA-Z_][\w\-]*['"]?:(?: |$)"#),
        ],
    }
}

fn dockerfile() -> GrammarSpec {
    GrammarSpec {
        rules: vec![
            groups(
                r"(?m)^([A-Z]+| +)(\s+[./a-z]\S+)?(.*)$",
                &[
                    (1, "dockerfile-command"),
                    (2, "dockerfile-command-head"),
                    (3, "dockerfile-command-tail"),
                ],
            ),
            named("comment", r"(?m)#.*$"),
        ],
    }
}

fn python() -> GrammarSpec {
    GrammarSpec {
        rules: vec![
            named("comment", r"(?m)#.*$"),
            named("string", r#"(?s)""".*?"""|'''.*?'''"#),
            named("string", QUOTED),
            groups(r"(?m)^\s*(@[\w.]+)", &[(1, "decorator")]),
            groups(r"\b(def|class)\s+(\w+)", &[(1, "keyword"), (2, "entity.name")]),
            groups(&format!(r"\b({PYTHON_KEYWORDS})\b"), &[(1, "keyword")]),
            named("constant.language", r"\b(?:True|False|None)\b"),
            named("constant.numeric", r"\b\d+(?:\.\d+)?\b"),
        ],
    }
}

fn xml() -> GrammarSpec {
    GrammarSpec {
        rules: vec![
            named("comment", r"(?s)<!--.*?-->"),
            named("string", QUOTED),
            groups(r"(</?)([\w:.\-]+)", &[(2, "support.tag")]),
            groups(r"([\w:\-]+)=", &[(1, "support.attribute")]),
        ],
    }
}

/// `$( … )` re-tokenized with the enclosing grammar.
fn nested(tag: &str) -> RuleSpec {
    RuleSpec {
        name: Some(tag.to_string()),
        pattern: r"\$\(([\s\S]*?)\)".to_string(),
        matches: BTreeMap::from([(
            "1".to_string(),
            CaptureSpec::Language {
                language: tag.to_string(),
            },
        )]),
    }
}

/// A quoted string following `(`, whitespace, `[` or `=`.
fn quoted_after_delimiter() -> RuleSpec {
    groups(&format!(r"(\(|\s|\[|=)({QUOTED})"), &[(2, "string")])
}

fn named(name: &str, pattern: &str) -> RuleSpec {
    RuleSpec {
        name: Some(name.to_string()),
        pattern: pattern.to_string(),
        matches: BTreeMap::new(),
    }
}

fn groups(pattern: &str, classes: &[(usize, &str)]) -> RuleSpec {
    RuleSpec {
        name: None,
        pattern: pattern.to_string(),
        matches: classes
            .iter()
            .map(|(group, class)| (group.to_string(), CaptureSpec::Class((*class).to_string())))
            .collect(),
    }
}
