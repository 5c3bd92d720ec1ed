//! Text output formatting

use colored::{ColoredString, Colorize};
use excerpt_core::RenderedSnippet;

/// Terminal styles for token classifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenStyle {
    Comment,
    Keyword,
    Literal,
    Constant,
    Name,
    Attribute,
}

impl TokenStyle {
    fn paint(self, text: &str) -> ColoredString {
        match self {
            Self::Comment => text.bright_black(),
            Self::Keyword => text.magenta().bold(),
            Self::Literal => text.green(),
            Self::Constant => text.cyan(),
            Self::Name => text.blue(),
            Self::Attribute => text.yellow(),
        }
    }
}

/// Style of the innermost classification that has one.
pub fn token_style(classes: &[String]) -> Option<TokenStyle> {
    classes.iter().rev().find_map(|class| style_for(class))
}

fn style_for(class: &str) -> Option<TokenStyle> {
    let style = match class {
        "dockerfile-command" => TokenStyle::Keyword,
        "dockerfile-command-head" => TokenStyle::Attribute,
        _ => match class.split('.').next().unwrap_or(class) {
            "comment" => TokenStyle::Comment,
            "keyword" => TokenStyle::Keyword,
            "string" => TokenStyle::Literal,
            "constant" | "literal" => TokenStyle::Constant,
            "config" | "entity" | "decorator" => TokenStyle::Name,
            "attribute" => TokenStyle::Attribute,
            "support" if class.ends_with(".attribute") => TokenStyle::Attribute,
            "support" => TokenStyle::Name,
            _ => return None,
        },
    };
    Some(style)
}

/// The snippet as terminal text with a line-number gutter.
pub fn paint_snippet(rendered: &RenderedSnippet) -> String {
    let width = rendered
        .lines
        .iter()
        .filter_map(|line| line.number)
        .max()
        .map_or(0, |n| n.to_string().len());

    let mut out = Vec::with_capacity(rendered.lines.len());
    for line in &rendered.lines {
        let mut text = String::new();
        if let Some(number) = line.number {
            text.push_str(&format!("{number:>width$} │ ").dimmed().to_string());
        }
        for token in &line.tokens {
            match token_style(&token.classes) {
                Some(style) => text.push_str(&style.paint(&token.text).to_string()),
                None => text.push_str(&token.text),
            }
        }
        out.push(text);
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use excerpt_core::GrammarRegistry;

    fn classes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_innermost_known_class_wins() {
        assert_eq!(token_style(&classes(&["ini", "keyword"])), Some(TokenStyle::Keyword));
        assert_eq!(token_style(&classes(&["keyword", "ini"])), Some(TokenStyle::Keyword));
        assert_eq!(token_style(&classes(&["constant.symbol"])), Some(TokenStyle::Constant));
        assert_eq!(token_style(&classes(&["support.attribute"])), Some(TokenStyle::Attribute));
        assert_eq!(token_style(&classes(&["support.tag"])), Some(TokenStyle::Name));
        assert_eq!(token_style(&classes(&["dockerfile-command-tail"])), None);
        assert_eq!(token_style(&[]), None);
    }

    #[test]
    fn test_gutter_alignment() {
        colored::control::set_override(false);
        let rendered = GrammarRegistry::empty().render("a\nb\nc", "generic", 9);
        assert_eq!(paint_snippet(&rendered), " 9 │ a\n10 │ b\n11 │ c");
    }

    #[test]
    fn test_sentinel_has_no_gutter() {
        colored::control::set_override(false);
        let rendered = GrammarRegistry::empty().render("!!! No matching lines !!!", "ned", 0);
        assert_eq!(paint_snippet(&rendered), "!!! No matching lines !!!");
    }
}
