use serde::Serialize;

use super::grammar::GrammarRegistry;
use super::tokenize::Token;

/// A highlighted snippet split into lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSnippet {
    /// Grammar tag the snippet was tokenized with.
    pub language: String,
    /// Source line number of the first line; 0 for the no-match sentinel.
    pub start_line: usize,
    /// One entry per snippet line.
    pub lines: Vec<RenderedLine>,
}

/// One output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedLine {
    /// Source line number, absent for the sentinel or when numbering is off.
    pub number: Option<usize>,
    /// Tokens on this line; never contain a line break.
    pub tokens: Vec<Token>,
}

impl RenderedLine {
    /// Plain text of the line.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

impl GrammarRegistry {
    /// Tokenize `snippet` with the grammar for `tag` and number its lines
    /// from `start_line`. A `start_line` of 0 leaves lines unnumbered.
    pub fn render(&self, snippet: &str, tag: &str, start_line: usize) -> RenderedSnippet {
        let mut lines = vec![Vec::new()];
        for token in self.tokenize(snippet, tag) {
            let mut parts = token.text.split('\n');
            if let Some(first) = parts.next() {
                push_part(&mut lines, first, &token.classes);
            }
            for part in parts {
                lines.push(Vec::new());
                push_part(&mut lines, part, &token.classes);
            }
        }

        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(offset, tokens)| RenderedLine {
                number: (start_line > 0).then_some(start_line + offset),
                tokens,
            })
            .collect();

        RenderedSnippet {
            language: tag.to_string(),
            start_line,
            lines,
        }
    }
}

fn push_part(lines: &mut [Vec<Token>], text: &str, classes: &[String]) {
    if text.is_empty() {
        return;
    }
    if let Some(line) = lines.last_mut() {
        line.push(Token {
            text: text.to_string(),
            classes: classes.to_vec(),
        });
    }
}

impl RenderedSnippet {
    /// Drop line numbers.
    #[must_use]
    pub fn without_line_numbers(mut self) -> Self {
        for line in &mut self.lines {
            line.number = None;
        }
        self
    }

    /// The snippet text with line breaks restored.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(RenderedLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// HTML table in the layout of Rainbow's line-number plugin.
    ///
    /// Dotted classifications become space separated CSS classes
    /// (`constant.symbol` → `class="constant symbol"`).
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<table class=\"rainbow\" data-language=\"{}\"",
            html_escape::encode_double_quoted_attribute(&self.language)
        );
        if self.start_line > 0 {
            html.push_str(&format!(" data-line=\"{}\"", self.start_line));
        }
        html.push_str("><tbody>");

        for line in &self.lines {
            match line.number {
                Some(number) => html.push_str(&format!(
                    "<tr data-line=\"{number}\"><td class=\"line-number\" data-line-number=\"{number}\"></td>"
                )),
                None => html.push_str("<tr>"),
            }
            html.push_str("<td class=\"line\">");
            for token in &line.tokens {
                for class in &token.classes {
                    html.push_str(&format!(
                        "<span class=\"{}\">",
                        html_escape::encode_double_quoted_attribute(&class.replace('.', " "))
                    ));
                }
                html.push_str(&html_escape::encode_text(&token.text));
                for _ in &token.classes {
                    html.push_str("</span>");
                }
            }
            html.push_str("</td></tr>");
        }

        html.push_str("</tbody></table>");
        html
    }
}
