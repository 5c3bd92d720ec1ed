//! Include pipeline: placeholders in, highlighted document out.
//!
//! 1. [`discover`] every placeholder and compile its boundary spec; a malformed
//!    pattern fails that placeholder alone.
//! 2. Group the remaining placeholders by source reference and resolve each
//!    distinct reference once, concurrently, through the [`DocumentCache`].
//! 3. As each reference completes, extract and render every placeholder bound
//!    to it. A failed reference fails exactly the placeholders bound to it.
//! 4. Splice the results back into the document in document order.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};

use crate::config::{Config, RenderConfig};
use crate::highlight::{GrammarRegistry, RenderedSnippet};
use crate::language::LanguageClassifier;
use crate::placeholder::{discover, splice};
use crate::{
    DocumentCache, Error, ExtractionResult, Extractor, Placeholder, Result, SourceDocument,
    SourceResolver,
};

/// Outcome of one placeholder.
#[derive(Debug)]
pub struct IncludedSnippet {
    /// The placeholder as discovered.
    pub placeholder: Placeholder,
    /// Language tag chosen for its source.
    pub language: String,
    /// The rendered snippet, or why there is none.
    pub outcome: Result<RenderedSnippet>,
}

impl IncludedSnippet {
    /// Whether a snippet (possibly the no-match notice) was rendered.
    pub const fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Replacement markup for the placeholder element.
    pub fn to_html(&self) -> String {
        let src = html_escape::encode_double_quoted_attribute(&self.placeholder.source_reference);
        match &self.outcome {
            Ok(rendered) => format!(
                "<pre class=\"excerpt\" data-src=\"{src}\" data-language=\"{}\">{}</pre>",
                html_escape::encode_double_quoted_attribute(&self.language),
                rendered.to_html()
            ),
            Err(err) => format!(
                "<pre class=\"excerpt excerpt-error\" data-src=\"{src}\" data-error=\"{}\">{}</pre>",
                err.category(),
                html_escape::encode_text(&err.to_string())
            ),
        }
    }
}

/// Result of processing a whole document.
#[derive(Debug)]
pub struct IncludeReport {
    /// The document with every placeholder replaced.
    pub document: String,
    /// One entry per placeholder, in document order.
    pub snippets: Vec<IncludedSnippet>,
}

impl IncludeReport {
    /// Placeholders that failed.
    pub fn failures(&self) -> impl Iterator<Item = &IncludedSnippet> {
        self.snippets.iter().filter(|snippet| !snippet.is_ok())
    }
}

/// Processes host documents against a [`SourceResolver`].
pub struct Includer<R> {
    resolver: R,
    cache: Arc<DocumentCache>,
    classifier: LanguageClassifier,
    registry: GrammarRegistry,
    render: RenderConfig,
}

impl<R: SourceResolver> Includer<R> {
    /// An includer with the bundled grammars, the built-in suffix table and a
    /// fresh cache.
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            cache: Arc::new(DocumentCache::new()),
            classifier: LanguageClassifier::new(),
            registry: GrammarRegistry::builtin(),
            render: RenderConfig::default(),
        }
    }

    /// An includer set up from `config`.
    pub fn from_config(resolver: R, config: &Config) -> Result<Self> {
        Ok(Self::new(resolver)
            .with_classifier(config.classifier())
            .with_registry(config.grammar_registry()?)
            .with_render_config(config.render.clone()))
    }

    /// Share a cache with other includers or passes.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<DocumentCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the language classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: LanguageClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replace the grammar registry.
    #[must_use]
    pub fn with_registry(mut self, registry: GrammarRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the render settings.
    #[must_use]
    pub fn with_render_config(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    /// The document cache in use.
    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    /// Process every placeholder in `document`.
    ///
    /// Never fails as a whole: each placeholder's failure is recorded in its
    /// [`IncludedSnippet`] and rendered inline.
    pub async fn include(&self, document: &str) -> IncludeReport {
        let placeholders = discover(document);
        let mut outcomes: Vec<Option<Result<RenderedSnippet>>> =
            placeholders.iter().map(|_| None).collect();

        // Reference → placeholders bound to it, in first-seen order.
        let mut groups: Vec<(&str, Vec<(usize, Extractor)>)> = Vec::new();
        let mut group_of: HashMap<&str, usize> = HashMap::new();

        for placeholder in &placeholders {
            match Extractor::new(&placeholder.spec) {
                Ok(extractor) => {
                    let reference = placeholder.source_reference.as_str();
                    let slot = *group_of.entry(reference).or_insert_with(|| {
                        groups.push((reference, Vec::new()));
                        groups.len() - 1
                    });
                    groups[slot].1.push((placeholder.index, extractor));
                },
                Err(err) => {
                    warn!(
                        index = placeholder.index,
                        source = %placeholder.source_reference,
                        "{err}"
                    );
                    outcomes[placeholder.index] = Some(Err(err));
                },
            }
        }

        debug!(
            placeholders = placeholders.len(),
            sources = groups.len(),
            "resolving sources"
        );

        let mut pending: FuturesUnordered<_> = groups
            .into_iter()
            .map(|(reference, bound)| async move {
                let fetched = self
                    .cache
                    .get_or_fetch(reference, || self.resolver.resolve(reference))
                    .await;
                (reference, bound, fetched)
            })
            .collect();

        while let Some((reference, bound, fetched)) = pending.next().await {
            match fetched {
                Ok(source) => {
                    info!(
                        source = reference,
                        lines = source.line_count(),
                        placeholders = bound.len(),
                        "source ready"
                    );
                    for (index, extractor) in bound {
                        outcomes[index] = Some(Ok(self.render_one(&source, &extractor)));
                    }
                },
                Err(err) => {
                    let cause = Arc::new(err);
                    warn!(source = reference, placeholders = bound.len(), "{cause}");
                    for (index, _) in bound {
                        outcomes[index] = Some(Err(Error::unavailable(reference, &cause)));
                    }
                },
            }
        }
        drop(pending);

        let snippets: Vec<IncludedSnippet> = placeholders
            .into_iter()
            .zip(outcomes)
            .map(|(placeholder, outcome)| IncludedSnippet {
                language: self
                    .classifier
                    .classify(&placeholder.source_reference)
                    .to_string(),
                outcome: outcome.unwrap_or_else(|| {
                    Err(Error::Other(format!(
                        "placeholder {} was not processed",
                        placeholder.index
                    )))
                }),
                placeholder,
            })
            .collect();

        let replacements: Vec<String> = snippets.iter().map(IncludedSnippet::to_html).collect();
        let document = splice(
            document,
            snippets
                .iter()
                .zip(&replacements)
                .map(|(snippet, html)| (snippet.placeholder.span.clone(), html.as_str())),
        );

        IncludeReport { document, snippets }
    }

    fn render_one(&self, source: &SourceDocument, extractor: &Extractor) -> RenderedSnippet {
        let tag = self.classifier.classify(&source.reference);
        let result = extractor.extract(&source.raw_text);
        self.render_result(&result, tag)
    }

    /// Render an extraction with this includer's grammars and settings.
    pub fn render_result(&self, result: &ExtractionResult, tag: &str) -> RenderedSnippet {
        let rendered = if result.is_no_match() {
            debug!(tag, "no matching lines");
            self.registry.render(&self.render.no_match_message, tag, 0)
        } else {
            self.registry.render(&result.snippet, tag, result.start_line)
        };

        if self.render.line_numbers {
            rendered
        } else {
            rendered.without_line_numbers()
        }
    }
}
