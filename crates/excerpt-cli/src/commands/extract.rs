//! Extract command: one snippet from one source

use anyhow::Result;
use excerpt_core::{BoundarySpec, Config, Extractor, Includer, SourceDocument, SourceResolver};
use serde_json::json;
use tracing::debug;

use crate::cli::ExtractArgs;
use crate::output::{OutputFormat, paint_snippet};

/// Execute the extract command
pub async fn execute(args: &ExtractArgs, config: &Config) -> Result<()> {
    // Compile first so a bad pattern fails without fetching
    let extractor = Extractor::new(&boundary_spec(args))?;

    let fetcher = config.fetcher()?;
    let document = SourceDocument::new(&args.source, fetcher.resolve(&args.source).await?);
    let result = extractor.extract(&document.raw_text);
    debug!(
        start_line = result.start_line,
        sha256 = %document.sha256,
        "extracted from {}",
        args.source
    );

    let language = match &args.language {
        Some(tag) => tag.clone(),
        None => config.classifier().classify(&args.source).to_string(),
    };

    let includer = Includer::from_config(fetcher, config)?;
    let rendered = includer.render_result(&result, &language);

    match args.format {
        OutputFormat::Text => println!("{}", paint_snippet(&rendered)),
        OutputFormat::Html => println!("{}", rendered.to_html()),
        OutputFormat::Json => {
            let out = json!({
                "source": document.reference,
                "sha256": document.sha256,
                "fetchedAt": document.fetched_at.to_rfc3339(),
                "language": language,
                "matched": !result.is_no_match(),
                "startLine": result.start_line,
                "endLine": result.end_line(),
                "snippet": result.snippet,
                "rendered": rendered,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        },
    }
    Ok(())
}

fn boundary_spec(args: &ExtractArgs) -> BoundarySpec {
    BoundarySpec {
        after: args.after.clone(),
        from: args.from.clone(),
        until: args.until.clone(),
        upto: args.upto.clone(),
        comment: args.comment.clone(),
    }
}
