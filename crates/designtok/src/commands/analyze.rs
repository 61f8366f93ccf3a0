use anyhow::{Context, Result};
use designtok_core::{AnalyzeInputs, TokenFormat, analyze_workflow, emit_workflow, load_settings};
use designtok_settings::AnalyzeSettings;
use tracing::info;

use crate::cli::{AnalyzeArgs, TokenFormatArg};

pub(crate) fn handle(args: AnalyzeArgs) -> Result<()> {
    let settings = resolve_settings(&args)?;
    let inputs = AnalyzeInputs {
        node: args.node.clone(),
        tokens: args.tokens.clone(),
        tokens_format: match args.tokens_format {
            TokenFormatArg::Flat => TokenFormat::Flat,
            TokenFormatArg::Dtcg => TokenFormat::Dtcg,
        },
        variables: args.variables.clone(),
        screenshots: args.screenshots.clone(),
        file_key: args.file_key.clone(),
        extracted_at: args.extracted_at.clone(),
    };

    let analysis = analyze_workflow(&inputs, &settings)
        .with_context(|| format!("Failed to analyze {}", args.node.display()))?;
    let files = emit_workflow(&args.out, &analysis, &settings.emit)
        .with_context(|| format!("Failed to write artifacts to {}", args.out.display()))?;
    info!(
        component = %analysis.component.name,
        out = %args.out.display(),
        "analysis written"
    );
    super::report(&files);
    Ok(())
}

/// Settings file (or defaults) with command-line flags applied on top.
pub(crate) fn resolve_settings(args: &AnalyzeArgs) -> Result<AnalyzeSettings> {
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(indent) = args.indent {
        settings.emit.json_indent = indent;
    }
    if let Some(depth) = args.max_depth {
        settings.tree.max_depth = depth;
    }
    if args.no_recommend {
        settings.recommend.enabled = false;
    }
    settings.validate()?;
    Ok(settings)
}
