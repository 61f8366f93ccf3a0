use anyhow::{Context, Result};
use designtok_settings::EmitSettings;

use crate::cli::RenderArgs;

pub(crate) fn handle(args: RenderArgs) -> Result<()> {
    let mut settings = EmitSettings::default();
    if let Some(indent) = args.indent {
        settings.json_indent = indent;
    }
    let files = designtok_core::render_workflow(&args.input, &args.out, &settings)
        .with_context(|| format!("Failed to render {}", args.input.display()))?;
    super::report(&files);
    Ok(())
}
