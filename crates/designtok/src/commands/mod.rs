pub(crate) mod analyze;
pub(crate) mod render;

use anyhow::Result;

use crate::cli::{Cli, Commands};

pub(crate) fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze(args) => analyze::handle(args),
        Commands::Render(args) => render::handle(args),
    }
}

/// Print the artifact paths, one per line, JSON first.
pub(crate) fn report(files: &designtok_core::EmittedFiles) {
    println!("{}", files.json.display());
    println!("{}", files.markdown.display());
}
