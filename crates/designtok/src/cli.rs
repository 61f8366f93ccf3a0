//! Clap argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// `designtok`: classify a component's design values against a token table.
///
/// Writes `<component>-analysis.json` and `<component>-analysis.md`.
#[derive(Parser, Debug)]
#[command(name = "designtok", version, about, long_about = None)]
pub struct Cli {
    /// Debug logging on stderr. `DESIGNTOK_LOG` takes precedence when set.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one component export and write both artifacts.
    Analyze(AnalyzeArgs),
    /// Re-render both artifacts from a stored JSON record.
    Render(RenderArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFormatArg {
    /// `{ families, primitives, semantics }`.
    Flat,
    /// Nested `$value` tree.
    Dtcg,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Node tree export (bare node or `{ "document": ... }`).
    #[arg(long, value_name = "PATH")]
    pub node: PathBuf,

    /// Token table.
    #[arg(long, value_name = "PATH")]
    pub tokens: PathBuf,

    #[arg(long, value_enum, default_value_t = TokenFormatArg::Flat)]
    pub tokens_format: TokenFormatArg,

    /// Resolved variable table.
    #[arg(long, value_name = "PATH")]
    pub variables: Option<PathBuf>,

    /// JSON array of screenshot metadata to carry into the record.
    #[arg(long, value_name = "PATH")]
    pub screenshots: Option<PathBuf>,

    /// `designtok.toml` settings file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub file_key: Option<String>,

    /// Fixed extraction timestamp (RFC 3339) for reproducible records.
    #[arg(long, value_name = "TIMESTAMP")]
    pub extracted_at: Option<String>,

    /// Output directory.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out: PathBuf,

    /// JSON indent width. Overrides `[emit] json_indent`.
    #[arg(long)]
    pub indent: Option<usize>,

    /// Maximum node tree depth, at most 256. Overrides `[tree] max_depth`.
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Skip the recommendations section.
    #[arg(long)]
    pub no_recommend: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Stored `*-analysis.json` record.
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output directory.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out: PathBuf,

    #[arg(long)]
    pub indent: Option<usize>,
}
