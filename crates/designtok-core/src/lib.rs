//! # designtok-core
//!
//! This crate is the **primary library interface** for `designtok`.
//! It loads inputs from disk, runs the analysis pipeline and writes both
//! artifacts.
//!
//! If you are embedding `designtok` into another Rust application, depend on
//! this crate and `designtok-types`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use designtok_core::{AnalyzeInputs, analyze_workflow, emit_workflow};
//! use designtok_core::settings::AnalyzeSettings;
//!
//! let inputs = AnalyzeInputs::new("button.node.json", "tokens.json");
//! let settings = AnalyzeSettings::default();
//! let analysis = analyze_workflow(&inputs, &settings).expect("analysis failed");
//! let files = emit_workflow("out".as_ref(), &analysis, &settings.emit).expect("emit failed");
//! println!("wrote {}", files.markdown.display());
//! ```

#![forbid(unsafe_code)]

pub mod ffi;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use designtok_format::EmittedFiles;
pub use designtok_settings as settings;
pub use designtok_types as types;

use designtok_analysis::{AnalysisContext, AnalysisRequest, analyze};
use designtok_settings::{AnalyzeSettings, EmitSettings};
use designtok_tokens::{TokenTable, VariableTable};
use designtok_tree::RawNode;
use designtok_types::json::from_str_bounded;
use designtok_types::{
    ANALYSIS_SCHEMA_VERSION, ComponentAnalysis, DesignTokError, ErrorCode, ScreenshotMeta,
};

/// Shape of the token file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenFormat {
    /// `{ families, primitives, semantics }`.
    #[default]
    Flat,
    /// Nested DTCG tree with `$value` leaves.
    Dtcg,
}

/// Input file locations for one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeInputs {
    pub node: PathBuf,
    pub tokens: PathBuf,
    pub tokens_format: TokenFormat,
    pub variables: Option<PathBuf>,
    pub screenshots: Option<PathBuf>,
    pub file_key: Option<String>,
    /// Fixed extraction timestamp for reproducible records.
    pub extracted_at: Option<String>,
}

impl AnalyzeInputs {
    pub fn new(node: impl Into<PathBuf>, tokens: impl Into<PathBuf>) -> Self {
        Self {
            node: node.into(),
            tokens: tokens.into(),
            tokens_format: TokenFormat::default(),
            variables: None,
            screenshots: None,
            file_key: None,
            extracted_at: None,
        }
    }
}

// ============================================================================
// Loaders
// ============================================================================

fn read_text(path: &Path) -> Result<String, DesignTokError> {
    fs::read_to_string(path).map_err(|err| {
        DesignTokError::with_details(
            ErrorCode::IoFailure,
            format!("Failed to read {}", path.display()),
            err.to_string(),
        )
    })
}

/// Attach the offending path to a parse error.
fn at_path(path: &Path) -> impl FnOnce(DesignTokError) -> DesignTokError + '_ {
    move |mut err| {
        if err.details.is_none() {
            err.details = Some(path.display().to_string());
        }
        err
    }
}

pub fn load_settings(path: Option<&Path>) -> Result<AnalyzeSettings, DesignTokError> {
    match path {
        Some(path) => AnalyzeSettings::from_path(path),
        None => Ok(AnalyzeSettings::default()),
    }
}

pub fn load_node(path: &Path) -> Result<RawNode, DesignTokError> {
    RawNode::from_json_str(&read_text(path)?).map_err(at_path(path))
}

pub fn load_tokens(path: &Path, format: TokenFormat) -> Result<TokenTable, DesignTokError> {
    let text = read_text(path)?;
    let table = match format {
        TokenFormat::Flat => TokenTable::from_json_str(&text),
        TokenFormat::Dtcg => TokenTable::from_dtcg_str(&text),
    }
    .map_err(at_path(path))?;
    debug!(
        path = %path.display(),
        primitives = table.primitive_count(),
        semantics = table.semantic_count(),
        "loaded token table"
    );
    Ok(table)
}

/// Variable table from `path`, or an empty one.
pub fn load_variables(path: Option<&Path>) -> Result<VariableTable, DesignTokError> {
    match path {
        Some(path) => VariableTable::from_json_str(&read_text(path)?).map_err(at_path(path)),
        None => Ok(VariableTable::new()),
    }
}

/// Screenshot metadata from a JSON array, or none.
pub fn load_screenshots(path: Option<&Path>) -> Result<Vec<ScreenshotMeta>, DesignTokError> {
    match path {
        Some(path) => serde_json::from_str(&read_text(path)?)
            .map_err(DesignTokError::from)
            .map_err(at_path(path)),
        None => Ok(Vec::new()),
    }
}

// ============================================================================
// Workflows
// ============================================================================

/// Load every input and run the pipeline. Nothing is written.
pub fn analyze_workflow(
    inputs: &AnalyzeInputs,
    settings: &AnalyzeSettings,
) -> Result<ComponentAnalysis, DesignTokError> {
    let node = load_node(&inputs.node)?;
    let tokens = load_tokens(&inputs.tokens, inputs.tokens_format)?;
    let variables = load_variables(inputs.variables.as_deref())?;
    let screenshots = load_screenshots(inputs.screenshots.as_deref())?;

    let ctx = AnalysisContext {
        node: &node,
        tokens: &tokens,
        variables: &variables,
    };
    analyze(
        &ctx,
        AnalysisRequest {
            settings: settings.clone(),
            file_key: inputs.file_key.clone(),
            screenshots,
            extracted_at: inputs.extracted_at.clone(),
        },
    )
}

/// Write the JSON and Markdown artifacts for `analysis` into `out_dir`.
pub fn emit_workflow(
    out_dir: &Path,
    analysis: &ComponentAnalysis,
    settings: &EmitSettings,
) -> Result<EmittedFiles, DesignTokError> {
    Ok(designtok_format::emit_all(out_dir, analysis, settings)?)
}

/// Reject a record written under another schema version.
pub fn check_schema_version(analysis: &ComponentAnalysis) -> Result<(), DesignTokError> {
    if analysis.schema_version != ANALYSIS_SCHEMA_VERSION {
        return Err(DesignTokError::new(
            ErrorCode::InvalidJson,
            format!(
                "Unsupported schema version {} (expected {})",
                analysis.schema_version, ANALYSIS_SCHEMA_VERSION
            ),
        ));
    }
    Ok(())
}

/// Read a stored analysis record.
///
/// Records from another schema version are rejected.
pub fn load_analysis(path: &Path) -> Result<ComponentAnalysis, DesignTokError> {
    let analysis: ComponentAnalysis =
        from_str_bounded(&read_text(path)?).map_err(at_path(path))?;
    check_schema_version(&analysis).map_err(at_path(path))?;
    Ok(analysis)
}

/// Re-emit both artifacts from a stored JSON record.
pub fn render_workflow(
    record: &Path,
    out_dir: &Path,
    settings: &EmitSettings,
) -> Result<EmittedFiles, DesignTokError> {
    let analysis = load_analysis(record)?;
    emit_workflow(out_dir, &analysis, settings)
}
