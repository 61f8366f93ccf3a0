//! # designtok-format
//!
//! **Tier 3 (Output)**
//!
//! Renders a [`ComponentAnalysis`] as lossless JSON and as a narrative
//! Markdown report, and writes both next to each other.
//!
//! ## What belongs here
//! * JSON serialization with configurable indentation
//! * Markdown section rendering
//! * Output file naming and writing
//!
//! ## What does NOT belong here
//! * Analysis computation
//! * Input loading

#![forbid(unsafe_code)]

mod json;
mod md;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use designtok_settings::EmitSettings;
use designtok_types::ComponentAnalysis;
use serde::{Deserialize, Serialize};
use tempfile::{NamedTempFile, TempPath};
use tracing::debug;

pub use json::render_json;
pub use md::render_md;

/// Output formats for a component analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisFormat {
    Json,
    Md,
}

impl AnalysisFormat {
    pub fn extension(self) -> &'static str {
        match self {
            AnalysisFormat::Json => "json",
            AnalysisFormat::Md => "md",
        }
    }
}

pub fn render(
    analysis: &ComponentAnalysis,
    format: AnalysisFormat,
    settings: &EmitSettings,
) -> Result<String> {
    match format {
        AnalysisFormat::Json => render_json(analysis, settings.json_indent),
        AnalysisFormat::Md => Ok(render_md(analysis)),
    }
}

/// Lowercase, collapse every non-alphanumeric run to one hyphen, trim
/// hyphens at both ends.
///
/// `"Progress / Pagination"` becomes `"progress-pagination"`.
pub fn sanitize_component_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// `<sanitized-name>-analysis.<ext>`; `component` stands in for a name
/// with no usable characters.
pub fn artifact_file_name(component_name: &str, format: AnalysisFormat) -> String {
    let stem = sanitize_component_name(component_name);
    let stem = if stem.is_empty() { "component" } else { &stem };
    format!("{stem}-analysis.{}", format.extension())
}

/// Paths written by [`emit_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFiles {
    pub json: PathBuf,
    pub markdown: PathBuf,
}

/// Render both formats, then write them into `dir`.
///
/// Both renderings and both staged files are complete before any target is
/// replaced. If the Markdown file cannot be put in place, the JSON target is
/// rolled back to its previous state, so a failed run leaves neither new file.
pub fn emit_all(
    dir: &Path,
    analysis: &ComponentAnalysis,
    settings: &EmitSettings,
) -> Result<EmittedFiles> {
    let json = render(analysis, AnalysisFormat::Json, settings)?;
    let markdown = render(analysis, AnalysisFormat::Md, settings)?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let name = &analysis.component.name;
    let files = EmittedFiles {
        json: dir.join(artifact_file_name(name, AnalysisFormat::Json)),
        markdown: dir.join(artifact_file_name(name, AnalysisFormat::Md)),
    };

    let json_staging = stage(dir, &files.json, &json)?;
    let md_staging = stage(dir, &files.markdown, &markdown)?;
    let backup = set_aside(dir, &files.json)?;

    if let Err(err) = json_staging.persist(&files.json) {
        roll_back(backup, &files.json, false)?;
        return Err(err.error)
            .with_context(|| format!("Failed to replace {}", files.json.display()));
    }
    if let Err(err) = md_staging.persist(&files.markdown) {
        roll_back(backup, &files.json, true)?;
        return Err(err.error)
            .with_context(|| format!("Failed to replace {}", files.markdown.display()));
    }

    debug!(
        json = %files.json.display(),
        markdown = %files.markdown.display(),
        "wrote analysis artifacts"
    );
    Ok(files)
}

/// Write `contents` to a temporary sibling of `target`.
fn stage(dir: &Path, target: &Path, contents: &str) -> Result<NamedTempFile> {
    let mut staging = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    staging
        .write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write {}", target.display()))?;
    staging
        .as_file()
        .sync_all()
        .with_context(|| format!("Failed to sync {}", target.display()))?;
    Ok(staging)
}

/// Move an existing `target` to a temporary path. The backup is deleted
/// when the returned path drops.
fn set_aside(dir: &Path, target: &Path) -> Result<Option<TempPath>> {
    if fs::symlink_metadata(target).is_err() {
        return Ok(None);
    }
    let backup = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create backup file in {}", dir.display()))?
        .into_temp_path();
    fs::rename(target, &*backup)
        .with_context(|| format!("Failed to back up {}", target.display()))?;
    Ok(Some(backup))
}

/// Put `target` back the way [`set_aside`] found it.
fn roll_back(backup: Option<TempPath>, target: &Path, replaced: bool) -> Result<()> {
    let restored = match &backup {
        Some(backup) => fs::rename(&**backup, target),
        None if replaced => fs::remove_file(target),
        None => Ok(()),
    };
    restored.map_err(|err| {
        anyhow!(
            "Failed to roll back {}: {err}. Previous contents, if any, are at {}",
            target.display(),
            backup
                .as_deref()
                .map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
        )
    })
}
