//! # designtok-settings
//!
//! **Tier 0 (Pure Settings)**
//!
//! Clap-free settings types for the analysis pipeline. The CLI maps its
//! arguments onto these; library consumers build them directly or load a
//! `designtok.toml`.
//!
//! ## What belongs here
//! * Pure data types with Serde derive
//! * Tree, matching, recommendation and emit settings
//! * Default values and TOML loading
//!
//! ## What does NOT belong here
//! * Clap parsing (lives in the `designtok` binary)
//! * Business logic

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use designtok_types::TokenCategory;
use designtok_types::{DesignTokError, ErrorCode, MAX_TREE_DEPTH};

/// Default ceiling on tree depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;
/// Default number of sibling uses before a primitive is a component-token candidate.
pub const DEFAULT_MIN_OCCURRENCES: usize = 2;
/// Default JSON indentation width.
pub const DEFAULT_JSON_INDENT: usize = 2;

/// Top-level settings for one `analyze` run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeSettings {
    pub tree: TreeSettings,
    pub matching: MatchSettings,
    pub recommend: RecommendSettings,
    pub emit: EmitSettings,
}

impl AnalyzeSettings {
    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, DesignTokError> {
        let settings: AnalyzeSettings =
            toml::from_str(text).map_err(DesignTokError::invalid_settings)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, DesignTokError> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            DesignTokError::with_details(
                ErrorCode::IoFailure,
                format!("cannot read settings: {err}"),
                path.display().to_string(),
            )
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), DesignTokError> {
        if self.tree.max_depth == 0 {
            return Err(DesignTokError::invalid_settings(
                "tree.max_depth must be at least 1",
            ));
        }
        if self.tree.max_depth > MAX_TREE_DEPTH {
            return Err(DesignTokError::invalid_settings(format!(
                "tree.max_depth must be at most {MAX_TREE_DEPTH}"
            )));
        }
        for (category, band) in &self.matching.tolerance.0 {
            if !band.is_finite() || *band < 0.0 {
                return Err(DesignTokError::invalid_settings(format!(
                    "tolerance for {} must be a non-negative number, got {band}",
                    category.as_str()
                )));
            }
        }
        if self.recommend.min_occurrences < 2 {
            return Err(DesignTokError::invalid_settings(
                "recommend.min_occurrences must be at least 2",
            ));
        }
        Ok(())
    }
}

/// Settings for the node-tree builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    /// Deepest allowed node depth (root = 0).
    pub max_depth: usize,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Per-category tolerance bands.
///
/// Dimension bands are absolute differences in the token's unit; the color
/// band is a CIE76 ΔE distance. A missing category means exact-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToleranceBands(pub BTreeMap<TokenCategory, f64>);

impl ToleranceBands {
    /// Exact-only matching for every category.
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: TokenCategory, band: f64) -> Self {
        self.0.insert(category, band);
        self
    }

    pub fn band_for(&self, category: TokenCategory) -> f64 {
        self.0.get(&category).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    pub tolerance: ToleranceBands,
}

/// Settings for the recommendation synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendSettings {
    /// Master switch; when off the bundle is always absent.
    pub enabled: bool,
    pub variant_mapping: bool,
    pub component_tokens: bool,
    pub mode_validation: bool,
    pub platform_parity: bool,
    pub min_occurrences: usize,
    /// Variable names whose cross-mode differences are intentional.
    pub documented_variations: Vec<String>,
}

impl Default for RecommendSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            variant_mapping: true,
            component_tokens: true,
            mode_validation: true,
            platform_parity: true,
            min_occurrences: DEFAULT_MIN_OCCURRENCES,
            documented_variations: Vec::new(),
        }
    }
}

/// Settings for the dual-format emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitSettings {
    /// Spaces per JSON indentation level; 0 writes compact JSON.
    pub json_indent: usize,
}

impl Default for EmitSettings {
    fn default() -> Self {
        Self {
            json_indent: DEFAULT_JSON_INDENT,
        }
    }
}
