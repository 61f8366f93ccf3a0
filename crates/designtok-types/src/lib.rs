//! # designtok-types
//!
//! **Tier 0 (Analysis Contract)**
//!
//! Pure data structures for component analysis records. No I/O or business logic.
//!
//! ## What belongs here
//! * The node tree and its classification buckets
//! * Composition patterns, unresolved bindings, recommendation blocks
//! * The `ComponentAnalysis` root record and its schema version
//! * The error taxonomy shared by every pipeline stage
//!
//! ## What does NOT belong here
//! * Matching or pattern-mining logic (use designtok-match / designtok-patterns)
//! * Formatting logic (use designtok-format)
//! * File I/O operations

pub mod error;
pub mod json;
pub mod recommend;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use error::{DesignTokError, ErrorCode};
pub use json::MAX_TREE_DEPTH;
pub use recommend::{
    AxisClass, AxisClassification, ComponentTokenCandidates, DiscrepancyCategory, MappingOption,
    ModeDiscrepancy, ModeValidation, Platform, PlatformInteraction, PlatformParity,
    RecommendationBundle, ReviewStatus, TokenCandidate, VariantMapping,
};

/// Schema version for component analysis records.
/// v2: Added parent location to composition patterns and confidence counts.
pub const ANALYSIS_SCHEMA_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

impl ToolInfo {
    pub fn current() -> Self {
        Self {
            name: "designtok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// -------
// Scalars
// -------

/// A raw extracted value: numbers for dimensions, strings for colors and text,
/// booleans for instance toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

// ---------
// Node tree
// ---------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    ComponentSet,
    Component,
    Instance,
    Frame,
    Text,
}

impl NodeKind {
    /// Map a design-tool node type onto the closed kind set.
    /// Anything outside the set (vectors, groups, missing types) is a frame.
    pub fn from_figma(raw: Option<&str>) -> Self {
        match raw {
            Some("COMPONENT_SET") => NodeKind::ComponentSet,
            Some("COMPONENT") => NodeKind::Component,
            Some("INSTANCE") => NodeKind::Instance,
            Some("TEXT") => NodeKind::Text,
            _ => NodeKind::Frame,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::ComponentSet => "COMPONENT_SET",
            NodeKind::Component => "COMPONENT",
            NodeKind::Instance => "INSTANCE",
            NodeKind::Frame => "FRAME",
            NodeKind::Text => "TEXT",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    Horizontal,
    Vertical,
    None,
}

impl LayoutMode {
    pub fn from_figma(raw: &str) -> Self {
        match raw {
            "HORIZONTAL" => LayoutMode::Horizontal,
            "VERTICAL" => LayoutMode::Vertical,
            _ => LayoutMode::None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

impl Padding {
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub layout_mode: Option<LayoutMode>,
    pub padding: Option<Padding>,
    pub item_spacing: Option<f64>,
    pub counter_axis_spacing: Option<f64>,
    pub corner_radius: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentPropertyKind {
    Variant,
    Boolean,
    Text,
    InstanceSwap,
}

impl ComponentPropertyKind {
    pub fn from_figma(raw: &str) -> Self {
        match raw {
            "VARIANT" => ComponentPropertyKind::Variant,
            "BOOLEAN" => ComponentPropertyKind::Boolean,
            "INSTANCE_SWAP" => ComponentPropertyKind::InstanceSwap,
            _ => ComponentPropertyKind::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentProperty {
    pub kind: ComponentPropertyKind,
    pub value: Scalar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    /// Main component of an `INSTANCE`, when the export names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    pub depth: usize,
    pub ancestor_chain: Vec<NodeKind>,
    pub layout: Option<Layout>,
    pub component_properties: Option<BTreeMap<String, ComponentProperty>>,
    pub token_classifications: TokenClassifications,
    pub children: Vec<Node>,
}

impl Node {
    /// Visit this node and every descendant in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }
}

// --------------
// Classification
// --------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCategory {
    Spacing,
    Radius,
    Color,
    FontSize,
    FontWeight,
    LineHeight,
    LetterSpacing,
    BorderWidth,
    Opacity,
    Sizing,
}

impl TokenCategory {
    /// Token family names as written in token definitions.
    pub fn from_family(family: &str) -> Option<Self> {
        match family {
            "spacing" | "space" | "inset" => Some(TokenCategory::Spacing),
            "radius" => Some(TokenCategory::Radius),
            "color" => Some(TokenCategory::Color),
            "fontSize" | "font-size" => Some(TokenCategory::FontSize),
            "fontWeight" | "font-weight" => Some(TokenCategory::FontWeight),
            "lineHeight" | "line-height" => Some(TokenCategory::LineHeight),
            "letterSpacing" | "letter-spacing" => Some(TokenCategory::LetterSpacing),
            "borderWidth" | "border-width" => Some(TokenCategory::BorderWidth),
            "opacity" => Some(TokenCategory::Opacity),
            "sizing" | "icon" | "tapArea" => Some(TokenCategory::Sizing),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenCategory::Spacing => "spacing",
            TokenCategory::Radius => "radius",
            TokenCategory::Color => "color",
            TokenCategory::FontSize => "font_size",
            TokenCategory::FontWeight => "font_weight",
            TokenCategory::LineHeight => "line_height",
            TokenCategory::LetterSpacing => "letter_spacing",
            TokenCategory::BorderWidth => "border_width",
            TokenCategory::Opacity => "opacity",
            TokenCategory::Sizing => "sizing",
        }
    }

    /// Dimension categories carry a `px` unit in deltas.
    pub fn is_dimension(self) -> bool {
        !matches!(
            self,
            TokenCategory::Color | TokenCategory::FontWeight | TokenCategory::Opacity
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Binding,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Exact,
    Approximate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedToken {
    pub property: String,
    pub semantic_token: Option<String>,
    pub primitive_token: String,
    pub raw_value: Scalar,
    pub match_method: MatchMethod,
    pub confidence: Confidence,
    /// Required for approximate matches (e.g. `+1px`, `ΔE 1.4`).
    pub delta: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnidentifiedReason {
    NoTokenMatch,
    UnresolvedBinding,
    OutOfTolerance,
}

impl UnidentifiedReason {
    pub fn as_str(self) -> &'static str {
        match self {
            UnidentifiedReason::NoTokenMatch => "no-token-match",
            UnidentifiedReason::UnresolvedBinding => "unresolved-binding",
            UnidentifiedReason::OutOfTolerance => "out-of-tolerance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosestMatch {
    pub token: String,
    pub delta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnidentifiedValue {
    pub property: String,
    pub raw_value: Scalar,
    pub reason: UnidentifiedReason,
    /// Diagnostic hint only; never counted as a match.
    pub closest_match: Option<ClosestMatch>,
    pub bound_variable_id: Option<String>,
}

/// Outcome of classifying one extracted property.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Semantic(ClassifiedToken),
    Primitive(ClassifiedToken),
    Unidentified(UnidentifiedValue),
}

impl Classification {
    pub fn property(&self) -> &str {
        match self {
            Classification::Semantic(t) | Classification::Primitive(t) => &t.property,
            Classification::Unidentified(u) => &u.property,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenClassifications {
    pub semantic_identified: Vec<ClassifiedToken>,
    pub primitive_identified: Vec<ClassifiedToken>,
    pub unidentified: Vec<UnidentifiedValue>,
}

impl TokenClassifications {
    pub fn push(&mut self, classification: Classification) {
        match classification {
            Classification::Semantic(t) => self.semantic_identified.push(t),
            Classification::Primitive(t) => self.primitive_identified.push(t),
            Classification::Unidentified(u) => self.unidentified.push(u),
        }
    }

    pub fn summary(&self) -> ClassificationSummary {
        ClassificationSummary {
            semantic_identified: self.semantic_identified.len(),
            primitive_identified: self.primitive_identified.len(),
            unidentified: self.unidentified.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.semantic_identified.is_empty()
            && self.primitive_identified.is_empty()
            && self.unidentified.is_empty()
    }

    /// Semantic then primitive matches, in bucket order.
    pub fn matched(&self) -> impl Iterator<Item = &ClassifiedToken> {
        self.semantic_identified
            .iter()
            .chain(self.primitive_identified.iter())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub semantic_identified: usize,
    pub primitive_identified: usize,
    pub unidentified: usize,
}

impl ClassificationSummary {
    pub fn total(&self) -> usize {
        self.semantic_identified + self.primitive_identified + self.unidentified
    }

    pub fn add(self, other: ClassificationSummary) -> ClassificationSummary {
        ClassificationSummary {
            semantic_identified: self.semantic_identified + other.semantic_identified,
            primitive_identified: self.primitive_identified + other.primitive_identified,
            unidentified: self.unidentified + other.unidentified,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceCounts {
    pub exact: usize,
    pub approximate: usize,
    pub unmatched: usize,
}

// --------------------
// Composition patterns
// --------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionPattern {
    pub component_name: String,
    pub count: usize,
    pub shared_properties: BTreeMap<String, Scalar>,
    pub property_variations: Vec<PropertyVariation>,
    pub depth: usize,
    pub parent_id: String,
    pub parent_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyVariation {
    pub properties: BTreeMap<String, Scalar>,
    pub count: usize,
}

// -------------------
// Unresolved bindings
// -------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedReason {
    NotInTokenTable,
    UpstreamResolutionFailed,
}

impl UnresolvedReason {
    pub fn as_str(self) -> &'static str {
        match self {
            UnresolvedReason::NotInTokenTable => "not-in-token-table",
            UnresolvedReason::UpstreamResolutionFailed => "upstream-resolution-failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedBinding {
    pub variable_id: String,
    pub property: String,
    pub node_id: String,
    pub node_name: String,
    pub ancestor_chain: Vec<NodeKind>,
    pub reason: UnresolvedReason,
}

// -----------
// Screenshots
// -----------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotMeta {
    pub path: String,
    pub url: Option<String>,
    pub format: String,
    pub scale: f64,
    pub variant: Option<String>,
    pub captured_at: String,
}

// -------------
// Root aggregate
// -------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentIdentity {
    pub name: String,
    pub kind: NodeKind,
    pub node_id: String,
    pub file_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantAxis {
    pub name: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionMeta {
    /// RFC 3339 timestamp.
    pub extracted_at: String,
    pub tool: ToolInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentAnalysis {
    pub schema_version: u32,
    pub component: ComponentIdentity,
    pub variant_axes: Option<Vec<VariantAxis>>,
    pub root: Node,
    pub classification_summary: ClassificationSummary,
    pub confidence: ConfidenceCounts,
    pub composition_patterns: Vec<CompositionPattern>,
    pub unresolved_bindings: Vec<UnresolvedBinding>,
    pub recommendations: Option<RecommendationBundle>,
    pub screenshots: Vec<ScreenshotMeta>,
    pub extraction: ExtractionMeta,
}
