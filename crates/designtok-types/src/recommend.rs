//! Advisory recommendation blocks.
//!
//! Every block carries `ReviewStatus::PendingHumanReview`; nothing here is
//! ever applied to the record it describes.

use serde::{Deserialize, Serialize};

use crate::Scalar;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    PendingHumanReview,
}

/// Up to four independent blocks. Absent blocks had no content or were
/// disabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationBundle {
    pub variant_mapping: Option<VariantMapping>,
    pub component_token_candidates: Option<ComponentTokenCandidates>,
    pub mode_validation: Option<ModeValidation>,
    pub platform_parity: Option<PlatformParity>,
}

impl RecommendationBundle {
    pub fn is_empty(&self) -> bool {
        self.populated_count() == 0
    }

    pub fn populated_count(&self) -> usize {
        usize::from(self.variant_mapping.is_some())
            + usize::from(self.component_token_candidates.is_some())
            + usize::from(self.mode_validation.is_some())
            + usize::from(self.platform_parity.is_some())
    }
}

// ---------------
// Variant mapping
// ---------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisClass {
    /// Changes appearance only (size, tone, emphasis).
    Structural,
    /// Changes interaction or state (hover, disabled, loading).
    Behavioral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisClassification {
    pub axis: String,
    pub class: AxisClass,
    pub options: Vec<String>,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingOption {
    /// `A` or `B`.
    pub label: String,
    pub title: String,
    pub recommended: bool,
    pub rationale: String,
    pub tradeoffs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantMapping {
    pub review_status: ReviewStatus,
    pub framing: String,
    pub axes: Vec<AxisClassification>,
    pub options: Vec<MappingOption>,
}

// --------------------------
// Component-token candidates
// --------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCandidate {
    pub primitive_token: String,
    pub usage_count: usize,
    pub scope_node_id: String,
    pub scope_node_name: String,
    /// `node name › property` for each use.
    pub locations: Vec<String>,
    /// Example only, e.g. `button.padding.horizontal = space.200`.
    pub illustrative_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentTokenCandidates {
    pub review_status: ReviewStatus,
    pub min_occurrences: usize,
    pub candidates: Vec<TokenCandidate>,
}

// ---------------
// Mode validation
// ---------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyCategory {
    Expected,
    Unexpected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeDiscrepancy {
    pub variable_id: String,
    pub variable_name: String,
    pub mode_a: String,
    pub value_a: Scalar,
    pub mode_b: String,
    pub value_b: Scalar,
    pub category: DiscrepancyCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeValidation {
    pub review_status: ReviewStatus,
    pub discrepancies: Vec<ModeDiscrepancy>,
    pub has_unexpected: bool,
}

// ---------------
// Platform parity
// ---------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Web,
    Ios,
    Android,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Web, Platform::Ios, Platform::Android];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Web => "web",
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInteraction {
    pub interaction: String,
    pub supported: Vec<Platform>,
    pub missing: Vec<Platform>,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformParity {
    pub review_status: ReviewStatus,
    pub interactions: Vec<PlatformInteraction>,
}
