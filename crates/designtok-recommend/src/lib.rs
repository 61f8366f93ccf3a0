//! # designtok-recommend
//!
//! **Tier 2 (Advisory)**
//!
//! Builds the optional recommendation blocks attached to an analysis.
//! Every block is framed for human review; nothing here changes the
//! classifications themselves.
//!
//! ## What belongs here
//! * Variant-axis classification and mapping options
//! * Component-token candidates
//! * Cross-mode validation
//! * Platform-parity checks
//!
//! ## What does NOT belong here
//! * Token matching
//! * Rendering of the blocks

#![forbid(unsafe_code)]

mod candidates;
mod modes;
mod platform;
mod variants;

pub use candidates::{component_base_name, component_token_candidates, infer_property_group};
pub use modes::mode_validation;
pub use platform::{detected_states, normalize_state, platform_parity};
pub use variants::{classify_axis, variant_mapping};

use designtok_settings::RecommendSettings;
use designtok_tokens::VariableLookup;
use designtok_types::{Node, RecommendationBundle, VariantAxis};
use tracing::debug;

/// Everything the synthesizer reads.
pub struct RecommendInput<'a> {
    pub component_name: &'a str,
    pub root: &'a Node,
    pub variant_axes: &'a [VariantAxis],
    /// Distinct bound variable ids in the tree.
    pub bound_variable_ids: &'a [String],
    pub variables: &'a dyn VariableLookup,
}

/// Build the recommendation bundle.
///
/// Returns `None` when recommendations are disabled or no block has
/// anything to say.
pub fn synthesize(
    input: &RecommendInput<'_>,
    settings: &RecommendSettings,
) -> Option<RecommendationBundle> {
    if !settings.enabled {
        return None;
    }
    let bundle = RecommendationBundle {
        variant_mapping: settings
            .variant_mapping
            .then(|| variant_mapping(input.variant_axes))
            .flatten(),
        component_token_candidates: settings
            .component_tokens
            .then(|| {
                component_token_candidates(
                    input.root,
                    input.component_name,
                    settings.min_occurrences,
                )
            })
            .flatten(),
        mode_validation: settings
            .mode_validation
            .then(|| {
                mode_validation(
                    input.bound_variable_ids.iter().map(String::as_str),
                    input.variables,
                    &settings.documented_variations,
                )
            })
            .flatten(),
        platform_parity: settings
            .platform_parity
            .then(|| platform_parity(input.variant_axes, input.root))
            .flatten(),
    };
    debug!(blocks = bundle.populated_count(), "synthesized recommendations");
    (!bundle.is_empty()).then_some(bundle)
}
