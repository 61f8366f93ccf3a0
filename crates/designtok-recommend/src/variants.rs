//! Variant-axis classification and the two mapping options.

use designtok_types::{
    AxisClass, AxisClassification, MappingOption, ReviewStatus, VariantAxis, VariantMapping,
};

use crate::platform::normalize_state;

const BEHAVIORAL_AXIS_NAMES: &[&str] = &["state", "interaction", "status"];

pub(crate) const FRAMING: &str = "Advisory only, not a final decision. \
A reviewer chooses the mapping after checking the component family's conventions.";

pub fn classify_axis(axis: &VariantAxis) -> AxisClassification {
    let name = axis.name.to_lowercase();
    let state_options: Vec<&str> = axis
        .options
        .iter()
        .filter(|o| normalize_state(o).is_some())
        .map(String::as_str)
        .collect();
    let (class, rationale) = if BEHAVIORAL_AXIS_NAMES.contains(&name.trim()) {
        (
            AxisClass::Behavioral,
            format!("Axis \"{}\" names interaction state.", axis.name),
        )
    } else if !state_options.is_empty() {
        (
            AxisClass::Behavioral,
            format!(
                "Options {} are interaction states.",
                state_options.join(", ")
            ),
        )
    } else {
        (
            AxisClass::Structural,
            format!("Axis \"{}\" changes appearance only.", axis.name),
        )
    };
    AxisClassification {
        axis: axis.name.clone(),
        class,
        options: axis.options.clone(),
        rationale,
    }
}

/// Mapping recommendation for a component's variant axes; `None` without axes.
pub fn variant_mapping(axes: &[VariantAxis]) -> Option<VariantMapping> {
    if axes.is_empty() {
        return None;
    }
    let axes: Vec<AxisClassification> = axes.iter().map(classify_axis).collect();
    let behavioral: Vec<&str> = axes
        .iter()
        .filter(|a| a.class == AxisClass::Behavioral)
        .map(|a| a.axis.as_str())
        .collect();
    let split = !behavioral.is_empty();

    let option_a = MappingOption {
        label: "A".to_string(),
        title: "Single component with variant props".to_string(),
        recommended: !split,
        rationale: if split {
            "Possible, but behavioral axes would put interaction logic behind style props."
                .to_string()
        } else {
            "Every axis is styling-only, so one component with props covers the set.".to_string()
        },
        tradeoffs: vec![
            "Smallest API surface and one implementation per platform".to_string(),
            "Prop combinations grow multiplicatively with each axis".to_string(),
            "Behavior differences become conditionals inside one component".to_string(),
        ],
    };
    let option_b = MappingOption {
        label: "B".to_string(),
        title: "Primitive base with semantic variants".to_string(),
        recommended: split,
        rationale: if split {
            format!(
                "Behavioral axes ({}) change interaction, which a shared primitive base \
                 with semantic variants keeps separate.",
                behavioral.join(", ")
            )
        } else {
            "Available if variants are expected to diverge in behavior later.".to_string()
        },
        tradeoffs: vec![
            "Clear contracts per semantic variant".to_string(),
            "More components to document and keep in sync".to_string(),
            "Shared styling must live in the primitive to avoid drift".to_string(),
        ],
    };

    Some(VariantMapping {
        review_status: ReviewStatus::PendingHumanReview,
        framing: FRAMING.to_string(),
        axes,
        options: vec![option_a, option_b],
    })
}
