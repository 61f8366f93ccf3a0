//! Interaction states without an equivalent on every platform.

use designtok_types::{Node, Platform, PlatformInteraction, PlatformParity, ReviewStatus, Scalar, VariantAxis};

/// Known interaction states and the platforms that support them natively.
const PLATFORM_SUPPORT: &[(&str, &[Platform])] = &[
    ("hover", &[Platform::Web]),
    ("focus", &Platform::ALL),
    ("pressed", &Platform::ALL),
    ("disabled", &Platform::ALL),
    ("active", &Platform::ALL),
    ("selected", &Platform::ALL),
    ("long-press", &[Platform::Ios, Platform::Android]),
    ("loading", &Platform::ALL),
    ("error", &Platform::ALL),
];

/// Canonical state name for a variant option or property value.
pub fn normalize_state(raw: &str) -> Option<&'static str> {
    let lowered = raw.trim().to_lowercase().replace([' ', '_'], "-");
    let lowered = if lowered == "longpress" {
        "long-press".to_string()
    } else {
        lowered
    };
    PLATFORM_SUPPORT
        .iter()
        .map(|(name, _)| *name)
        .find(|name| *name == lowered)
}

fn supported_platforms(state: &str) -> &'static [Platform] {
    PLATFORM_SUPPORT
        .iter()
        .find(|(name, _)| *name == state)
        .map_or(&Platform::ALL, |(_, platforms)| platforms)
}

fn join(platforms: &[Platform]) -> String {
    platforms
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn recommendation(state: &str, supported: &[Platform], missing: &[Platform]) -> String {
    let (supported, missing) = (join(supported), join(missing));
    match state {
        "hover" => format!(
            "\"{state}\" is {supported}-only (not available on {missing}). Decision options: \
             (a) omit hover feedback on mobile, (b) map to press/active state on mobile, \
             (c) provide alternative visual feedback."
        ),
        "long-press" => format!(
            "\"{state}\" is {supported}-only (not available on {missing}). Decision options: \
             (a) omit on web, (b) map to right-click/context menu on web, \
             (c) provide alternative trigger."
        ),
        _ => format!(
            "\"{state}\" is available on {supported} but not on {missing}. Decision options: \
             (a) omit on {missing}, (b) map to equivalent interaction, (c) defer to human review."
        ),
    }
}

/// States named by variant options and instance property values, first-seen.
pub fn detected_states(axes: &[VariantAxis], root: &Node) -> Vec<&'static str> {
    let mut states: Vec<&'static str> = Vec::new();
    let mut push = |raw: &str| {
        if let Some(state) = normalize_state(raw)
            && !states.contains(&state)
        {
            states.push(state);
        }
    };
    for axis in axes {
        for option in &axis.options {
            push(option);
        }
    }
    root.walk(&mut |node| {
        for prop in node.component_properties.iter().flat_map(|p| p.values()) {
            if let Scalar::Text(value) = &prop.value {
                push(value);
            }
        }
    });
    states
}

pub fn platform_parity(axes: &[VariantAxis], root: &Node) -> Option<PlatformParity> {
    let interactions: Vec<PlatformInteraction> = detected_states(axes, root)
        .into_iter()
        .filter_map(|state| {
            let supported = supported_platforms(state);
            let missing: Vec<Platform> = Platform::ALL
                .iter()
                .copied()
                .filter(|p| !supported.contains(p))
                .collect();
            if missing.is_empty() {
                return None;
            }
            Some(PlatformInteraction {
                interaction: state.to_string(),
                supported: supported.to_vec(),
                recommendation: recommendation(state, supported, &missing),
                missing,
            })
        })
        .collect();
    (!interactions.is_empty()).then(|| PlatformParity {
        review_status: ReviewStatus::PendingHumanReview,
        interactions,
    })
}
