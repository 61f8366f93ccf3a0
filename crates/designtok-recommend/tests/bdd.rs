//! BDD-style scenario tests for recommendation synthesis.

use std::collections::BTreeMap;

use designtok_recommend::*;
use designtok_settings::RecommendSettings;
use designtok_tokens::{ModeValue, ResolvedVariable, VariableTable, VariableValue};
use designtok_types::{
    AxisClass, Classification, ClassifiedToken, ComponentProperty, ComponentPropertyKind,
    Confidence, DiscrepancyCategory, MatchMethod, Node, NodeKind, Platform, ReviewStatus, Scalar,
    TokenClassifications, VariantAxis,
};

fn node(id: &str, name: &str, kind: NodeKind, children: Vec<Node>) -> Node {
    Node {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        component_id: None,
        depth: 0,
        ancestor_chain: Vec::new(),
        layout: None,
        component_properties: None,
        token_classifications: TokenClassifications::default(),
        children,
    }
}

fn with_tokens(mut n: Node, tokens: &[(&str, &str)]) -> Node {
    for (property, primitive) in tokens {
        n.token_classifications
            .push(Classification::Primitive(ClassifiedToken {
                property: (*property).to_string(),
                semantic_token: None,
                primitive_token: (*primitive).to_string(),
                raw_value: Scalar::Number(16.0),
                match_method: MatchMethod::Value,
                confidence: Confidence::Exact,
                delta: None,
            }));
    }
    n
}

fn axis(name: &str, options: &[&str]) -> VariantAxis {
    VariantAxis {
        name: name.to_string(),
        options: options.iter().map(|o| (*o).to_string()).collect(),
    }
}

fn variable(id: &str, name: &str, kind: &str, light: VariableValue, dark: VariableValue) -> ResolvedVariable {
    ResolvedVariable {
        id: id.to_string(),
        name: name.to_string(),
        resolved_type: kind.to_string(),
        modes: vec![
            ModeValue { mode: "Light".into(), value: light },
            ModeValue { mode: "Dark".into(), value: dark },
        ],
    }
}

// ---------------------------------------------------------------------------
// Variant mapping
// ---------------------------------------------------------------------------

#[test]
fn given_styling_only_axes_when_mapped_then_single_component_is_recommended() {
    let mapping = variant_mapping(&[axis("Size", &["Sm", "Md", "Lg"]), axis("Tone", &["Neutral", "Brand"])])
        .expect("mapping");
    assert!(mapping.axes.iter().all(|a| a.class == AxisClass::Structural));
    let recommended: Vec<_> = mapping.options.iter().filter(|o| o.recommended).collect();
    assert_eq!(recommended.len(), 1);
    assert_eq!(recommended[0].label, "A");
    assert!(recommended[0].title.contains("Single component"));
    assert!(mapping.options.iter().all(|o| !o.tradeoffs.is_empty()));
    assert!(mapping.framing.contains("not a final decision"));
    assert_eq!(mapping.review_status, ReviewStatus::PendingHumanReview);
}

#[test]
fn given_behavioral_axis_when_mapped_then_primitive_base_is_recommended() {
    let mapping = variant_mapping(&[
        axis("Size", &["Sm", "Lg"]),
        axis("Interaction", &["Default", "Hover", "Pressed"]),
    ])
    .expect("mapping");
    assert_eq!(mapping.axes[1].class, AxisClass::Behavioral);
    let b = mapping.options.iter().find(|o| o.label == "B").expect("option b");
    assert!(b.recommended);
    assert!(b.title.contains("Primitive"));
    assert!(b.rationale.contains("Interaction"));
}

#[test]
fn given_axis_with_state_options_when_classified_then_behavioral() {
    let classified = classify_axis(&axis("Kind", &["Default", "Disabled"]));
    assert_eq!(classified.class, AxisClass::Behavioral);
    assert!(classified.rationale.contains("Disabled"));
}

#[test]
fn given_no_axes_when_mapped_then_no_block() {
    assert!(variant_mapping(&[]).is_none());
}

// ---------------------------------------------------------------------------
// Component-token candidates
// ---------------------------------------------------------------------------

#[test]
fn given_shared_primitive_across_siblings_when_scanned_then_candidate_with_locations() {
    let root = node(
        "1:0",
        "ButtonPrimary",
        NodeKind::Component,
        vec![
            with_tokens(node("1:1", "Leading", NodeKind::Frame, vec![]), &[("padding-left", "space.200")]),
            with_tokens(node("1:2", "Trailing", NodeKind::Frame, vec![]), &[("padding-right", "space.200")]),
            with_tokens(node("1:3", "Label", NodeKind::Text, vec![]), &[("font-size", "font.size.100")]),
        ],
    );
    let block = component_token_candidates(&root, "ButtonPrimary", 2).expect("candidates");
    assert_eq!(block.candidates.len(), 1);
    let c = &block.candidates[0];
    assert_eq!(c.primitive_token, "space.200");
    assert_eq!(c.usage_count, 2);
    assert_eq!(c.scope_node_id, "1:0");
    assert_eq!(c.locations, vec!["Leading › padding-left", "Trailing › padding-right"]);
    assert_eq!(c.illustrative_name, "button.padding.horizontal = space.200");
}

#[test]
fn given_usage_below_threshold_when_scanned_then_no_block() {
    let root = node(
        "1:0",
        "Card",
        NodeKind::Component,
        vec![with_tokens(node("1:1", "Body", NodeKind::Frame, vec![]), &[("item-spacing", "space.100")])],
    );
    assert!(component_token_candidates(&root, "Card", 2).is_none());
}

#[test]
fn given_candidates_when_sorted_then_most_used_first() {
    let root = node(
        "1:0",
        "Chip",
        NodeKind::Component,
        vec![
            with_tokens(node("1:1", "A", NodeKind::Frame, vec![]), &[("fill", "color.gray.100"), ("border-radius", "radius.100")]),
            with_tokens(node("1:2", "B", NodeKind::Frame, vec![]), &[("fill", "color.gray.100"), ("border-radius", "radius.100")]),
            with_tokens(node("1:3", "C", NodeKind::Frame, vec![]), &[("border-radius", "radius.100")]),
        ],
    );
    let block = component_token_candidates(&root, "Chip", 2).expect("candidates");
    assert_eq!(block.candidates[0].primitive_token, "radius.100");
    assert_eq!(block.candidates[0].usage_count, 3);
    assert_eq!(block.candidates[1].illustrative_name, "chip.fill = color.gray.100");
}

#[test]
fn given_component_names_when_based_then_first_word_lowercased() {
    assert_eq!(component_base_name("ButtonPrimary"), "button");
    assert_eq!(component_base_name("Text Field"), "text");
    assert_eq!(component_base_name(""), "component");
    assert_eq!(component_base_name("CTAButton"), "ctabutton");
    assert_eq!(component_base_name("IconCTA"), "icon");
    assert_eq!(component_base_name("Chip-Filter"), "chip");
    assert_eq!(infer_property_group(&["padding-top", "padding-bottom"]), "padding.vertical");
    assert_eq!(infer_property_group(&["font-size", "line-height"]), "typography");
    assert_eq!(infer_property_group(&["fill", "padding-top"]), "token");
}

// ---------------------------------------------------------------------------
// Mode validation
// ---------------------------------------------------------------------------

fn mode_table() -> VariableTable {
    let mut table = VariableTable::new();
    table.insert(variable(
        "V:1",
        "color/surface",
        "COLOR",
        VariableValue::Literal(Scalar::from("#FFFFFF")),
        VariableValue::Literal(Scalar::from("#000000")),
    ));
    table.insert(variable(
        "V:2",
        "space/200",
        "FLOAT",
        VariableValue::Literal(Scalar::Number(16.0)),
        VariableValue::Literal(Scalar::Number(12.0)),
    ));
    table.insert(variable(
        "V:3",
        "radius/100",
        "FLOAT",
        VariableValue::Literal(Scalar::Number(8.0)),
        VariableValue::Literal(Scalar::Number(8.0)),
    ));
    table.insert(variable(
        "V:4",
        "space/300",
        "FLOAT",
        VariableValue::Literal(Scalar::Number(24.0)),
        VariableValue::Alias { alias_of: "V:2".into() },
    ));
    table
}

#[test]
fn given_mode_differences_when_validated_then_colors_expected_and_spacing_flagged() {
    let table = mode_table();
    let block = mode_validation(["V:1", "V:2", "V:3", "V:4"], &table, &[]).expect("block");
    assert_eq!(block.discrepancies.len(), 2);
    assert_eq!(block.discrepancies[0].category, DiscrepancyCategory::Expected);
    assert_eq!(block.discrepancies[0].mode_a, "Light");
    let spacing = &block.discrepancies[1];
    assert_eq!(spacing.variable_name, "space/200");
    assert_eq!(spacing.category, DiscrepancyCategory::Unexpected);
    assert_eq!(spacing.value_b, Scalar::Number(12.0));
    assert!(block.has_unexpected);
}

#[test]
fn given_documented_variation_when_validated_then_expected() {
    let table = mode_table();
    let block = mode_validation(["V:2"], &table, &["space/200".to_string()]).expect("block");
    assert_eq!(block.discrepancies[0].category, DiscrepancyCategory::Expected);
    assert!(!block.has_unexpected);
}

#[test]
fn given_identical_or_aliased_modes_when_validated_then_no_block() {
    let table = mode_table();
    assert!(mode_validation(["V:3", "V:4", "V:missing"], &table, &[]).is_none());
}

// ---------------------------------------------------------------------------
// Platform parity
// ---------------------------------------------------------------------------

#[test]
fn given_hover_option_when_checked_then_web_only_interaction_with_decisions() {
    let root = node("1:0", "Button", NodeKind::ComponentSet, vec![]);
    let parity = platform_parity(&[axis("State", &["Default", "Hover", "Pressed"])], &root).expect("parity");
    assert_eq!(parity.interactions.len(), 1);
    let hover = &parity.interactions[0];
    assert_eq!(hover.interaction, "hover");
    assert_eq!(hover.supported, vec![Platform::Web]);
    assert_eq!(hover.missing, vec![Platform::Ios, Platform::Android]);
    assert!(hover.recommendation.contains("(a) omit hover feedback on mobile"));
    assert!(hover.recommendation.contains("(c) provide alternative visual feedback"));
}

#[test]
fn given_long_press_instance_property_when_checked_then_missing_on_web() {
    let mut child = node("1:1", "Row", NodeKind::Instance, vec![]);
    child.component_properties = Some(BTreeMap::from([(
        "Trigger".to_string(),
        ComponentProperty {
            kind: ComponentPropertyKind::Variant,
            value: Scalar::from("Long Press"),
        },
    )]));
    let root = node("1:0", "List", NodeKind::Frame, vec![child]);
    let parity = platform_parity(&[], &root).expect("parity");
    assert_eq!(parity.interactions[0].interaction, "long-press");
    assert_eq!(parity.interactions[0].missing, vec![Platform::Web]);
    assert!(parity.interactions[0].recommendation.contains("right-click/context menu"));
}

#[test]
fn given_universal_states_only_when_checked_then_no_block() {
    let root = node("1:0", "Input", NodeKind::ComponentSet, vec![]);
    assert!(platform_parity(&[axis("State", &["Focus", "Disabled", "Error"])], &root).is_none());
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

#[test]
fn given_disabled_settings_when_synthesized_then_none() {
    let root = node("1:0", "Button", NodeKind::ComponentSet, vec![]);
    let axes = [axis("State", &["Hover"])];
    let table = VariableTable::new();
    let input = RecommendInput {
        component_name: "Button",
        root: &root,
        variant_axes: &axes,
        bound_variable_ids: &[],
        variables: &table,
    };
    let settings = RecommendSettings {
        enabled: false,
        ..RecommendSettings::default()
    };
    assert!(synthesize(&input, &settings).is_none());
}

#[test]
fn given_nothing_to_recommend_when_synthesized_then_none() {
    let root = node("1:0", "Divider", NodeKind::Component, vec![]);
    let table = VariableTable::new();
    let input = RecommendInput {
        component_name: "Divider",
        root: &root,
        variant_axes: &[],
        bound_variable_ids: &[],
        variables: &table,
    };
    assert!(synthesize(&input, &RecommendSettings::default()).is_none());
}

#[test]
fn given_toggled_off_block_when_synthesized_then_only_enabled_blocks_populate() {
    let root = node("1:0", "Button", NodeKind::ComponentSet, vec![]);
    let axes = [axis("State", &["Default", "Hover"])];
    let table = VariableTable::new();
    let input = RecommendInput {
        component_name: "Button",
        root: &root,
        variant_axes: &axes,
        bound_variable_ids: &[],
        variables: &table,
    };
    let settings = RecommendSettings {
        platform_parity: false,
        ..RecommendSettings::default()
    };
    let bundle = synthesize(&input, &settings).expect("bundle");
    assert!(bundle.variant_mapping.is_some());
    assert!(bundle.platform_parity.is_none());
    assert_eq!(bundle.populated_count(), 1);
}
