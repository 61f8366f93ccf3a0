//! BDD-style scenario tests for the token matcher.

use designtok_bindings::BindingResolver;
use designtok_match::*;
use designtok_settings::{ToleranceBands, TreeSettings};
use designtok_tokens::{ResolvedVariable, TokenTable, VariableTable};
use designtok_tree::{ExtractedProperty, RawNode, build_node_tree, index_properties};
use designtok_types::{
    Classification, Confidence, MatchMethod, Scalar, TokenCategory, UnidentifiedReason,
    UnresolvedReason,
};

const TOKENS: &str = r##"{
  "families": { "space": 8 },
  "primitives": [
    { "path": "space.100", "value": 8 },
    { "path": "space.200", "value": 16 },
    { "path": "space.050", "value": 4 },
    { "path": "radius.100", "value": 8 },
    { "path": "radius.alt", "family": "radius", "value": 8 },
    { "path": "color.purple.300", "category": "color", "value": "rgba(147, 51, 234, 1)" },
    { "path": "color.white", "category": "color", "value": "#FFFFFF" }
  ],
  "semantics": [
    { "path": "inset.md", "references": "space.200" },
    { "path": "color.primary", "references": "color.purple.300" }
  ]
}"##;

fn tokens() -> TokenTable {
    TokenTable::from_json_str(TOKENS).expect("tokens")
}

fn variables() -> VariableTable {
    let mut table = VariableTable::new();
    for (id, name) in [
        ("VariableID:1:1", "space/100"),
        ("VariableID:1:2", "inset/md"),
        ("VariableID:1:3", "legacy/gap"),
    ] {
        table.insert(ResolvedVariable {
            id: id.into(),
            name: name.into(),
            resolved_type: "FLOAT".into(),
            modes: Vec::new(),
        });
    }
    table.mark_failed("VariableID:9:9");
    table
}

fn prop(property: &str, category: TokenCategory, value: Scalar, bound: Option<&str>) -> ExtractedProperty {
    ExtractedProperty {
        property: property.into(),
        category,
        raw_value: value,
        bound_variable_id: bound.map(str::to_string),
    }
}

fn classify(p: &ExtractedProperty, bands: &ToleranceBands) -> MatchOutcome {
    let table = tokens();
    let vars = variables();
    TokenMatcher::new(&table, &vars, bands).classify(p)
}

#[test]
fn given_bound_primitive_when_classified_then_exact_binding_primitive() {
    let p = prop("padding-top", TokenCategory::Spacing, Scalar::Number(8.0), Some("VariableID:1:1"));
    let outcome = classify(&p, &ToleranceBands::strict());
    match outcome.classification {
        Classification::Primitive(token) => {
            assert_eq!(token.primitive_token, "space.100");
            assert_eq!(token.match_method, MatchMethod::Binding);
            assert_eq!(token.confidence, Confidence::Exact);
            assert!(token.semantic_token.is_none());
        }
        other => panic!("expected primitive, got {other:?}"),
    }
    assert!(outcome.failed_binding.is_none());
}

#[test]
fn given_bound_semantic_when_classified_then_primitive_is_resolved() {
    let p = prop("padding-left", TokenCategory::Spacing, Scalar::Number(16.0), Some("VariableID:1:2"));
    match classify(&p, &ToleranceBands::strict()).classification {
        Classification::Semantic(token) => {
            assert_eq!(token.semantic_token.as_deref(), Some("inset.md"));
            assert_eq!(token.primitive_token, "space.200");
        }
        other => panic!("expected semantic, got {other:?}"),
    }
}

#[test]
fn given_exact_value_with_wrapping_semantic_when_classified_then_upgraded() {
    let p = prop("item-spacing", TokenCategory::Spacing, Scalar::Number(16.0), None);
    match classify(&p, &ToleranceBands::strict()).classification {
        Classification::Semantic(token) => {
            assert_eq!(token.semantic_token.as_deref(), Some("inset.md"));
            assert_eq!(token.primitive_token, "space.200");
            assert_eq!(token.match_method, MatchMethod::Value);
        }
        other => panic!("expected semantic, got {other:?}"),
    }
}

#[test]
fn given_value_inside_band_when_classified_then_approximate_with_signed_delta() {
    let bands = ToleranceBands::strict().with(TokenCategory::Spacing, 2.0);
    let p = prop("padding-top", TokenCategory::Spacing, Scalar::Number(9.0), None);
    match classify(&p, &bands).classification {
        Classification::Primitive(token) => {
            assert_eq!(token.primitive_token, "space.100");
            assert_eq!(token.confidence, Confidence::Approximate);
            assert_eq!(token.delta.as_deref(), Some("+1px"));
        }
        other => panic!("expected primitive, got {other:?}"),
    }

    let p = prop("padding-top", TokenCategory::Spacing, Scalar::Number(14.0), None);
    match classify(&p, &bands).classification {
        Classification::Semantic(token) => assert_eq!(token.delta.as_deref(), Some("-2px")),
        other => panic!("expected semantic, got {other:?}"),
    }
}

#[test]
fn given_strict_bands_when_value_is_off_by_one_then_out_of_tolerance_with_hint() {
    let p = prop("padding-top", TokenCategory::Spacing, Scalar::Number(9.0), None);
    match classify(&p, &ToleranceBands::strict()).classification {
        Classification::Unidentified(value) => {
            assert_eq!(value.reason, UnidentifiedReason::OutOfTolerance);
            let hint = value.closest_match.expect("hint");
            assert_eq!(hint.token, "space.100");
            assert_eq!(hint.delta, "+1px");
        }
        other => panic!("expected unidentified, got {other:?}"),
    }
}

#[test]
fn given_no_candidates_in_category_when_classified_then_no_token_match() {
    let p = prop("font-size", TokenCategory::FontSize, Scalar::Number(14.0), None);
    match classify(&p, &ToleranceBands::strict()).classification {
        Classification::Unidentified(value) => {
            assert_eq!(value.reason, UnidentifiedReason::NoTokenMatch);
            assert!(value.closest_match.is_none());
        }
        other => panic!("expected unidentified, got {other:?}"),
    }
}

#[test]
fn given_equidistant_candidates_when_classified_then_smaller_multiplier_wins() {
    let bands = ToleranceBands::strict().with(TokenCategory::Spacing, 4.0);
    let p = prop("padding-top", TokenCategory::Spacing, Scalar::Number(12.0), None);
    match classify(&p, &bands).classification {
        Classification::Primitive(token) => {
            assert_eq!(token.primitive_token, "space.100");
            assert_eq!(token.delta.as_deref(), Some("+4px"));
        }
        other => panic!("expected primitive, got {other:?}"),
    }
}

#[test]
fn given_equidistant_candidates_when_paths_disagree_then_multiplier_beats_path() {
    // space.a sorts first but sits at 2x; space.z sits at 1x.
    let table = TokenTable::from_json_str(
        r#"{
          "families": { "space": 8 },
          "primitives": [
            { "path": "space.a", "value": 16 },
            { "path": "space.z", "value": 8 }
          ]
        }"#,
    )
    .expect("tokens");
    let vars = VariableTable::new();
    let bands = ToleranceBands::strict().with(TokenCategory::Spacing, 4.0);
    let p = prop("padding-top", TokenCategory::Spacing, Scalar::Number(12.0), None);

    match TokenMatcher::new(&table, &vars, &bands).classify(&p).classification {
        Classification::Primitive(token) => {
            assert_eq!(token.primitive_token, "space.z");
            assert_eq!(token.confidence, Confidence::Approximate);
        }
        other => panic!("expected primitive, got {other:?}"),
    }
}

#[test]
fn given_equal_value_and_multiplier_when_classified_then_lexical_path_wins() {
    let p = prop("border-radius", TokenCategory::Radius, Scalar::Number(8.0), None);
    match classify(&p, &ToleranceBands::strict()).classification {
        Classification::Primitive(token) => assert_eq!(token.primitive_token, "radius.100"),
        other => panic!("expected primitive, got {other:?}"),
    }
}

#[test]
fn given_identical_color_when_classified_then_exact_semantic() {
    let p = prop("fill", TokenCategory::Color, Scalar::from("rgba(147, 51, 234, 1)"), None);
    match classify(&p, &ToleranceBands::strict()).classification {
        Classification::Semantic(token) => {
            assert_eq!(token.semantic_token.as_deref(), Some("color.primary"));
            assert_eq!(token.confidence, Confidence::Exact);
        }
        other => panic!("expected semantic, got {other:?}"),
    }
}

#[test]
fn given_near_color_inside_delta_e_band_when_classified_then_approximate() {
    let bands = ToleranceBands::strict().with(TokenCategory::Color, 3.0);
    let p = prop("fill", TokenCategory::Color, Scalar::from("rgba(254, 254, 254, 1)"), None);
    match classify(&p, &bands).classification {
        Classification::Primitive(token) => {
            assert_eq!(token.primitive_token, "color.white");
            assert_eq!(token.confidence, Confidence::Approximate);
            let delta = token.delta.expect("delta");
            assert!(delta.starts_with("ΔE "), "{delta}");
        }
        other => panic!("expected primitive, got {other:?}"),
    }
}

#[test]
fn given_failed_binding_with_matching_value_when_classified_then_value_match_and_failure() {
    let p = prop("padding-top", TokenCategory::Spacing, Scalar::Number(8.0), Some("VariableID:9:9"));
    let outcome = classify(&p, &ToleranceBands::strict());
    assert!(matches!(outcome.classification, Classification::Primitive(_)));
    assert_eq!(outcome.failed_binding, Some(UnresolvedReason::UpstreamResolutionFailed));
}

#[test]
fn given_binding_to_untokened_variable_when_value_misses_then_unresolved_binding() {
    let p = prop("padding-top", TokenCategory::Spacing, Scalar::Number(13.0), Some("VariableID:1:3"));
    let outcome = classify(&p, &ToleranceBands::strict());
    match outcome.classification {
        Classification::Unidentified(value) => {
            assert_eq!(value.reason, UnidentifiedReason::UnresolvedBinding);
            assert_eq!(value.bound_variable_id.as_deref(), Some("VariableID:1:3"));
        }
        other => panic!("expected unidentified, got {other:?}"),
    }
    assert_eq!(outcome.failed_binding, Some(UnresolvedReason::NotInTokenTable));
}

#[test]
fn given_tree_when_matched_then_each_node_gets_its_own_properties_and_failures_are_reported() {
    let raw = RawNode::from_json_str(
        r#"{"id":"1:0","name":"Card","type":"COMPONENT","paddingTop":16,
            "boundVariables":{"paddingTop":{"id":"VariableID:7:7"}},
            "children":[{"id":"1:1","name":"Body","type":"FRAME","itemSpacing":8,"paddingLeft":5}]}"#,
    )
    .expect("parse");
    let mut root = build_node_tree(&raw, &TreeSettings::default()).expect("build");
    let index = index_properties(&raw);
    let table = tokens();
    let vars = variables();
    let bands = ToleranceBands::strict();
    let mut resolver = BindingResolver::new();
    TokenMatcher::new(&table, &vars, &bands).match_tree(&mut root, &index, &mut resolver);

    assert_eq!(root.token_classifications.semantic_identified.len(), 1);
    let body = &root.children[0].token_classifications;
    assert_eq!(body.unidentified.len(), 1);
    assert_eq!(body.unidentified[0].property, "padding-left");
    assert_eq!(body.primitive_identified[0].property, "item-spacing");

    let unresolved = resolver.finish();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].node_id, "1:0");
    assert_eq!(unresolved[0].reason, UnresolvedReason::NotInTokenTable);
}
