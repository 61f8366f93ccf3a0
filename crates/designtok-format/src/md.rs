//! Narrative Markdown rendering.
//!
//! Section order is fixed. Optional sections are left out entirely when
//! they have nothing to show; the summary and node tree always render.

use std::collections::BTreeMap;

use designtok_math::fmt_pct;
use designtok_types::{
    AxisClass, ClassifiedToken, ComponentAnalysis, ComponentProperty, ComponentTokenCandidates,
    CompositionPattern, Confidence, DiscrepancyCategory, MatchMethod, ModeValidation, Node, NodeKind,
    Platform, PlatformParity, RecommendationBundle, Scalar, ScreenshotMeta, UnresolvedBinding,
    VariantMapping,
};

pub(crate) const VALIDATION_DISCLAIMER: &str = "> ⚠️ VALIDATION REQUIRED: advisory output \
generated from heuristics. A human reviewer must confirm it before it changes tokens or components.";

pub fn render_md(analysis: &ComponentAnalysis) -> String {
    let mut out = String::new();
    render_header(&mut out, analysis);
    render_summary(&mut out, analysis);
    render_tree(&mut out, &analysis.root);
    render_token_usage(&mut out, &analysis.root);
    if !analysis.composition_patterns.is_empty() {
        render_patterns(&mut out, &analysis.composition_patterns);
    }
    if !analysis.unresolved_bindings.is_empty() {
        render_unresolved(&mut out, &analysis.unresolved_bindings);
    }
    if let Some(bundle) = &analysis.recommendations
        && !bundle.is_empty()
    {
        render_recommendations(&mut out, bundle);
    }
    render_unidentified(&mut out, &analysis.root);
    if !analysis.screenshots.is_empty() {
        render_screenshots(&mut out, &analysis.screenshots);
    }
    out
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Escape a value for a table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn node_label(name: &str, id: &str) -> String {
    format!("{} ({})", cell(name), id)
}

fn join_kinds(chain: &[NodeKind]) -> String {
    if chain.is_empty() {
        "(root)".to_string()
    } else {
        chain
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(" › ")
    }
}

fn join_platforms(platforms: &[Platform]) -> String {
    platforms
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_scalars(map: &BTreeMap<String, Scalar>) -> String {
    map.iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_properties(map: &BTreeMap<String, ComponentProperty>) -> String {
    map.iter()
        .map(|(k, p)| format!("{k}={}", p.value))
        .collect::<Vec<_>>()
        .join(", ")
}

fn method(method: MatchMethod) -> &'static str {
    match method {
        MatchMethod::Binding => "binding",
        MatchMethod::Value => "value",
    }
}

fn confidence_flag(token: &ClassifiedToken) -> String {
    match (&token.confidence, &token.delta) {
        (Confidence::Exact, _) => "✅ exact".to_string(),
        (Confidence::Approximate, Some(delta)) => format!("⚠️ approximate ({delta})"),
        (Confidence::Approximate, None) => "⚠️ approximate".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn render_header(out: &mut String, analysis: &ComponentAnalysis) {
    let component = &analysis.component;
    out.push_str(&format!("# Component Analysis: {}\n\n", component.name));
    out.push_str(&format!(
        "- **Component**: `{}` ({})\n",
        component.name, component.kind
    ));
    out.push_str(&format!("- **Node ID**: `{}`\n", component.node_id));
    if let Some(file_key) = &component.file_key {
        out.push_str(&format!("- **File Key**: `{file_key}`\n"));
    }
    if let Some(axes) = &analysis.variant_axes
        && !axes.is_empty()
    {
        let rendered = axes
            .iter()
            .map(|a| format!("{} ({})", a.name, a.options.join(", ")))
            .collect::<Vec<_>>()
            .join("; ");
        out.push_str(&format!("- **Variant Axes**: {rendered}\n"));
    }
    out.push_str(&format!(
        "- **Extracted**: {} by {} {}\n",
        analysis.extraction.extracted_at,
        analysis.extraction.tool.name,
        analysis.extraction.tool.version
    ));
    out.push_str(&format!("- **Schema Version**: {}\n", analysis.schema_version));
    let confidence = &analysis.confidence;
    out.push_str(&format!(
        "- **Confidence**: ✅ {} exact · ⚠️ {} approximate · ❌ {} unmatched\n\n",
        confidence.exact, confidence.approximate, confidence.unmatched
    ));
}

fn render_summary(out: &mut String, analysis: &ComponentAnalysis) {
    let summary = &analysis.classification_summary;
    let total = summary.total();
    out.push_str("## Classification Summary\n\n");
    out.push_str("|Tier|Count|Share|\n");
    out.push_str("|---|---:|---:|\n");
    for (label, count) in [
        ("Semantic", summary.semantic_identified),
        ("Primitive", summary.primitive_identified),
        ("Unidentified", summary.unidentified),
    ] {
        out.push_str(&format!("|{label}|{count}|{}|\n", fmt_pct(count, total)));
    }
    out.push_str(&format!("|**Total**|{total}|{}|\n\n", fmt_pct(total, total)));
}

fn render_tree(out: &mut String, root: &Node) {
    out.push_str("## Node Tree\n\n");
    root.walk(&mut |node| {
        let indent = "  ".repeat(node.depth);
        out.push_str(&format!(
            "{indent}- **{}** `{}` ({})",
            node.name, node.kind, node.id
        ));
        let counts = node.token_classifications.summary();
        if counts.total() > 0 {
            out.push_str(&format!(
                " · {} semantic / {} primitive / {} unidentified",
                counts.semantic_identified, counts.primitive_identified, counts.unidentified
            ));
        }
        if let Some(props) = &node.component_properties
            && !props.is_empty()
        {
            out.push_str(&format!(" · {}", join_properties(props)));
        }
        out.push('\n');
    });
    out.push('\n');
}

fn render_token_usage(out: &mut String, root: &Node) {
    out.push_str("## Token Usage\n\n");
    let mut any = false;
    root.walk(&mut |node| {
        let classes = &node.token_classifications;
        if classes.semantic_identified.is_empty() && classes.primitive_identified.is_empty() {
            return;
        }
        any = true;
        out.push_str(&format!("### {}\n\n", node_label(&node.name, &node.id)));
        out.push_str("|Tier|Property|Token|Confidence|Method|\n");
        out.push_str("|---|---|---|---|---|\n");
        for token in &classes.semantic_identified {
            let name = token.semantic_token.as_deref().unwrap_or(&token.primitive_token);
            out.push_str(&format!(
                "|🟢 semantic|{}|`{}` (primitive: `{}`)|{}|{}|\n",
                token.property,
                name,
                token.primitive_token,
                confidence_flag(token),
                method(token.match_method)
            ));
        }
        for token in &classes.primitive_identified {
            out.push_str(&format!(
                "|🔵 primitive|{}|`{}`|{}|{}|\n",
                token.property,
                token.primitive_token,
                confidence_flag(token),
                method(token.match_method)
            ));
        }
        out.push('\n');
    });
    if !any {
        out.push_str("_No token matches._\n\n");
    }
}

fn render_patterns(out: &mut String, patterns: &[CompositionPattern]) {
    out.push_str("## Composition Patterns\n\n");
    for pattern in patterns {
        out.push_str(&format!(
            "### {} ×{} under {}\n\n",
            pattern.component_name,
            pattern.count,
            node_label(&pattern.parent_name, &pattern.parent_id)
        ));
        out.push_str(&format!("- **Depth**: {}\n", pattern.depth));
        if pattern.shared_properties.is_empty() {
            out.push_str("- **Shared**: _none_\n");
        } else {
            out.push_str(&format!(
                "- **Shared**: {}\n",
                join_scalars(&pattern.shared_properties)
            ));
        }
        out.push_str("- **Variations**:\n");
        for variation in &pattern.property_variations {
            let label = if variation.properties.is_empty() {
                "(identical)".to_string()
            } else {
                join_scalars(&variation.properties)
            };
            out.push_str(&format!("  - {label} ×{}\n", variation.count));
        }
        out.push('\n');
    }
}

fn render_unresolved(out: &mut String, bindings: &[UnresolvedBinding]) {
    out.push_str("## Unresolved Bindings\n\n");
    out.push_str("|Variable|Node|Property|Reason|Ancestors|\n");
    out.push_str("|---|---|---|---|---|\n");
    for binding in bindings {
        out.push_str(&format!(
            "|`{}`|{}|{}|{}|{}|\n",
            binding.variable_id,
            node_label(&binding.node_name, &binding.node_id),
            binding.property,
            binding.reason.as_str(),
            join_kinds(&binding.ancestor_chain)
        ));
    }
    out.push('\n');
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

fn block_open(out: &mut String, title: &str) {
    out.push_str(VALIDATION_DISCLAIMER);
    out.push_str("\n\n");
    out.push_str(&format!("### {title}\n\n"));
}

fn reviewer_prompts(out: &mut String, prompts: &[&str]) {
    out.push_str("**Reviewer prompts**:\n");
    for prompt in prompts {
        out.push_str(&format!("- {prompt}\n"));
    }
    out.push('\n');
}

fn render_recommendations(out: &mut String, bundle: &RecommendationBundle) {
    out.push_str("## Recommendations\n\n");
    if let Some(mapping) = &bundle.variant_mapping {
        render_variant_mapping(out, mapping);
    }
    if let Some(candidates) = &bundle.component_token_candidates {
        render_candidates(out, candidates);
    }
    if let Some(validation) = &bundle.mode_validation {
        render_mode_validation(out, validation);
    }
    if let Some(parity) = &bundle.platform_parity {
        render_platform_parity(out, parity);
    }
}

fn render_variant_mapping(out: &mut String, mapping: &VariantMapping) {
    block_open(out, "Variant Mapping");
    out.push_str(&format!("_{}_\n\n", mapping.framing));
    out.push_str("|Axis|Class|Options|Rationale|\n");
    out.push_str("|---|---|---|---|\n");
    for axis in &mapping.axes {
        let class = match axis.class {
            AxisClass::Structural => "structural",
            AxisClass::Behavioral => "behavioral",
        };
        out.push_str(&format!(
            "|{}|{}|{}|{}|\n",
            cell(&axis.axis),
            class,
            cell(&axis.options.join(", ")),
            cell(&axis.rationale)
        ));
    }
    out.push('\n');
    for option in &mapping.options {
        let marker = if option.recommended {
            " ⭐ **Recommended**"
        } else {
            ""
        };
        out.push_str(&format!(
            "#### Option {}: {}{marker}\n\n",
            option.label, option.title
        ));
        out.push_str(&format!("**Rationale**: {}\n\n", option.rationale));
        out.push_str("**Tradeoffs**:\n");
        for tradeoff in &option.tradeoffs {
            out.push_str(&format!("- {tradeoff}\n"));
        }
        out.push('\n');
    }
    reviewer_prompts(
        out,
        &[
            "Does the recommended option fit how this component family is built elsewhere?",
            "Are any structural axes expected to grow behavior later?",
        ],
    );
}

fn render_candidates(out: &mut String, block: &ComponentTokenCandidates) {
    block_open(out, "Component Token Candidates");
    out.push_str(&format!(
        "Primitives reused by at least {} sibling locations under one parent.\n\n",
        block.min_occurrences
    ));
    for candidate in &block.candidates {
        out.push_str(&format!("#### `{}`\n\n", candidate.illustrative_name));
        out.push_str(&format!(
            "- **Primitive Token**: `{}`\n",
            candidate.primitive_token
        ));
        out.push_str(&format!(
            "- **Usage Count**: {} locations under {}\n",
            candidate.usage_count,
            node_label(&candidate.scope_node_name, &candidate.scope_node_id)
        ));
        out.push_str("- **Locations**:\n");
        for location in &candidate.locations {
            out.push_str(&format!("  - {location}\n"));
        }
        out.push('\n');
    }
    reviewer_prompts(
        out,
        &[
            "Is the shared value intentional, or a coincidence of the current design?",
            "Should the illustrative name follow a different naming convention?",
        ],
    );
}

fn render_mode_validation(out: &mut String, block: &ModeValidation) {
    block_open(out, "Mode Validation");
    if block.has_unexpected {
        out.push_str("❌ **Unexpected mode discrepancies present.**\n\n");
    }
    out.push_str("|Variable|Mode A|Mode B|Category|\n");
    out.push_str("|---|---|---|---|\n");
    for d in &block.discrepancies {
        let category = match d.category {
            DiscrepancyCategory::Expected => "✅ expected",
            DiscrepancyCategory::Unexpected => "❌ unexpected",
        };
        out.push_str(&format!(
            "|`{}`|{}: {}|{}: {}|{category}|\n",
            d.variable_name,
            cell(&d.mode_a),
            cell(&d.value_a.to_string()),
            cell(&d.mode_b),
            cell(&d.value_b.to_string())
        ));
    }
    out.push('\n');
    reviewer_prompts(
        out,
        &[
            "Is each unexpected difference a deliberate per-mode adjustment?",
            "Should deliberate differences be listed as documented variations?",
        ],
    );
}

fn render_platform_parity(out: &mut String, block: &PlatformParity) {
    block_open(out, "Platform Parity");
    for interaction in &block.interactions {
        out.push_str(&format!(
            "- **{}** (supported: {}; missing: {}): {}\n",
            interaction.interaction,
            join_platforms(&interaction.supported),
            join_platforms(&interaction.missing),
            interaction.recommendation
        ));
    }
    out.push('\n');
    reviewer_prompts(
        out,
        &[
            "Which decision option applies on each missing platform?",
            "Does the chosen fallback keep feedback accessible?",
        ],
    );
}

// ---------------------------------------------------------------------------
// Tail sections
// ---------------------------------------------------------------------------

fn render_unidentified(out: &mut String, root: &Node) {
    out.push_str("## Unidentified Values\n\n");
    let mut rows = Vec::new();
    root.walk(&mut |node| {
        for value in &node.token_classifications.unidentified {
            let closest = value
                .closest_match
                .as_ref()
                .map_or_else(|| "—".to_string(), |m| format!("`{}` ({})", m.token, m.delta));
            rows.push(format!(
                "|{}|{}|{}|{}|{}|\n",
                node_label(&node.name, &node.id),
                value.property,
                cell(&value.raw_value.to_string()),
                value.reason.as_str(),
                closest
            ));
        }
    });
    if rows.is_empty() {
        out.push_str("_All values matched a token._\n\n");
        return;
    }
    out.push_str("|Node|Property|Raw Value|Reason|Closest Match|\n");
    out.push_str("|---|---|---|---|---|\n");
    for row in rows {
        out.push_str(&row);
    }
    out.push('\n');
}

fn render_screenshots(out: &mut String, screenshots: &[ScreenshotMeta]) {
    out.push_str("## Screenshots\n\n");
    for shot in screenshots {
        let label = shot.variant.as_deref().unwrap_or(&shot.path);
        let target = shot.url.as_deref().unwrap_or(&shot.path);
        out.push_str(&format!(
            "- [{label}]({target}) ({}, {}x, captured {})\n",
            shot.format, shot.scale, shot.captured_at
        ));
    }
    out.push('\n');
}
