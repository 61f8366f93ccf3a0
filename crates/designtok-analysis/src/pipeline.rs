use std::collections::BTreeSet;

use designtok_bindings::BindingResolver;
use designtok_match::TokenMatcher;
use designtok_patterns::detect_patterns;
use designtok_recommend::{RecommendInput, synthesize};
use designtok_settings::AnalyzeSettings;
use designtok_tokens::{TokenTable, VariableLookup};
use designtok_tree::{PropertyIndex, RawNode, build_node_tree, index_properties, variant_axes};
use designtok_types::{
    ComponentAnalysis, ComponentIdentity, DesignTokError, ExtractionMeta, ScreenshotMeta,
    ToolInfo,
};
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::info;

use crate::assemble::{AssemblyParts, assemble};

/// Inputs read by one run. Nothing here is mutated.
pub struct AnalysisContext<'a> {
    pub node: &'a RawNode,
    pub tokens: &'a TokenTable,
    pub variables: &'a dyn VariableLookup,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub settings: AnalyzeSettings,
    pub file_key: Option<String>,
    pub screenshots: Vec<ScreenshotMeta>,
    /// Fixed extraction timestamp for reproducible records.
    pub extracted_at: Option<String>,
}

/// Current UTC time in RFC 3339 form.
pub fn timestamp_utc() -> String {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
    OffsetDateTime::now_utc()
        .format(&format)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Distinct bound variable ids across the index, sorted.
pub fn bound_variable_ids(index: &PropertyIndex) -> Vec<String> {
    index
        .values()
        .flatten()
        .filter_map(|p| p.bound_variable_id.as_deref())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Run the whole pipeline over one component.
///
/// Fails fast on malformed input; everything else is recorded in the
/// returned analysis.
pub fn analyze(
    ctx: &AnalysisContext<'_>,
    req: AnalysisRequest,
) -> Result<ComponentAnalysis, DesignTokError> {
    let settings = &req.settings;
    settings.validate()?;

    let mut root = build_node_tree(ctx.node, &settings.tree)?;
    let index = index_properties(ctx.node);
    let axes = variant_axes(ctx.node);

    let mut resolver = BindingResolver::new();
    TokenMatcher::new(ctx.tokens, ctx.variables, &settings.matching.tolerance)
        .match_tree(&mut root, &index, &mut resolver);
    resolver.collect_from_tree(&root, ctx.variables);

    let composition_patterns = detect_patterns(&root);
    let bound_ids = bound_variable_ids(&index);
    let recommendations = synthesize(
        &RecommendInput {
            component_name: &root.name,
            root: &root,
            variant_axes: axes.as_deref().unwrap_or_default(),
            bound_variable_ids: &bound_ids,
            variables: ctx.variables,
        },
        &settings.recommend,
    );

    let component = ComponentIdentity {
        name: root.name.clone(),
        kind: root.kind,
        node_id: root.id.clone(),
        file_key: req.file_key,
    };
    let analysis = assemble(AssemblyParts {
        component,
        variant_axes: axes,
        root: Some(root),
        composition_patterns,
        unresolved_bindings: resolver.finish(),
        recommendations,
        screenshots: req.screenshots,
        extraction: ExtractionMeta {
            extracted_at: req.extracted_at.unwrap_or_else(timestamp_utc),
            tool: ToolInfo::current(),
        },
    })?;

    info!(
        component = %analysis.component.name,
        nodes = analysis.root.node_count(),
        semantic = analysis.classification_summary.semantic_identified,
        primitive = analysis.classification_summary.primitive_identified,
        unidentified = analysis.classification_summary.unidentified,
        "analysis complete"
    );
    Ok(analysis)
}
