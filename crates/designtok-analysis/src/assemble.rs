use designtok_types::{
    ANALYSIS_SCHEMA_VERSION, ClassificationSummary, ComponentAnalysis, ComponentIdentity,
    CompositionPattern, Confidence, ConfidenceCounts, DesignTokError, ExtractionMeta, Node,
    RecommendationBundle, ScreenshotMeta, UnresolvedBinding, VariantAxis,
};
use tracing::debug;

/// Everything the assembler folds into one record.
#[derive(Debug, Clone)]
pub struct AssemblyParts {
    pub component: ComponentIdentity,
    pub variant_axes: Option<Vec<VariantAxis>>,
    pub root: Option<Node>,
    pub composition_patterns: Vec<CompositionPattern>,
    pub unresolved_bindings: Vec<UnresolvedBinding>,
    pub recommendations: Option<RecommendationBundle>,
    pub screenshots: Vec<ScreenshotMeta>,
    pub extraction: ExtractionMeta,
}

/// Sum of the per-node tier counts over the whole tree.
pub fn summarize(root: &Node) -> ClassificationSummary {
    let mut summary = ClassificationSummary::default();
    root.walk(&mut |node| summary = summary.add(node.token_classifications.summary()));
    summary
}

/// Exact and approximate matches, plus unidentified values as unmatched.
pub fn confidence_counts(root: &Node) -> ConfidenceCounts {
    let mut counts = ConfidenceCounts::default();
    root.walk(&mut |node| {
        let classes = &node.token_classifications;
        for token in classes.matched() {
            match token.confidence {
                Confidence::Exact => counts.exact += 1,
                Confidence::Approximate => counts.approximate += 1,
            }
        }
        counts.unmatched += classes.unidentified.len();
    });
    counts
}

/// Fold the pipeline outputs into a [`ComponentAnalysis`].
pub fn assemble(parts: AssemblyParts) -> Result<ComponentAnalysis, DesignTokError> {
    let root = parts
        .root
        .ok_or_else(|| DesignTokError::malformed("analysis has no root node"))?;
    let classification_summary = summarize(&root);
    let confidence = confidence_counts(&root);
    debug!(
        component = %parts.component.name,
        total = classification_summary.total(),
        patterns = parts.composition_patterns.len(),
        unresolved = parts.unresolved_bindings.len(),
        "assembled analysis"
    );
    Ok(ComponentAnalysis {
        schema_version: ANALYSIS_SCHEMA_VERSION,
        component: parts.component,
        variant_axes: parts.variant_axes,
        root,
        classification_summary,
        confidence,
        composition_patterns: parts.composition_patterns,
        unresolved_bindings: parts.unresolved_bindings,
        recommendations: parts.recommendations,
        screenshots: parts.screenshots,
        extraction: parts.extraction,
    })
}
