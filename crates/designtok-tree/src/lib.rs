//! # designtok-tree
//!
//! Builds the typed, depth-annotated node tree from a raw design-tool export
//! and extracts the properties the token matcher works on.
//!
//! The builder never classifies anything: every node leaves here with an
//! empty classification bucket.

#![forbid(unsafe_code)]

mod extract;
mod raw;

use std::collections::{BTreeMap, BTreeSet};

use designtok_settings::TreeSettings;
use designtok_types::{
    ComponentProperty, ComponentPropertyKind, DesignTokError, Layout, LayoutMode, Node, NodeKind,
    Padding, TokenClassifications,
};
use tracing::debug;

pub use extract::{ExtractedProperty, PropertyIndex, extract_properties, index_properties, variant_axes};
pub use raw::{
    BoundVariableRef, RawColor, RawComponentProperty, RawNode, RawPaint, RawTextStyle,
    VariableAlias,
};

/// Build the node tree rooted at `raw`.
///
/// Fails with `MalformedInput` when a node has no id, when an id repeats
/// (the input is not tree-shaped), or when depth exceeds
/// `settings.max_depth`.
pub fn build_node_tree(raw: &RawNode, settings: &TreeSettings) -> Result<Node, DesignTokError> {
    let mut builder = Builder {
        max_depth: settings.max_depth,
        seen: BTreeSet::new(),
    };
    let root = builder.build(raw, 0, Vec::new())?;
    debug!(
        root = %root.id,
        nodes = builder.seen.len(),
        "built node tree"
    );
    Ok(root)
}

struct Builder<'a> {
    max_depth: usize,
    seen: BTreeSet<&'a str>,
}

impl<'a> Builder<'a> {
    fn build(
        &mut self,
        raw: &'a RawNode,
        depth: usize,
        ancestor_chain: Vec<NodeKind>,
    ) -> Result<Node, DesignTokError> {
        if raw.id.is_empty() {
            return Err(DesignTokError::malformed(format!(
                "node {:?} at depth {depth} has no id",
                raw.name
            )));
        }
        if depth > self.max_depth {
            return Err(DesignTokError::malformed(format!(
                "node {} exceeds the maximum tree depth of {}",
                raw.id, self.max_depth
            )));
        }
        if !self.seen.insert(raw.id.as_str()) {
            return Err(DesignTokError::malformed(format!(
                "node id {} appears more than once",
                raw.id
            )));
        }

        let kind = NodeKind::from_figma(raw.node_type.as_deref());
        let mut child_chain = ancestor_chain.clone();
        child_chain.push(kind);

        let children = raw
            .children
            .iter()
            .map(|child| self.build(child, depth + 1, child_chain.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Node {
            id: raw.id.clone(),
            name: raw.name.clone(),
            kind,
            component_id: (kind == NodeKind::Instance)
                .then(|| raw.component_id.clone())
                .flatten(),
            depth,
            ancestor_chain,
            layout: layout_of(raw),
            component_properties: (kind == NodeKind::Instance)
                .then(|| component_properties_of(raw))
                .flatten(),
            token_classifications: TokenClassifications::default(),
            children,
        })
    }
}

fn layout_of(raw: &RawNode) -> Option<Layout> {
    let padding = Padding {
        top: raw.padding_top,
        right: raw.padding_right,
        bottom: raw.padding_bottom,
        left: raw.padding_left,
    };
    let layout = Layout {
        layout_mode: raw.layout_mode.as_deref().map(LayoutMode::from_figma),
        padding: (!padding.is_empty()).then_some(padding),
        item_spacing: raw.item_spacing,
        counter_axis_spacing: raw.counter_axis_spacing,
        corner_radius: raw.corner_radius,
    };
    (layout != Layout::default()).then_some(layout)
}

/// Strip the `#123:0` suffix the design tool appends to property names.
#[must_use]
pub fn strip_property_suffix(name: &str) -> &str {
    name.split_once('#').map_or(name, |(head, _)| head)
}

fn component_properties_of(raw: &RawNode) -> Option<BTreeMap<String, ComponentProperty>> {
    if raw.component_properties.is_empty() {
        return None;
    }
    let props = raw
        .component_properties
        .iter()
        .map(|(name, prop)| {
            (
                strip_property_suffix(name).to_string(),
                ComponentProperty {
                    kind: ComponentPropertyKind::from_figma(&prop.kind),
                    value: prop.value.clone(),
                },
            )
        })
        .collect();
    Some(props)
}
