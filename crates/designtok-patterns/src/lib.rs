//! # designtok-patterns
//!
//! Finds instances of the same component repeated under one parent and
//! splits their properties into the part every instance shares and the
//! combinations that vary.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use designtok_types::{CompositionPattern, Node, NodeKind, PropertyVariation, Scalar};
use tracing::debug;

/// Smallest group reported as a pattern.
pub const MIN_GROUP_SIZE: usize = 2;

/// Detect patterns across the whole tree, in pre-order.
#[must_use]
pub fn detect_patterns(root: &Node) -> Vec<CompositionPattern> {
    let mut patterns = Vec::new();
    root.walk(&mut |node| patterns.extend(patterns_under(node)));
    debug!(patterns = patterns.len(), "detected composition patterns");
    patterns
}

/// What makes two instances "the same component".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKey<'a> {
    ComponentId(&'a str),
    Name(&'a str),
}

impl<'a> GroupKey<'a> {
    /// Main component id when the export has one, display name otherwise.
    fn of(node: &'a Node) -> Self {
        match node.component_id.as_deref() {
            Some(id) if !id.is_empty() => GroupKey::ComponentId(id),
            _ => GroupKey::Name(&node.name),
        }
    }
}

/// Patterns among the direct children of `parent`, in first-seen order.
///
/// The pattern takes the name of its first member.
#[must_use]
pub fn patterns_under(parent: &Node) -> Vec<CompositionPattern> {
    let mut groups: Vec<(GroupKey<'_>, Vec<&Node>)> = Vec::new();
    for child in parent.children.iter().filter(|c| c.kind == NodeKind::Instance) {
        let key = GroupKey::of(child);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(child),
            None => groups.push((key, vec![child])),
        }
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() >= MIN_GROUP_SIZE)
        .map(|(_, members)| build_pattern(parent, &members[0].name, &members))
        .collect()
}

fn property_values(node: &Node) -> BTreeMap<String, Scalar> {
    node.component_properties
        .iter()
        .flatten()
        .map(|(key, prop)| (key.clone(), prop.value.clone()))
        .collect()
}

fn build_pattern(parent: &Node, name: &str, members: &[&Node]) -> CompositionPattern {
    let values: Vec<BTreeMap<String, Scalar>> = members.iter().map(|m| property_values(m)).collect();

    let mut shared = BTreeMap::new();
    if let Some((first, rest)) = values.split_first() {
        for (key, value) in first {
            if rest.iter().all(|other| other.get(key) == Some(value)) {
                shared.insert(key.clone(), value.clone());
            }
        }
    }

    let mut variations: Vec<PropertyVariation> = Vec::new();
    for props in values {
        let varying: BTreeMap<String, Scalar> = props
            .into_iter()
            .filter(|(key, _)| !shared.contains_key(key))
            .collect();
        match variations.iter_mut().find(|v| v.properties == varying) {
            Some(existing) => existing.count += 1,
            None => variations.push(PropertyVariation {
                properties: varying,
                count: 1,
            }),
        }
    }

    CompositionPattern {
        component_name: name.to_string(),
        count: members.len(),
        shared_properties: shared,
        property_variations: variations,
        depth: parent.depth + 1,
        parent_id: parent.id.clone(),
        parent_name: parent.name.clone(),
    }
}
