//! Component-token candidates: primitives reused across siblings.

use std::collections::BTreeMap;

use designtok_types::{
    ComponentTokenCandidates, Node, ReviewStatus, TokenCandidate,
};

/// One use of a primitive by a direct child of the scope node.
struct Usage<'a> {
    node_name: &'a str,
    property: &'a str,
}

/// Lowercased first word of a component name: `"ButtonPrimary"` gives
/// `"button"`, `"Text Field"` gives `"text"`.
///
/// Words break at separators and at a lowercase-to-uppercase step only, so
/// leading acronyms stay whole (`"CTAButton"` gives `"ctabutton"`).
pub fn component_base_name(component_name: &str) -> String {
    let mut base = String::new();
    let mut prev: Option<char> = None;
    for c in component_name.trim().chars() {
        let separator = c.is_whitespace() || matches!(c, '/' | '-' | '_' | '=' | ',');
        let camel_step = prev.is_some_and(char::is_lowercase) && c.is_uppercase();
        if separator || camel_step {
            break;
        }
        base.push(c);
        prev = Some(c);
    }
    if base.is_empty() {
        "component".to_string()
    } else {
        base.to_lowercase()
    }
}

/// Token group implied by the properties a primitive fills.
pub fn infer_property_group(properties: &[&str]) -> &'static str {
    let all = |pred: fn(&str) -> bool| !properties.is_empty() && properties.iter().all(|p| pred(p));
    if all(|p| p == "padding-left" || p == "padding-right") {
        "padding.horizontal"
    } else if all(|p| p == "padding-top" || p == "padding-bottom") {
        "padding.vertical"
    } else if all(|p| p.starts_with("padding")) {
        "padding"
    } else if all(|p| p.ends_with("spacing") && p != "letter-spacing") {
        "spacing"
    } else if all(|p| p == "fill" || p == "stroke") {
        "fill"
    } else if all(|p| p.starts_with("border-radius")) {
        "radius"
    } else if all(|p| {
        p.starts_with("font") || p == "line-height" || p == "letter-spacing"
    }) {
        "typography"
    } else {
        "token"
    }
}

fn scope_candidates<'a>(
    scope: &'a Node,
    base: &str,
    min_occurrences: usize,
    out: &mut Vec<TokenCandidate>,
) {
    // Primitive path to its uses, in first-seen order.
    let mut order: Vec<&'a str> = Vec::new();
    let mut uses: BTreeMap<&'a str, Vec<Usage<'a>>> = BTreeMap::new();
    for child in &scope.children {
        for token in child.token_classifications.matched() {
            let key = token.primitive_token.as_str();
            let entry = uses.entry(key).or_default();
            if entry.is_empty() {
                order.push(key);
            }
            entry.push(Usage {
                node_name: &child.name,
                property: &token.property,
            });
        }
    }
    for primitive in order {
        let Some(found) = uses.get(primitive) else {
            continue;
        };
        if found.len() < min_occurrences {
            continue;
        }
        let properties: Vec<&str> = found.iter().map(|u| u.property).collect();
        let group = infer_property_group(&properties);
        out.push(TokenCandidate {
            primitive_token: primitive.to_string(),
            usage_count: found.len(),
            scope_node_id: scope.id.clone(),
            scope_node_name: scope.name.clone(),
            locations: found
                .iter()
                .map(|u| format!("{} › {}", u.node_name, u.property))
                .collect(),
            illustrative_name: format!("{base}.{group} = {primitive}"),
        });
    }
}

/// Primitives used by at least `min_occurrences` locations among the
/// direct children of one parent, most used first.
pub fn component_token_candidates(
    root: &Node,
    component_name: &str,
    min_occurrences: usize,
) -> Option<ComponentTokenCandidates> {
    let base = component_base_name(component_name);
    let mut candidates = Vec::new();
    root.walk(&mut |node| {
        if !node.children.is_empty() {
            scope_candidates(node, &base, min_occurrences, &mut candidates);
        }
    });
    candidates.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
    (!candidates.is_empty()).then(|| ComponentTokenCandidates {
        review_status: ReviewStatus::PendingHumanReview,
        min_occurrences,
        candidates,
    })
}
