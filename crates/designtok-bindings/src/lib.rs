//! # designtok-bindings
//!
//! Collects bound-variable references that never reached a token.
//!
//! Entries arrive from the matcher as lookups fail and from a final sweep of
//! the matched tree. Each (node, property, variable) triple is kept once, in
//! the order it was first seen.

#![forbid(unsafe_code)]

use std::collections::BTreeSet;

use designtok_tokens::{VariableLookup, VariableResolution};
use designtok_types::{Node, NodeKind, UnresolvedBinding, UnresolvedReason};
use tracing::debug;

#[derive(Debug, Default)]
pub struct BindingResolver {
    seen: BTreeSet<(String, String, String)>,
    entries: Vec<UnresolvedBinding>,
}

/// Reason for a failed lookup: the adapter failing upstream, or a variable
/// that exists but names no token.
#[must_use]
pub fn reason_for(lookup: &dyn VariableLookup, variable_id: &str) -> UnresolvedReason {
    match lookup.resolve(variable_id) {
        VariableResolution::Failed => UnresolvedReason::UpstreamResolutionFailed,
        VariableResolution::Resolved(_) | VariableResolution::Unknown => {
            UnresolvedReason::NotInTokenTable
        }
    }
}

impl BindingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failed reference. Returns `false` when it was already known.
    pub fn record(
        &mut self,
        node_id: &str,
        node_name: &str,
        ancestor_chain: &[NodeKind],
        property: &str,
        variable_id: &str,
        reason: UnresolvedReason,
    ) -> bool {
        let key = (
            node_id.to_string(),
            property.to_string(),
            variable_id.to_string(),
        );
        if !self.seen.insert(key) {
            return false;
        }
        debug!(
            node = node_id,
            property,
            variable = variable_id,
            reason = reason.as_str(),
            "unresolved binding"
        );
        self.entries.push(UnresolvedBinding {
            variable_id: variable_id.to_string(),
            property: property.to_string(),
            node_id: node_id.to_string(),
            node_name: node_name.to_string(),
            ancestor_chain: ancestor_chain.to_vec(),
            reason,
        });
        true
    }

    /// Sweep a matched tree for unidentified values that still carry a bound
    /// variable id.
    pub fn collect_from_tree(&mut self, root: &Node, lookup: &dyn VariableLookup) {
        root.walk(&mut |node| {
            for value in &node.token_classifications.unidentified {
                if let Some(variable_id) = &value.bound_variable_id {
                    self.record(
                        &node.id,
                        &node.name,
                        &node.ancestor_chain,
                        &value.property,
                        variable_id,
                        reason_for(lookup, variable_id),
                    );
                }
            }
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> Vec<UnresolvedBinding> {
        self.entries
    }
}
