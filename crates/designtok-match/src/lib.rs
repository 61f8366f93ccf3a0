//! # designtok-match
//!
//! Classifies every extracted property into a semantic match, a primitive
//! match or an unidentified value.
//!
//! Order per property:
//! 1. bound variable name to token path (exact, `binding`)
//! 2. value against the category's primitives (exact, or approximate
//!    within the tolerance band)
//! 3. upgrade a primitive to the semantic that wraps it
//! 4. otherwise unidentified, with the closest candidate as a hint
//!
//! Equally close candidates are ordered by multiplier over the family base,
//! then by path.

#![forbid(unsafe_code)]

use std::cmp::Ordering;

use designtok_bindings::{BindingResolver, reason_for};
use designtok_math::fmt_signed_delta;
use designtok_settings::ToleranceBands;
use designtok_tokens::{
    PrimitiveToken, TokenRef, TokenTable, TokenValue, VariableLookup, VariableResolution,
    parse_color, parse_dimension, rgb_to_lab, delta_e,
};
use designtok_tree::{ExtractedProperty, PropertyIndex};
use designtok_types::{
    Classification, ClassifiedToken, ClosestMatch, Confidence, MatchMethod, Node, Scalar,
    TokenCategory, UnidentifiedReason, UnidentifiedValue, UnresolvedReason,
};
use tracing::{debug, trace};

/// Color distances below this are treated as identical.
const COLOR_EPSILON: f64 = 1e-9;

/// Result of classifying one property.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub classification: Classification,
    /// Set when a bound variable was present but did not reach a token.
    pub failed_binding: Option<UnresolvedReason>,
}

/// Nearest primitive for a raw value.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    pub token: &'a PrimitiveToken,
    /// Absolute distance: pixels for dimensions, ΔE for colors.
    pub distance: f64,
    pub delta: String,
}

pub struct TokenMatcher<'a> {
    tokens: &'a TokenTable,
    variables: &'a dyn VariableLookup,
    tolerance: &'a ToleranceBands,
}

impl<'a> TokenMatcher<'a> {
    pub fn new(
        tokens: &'a TokenTable,
        variables: &'a dyn VariableLookup,
        tolerance: &'a ToleranceBands,
    ) -> Self {
        Self {
            tokens,
            variables,
            tolerance,
        }
    }

    /// Classify one extracted property.
    pub fn classify(&self, prop: &ExtractedProperty) -> MatchOutcome {
        let mut failed_binding = None;
        if let Some(variable_id) = &prop.bound_variable_id {
            match self.match_binding(prop, variable_id) {
                Ok(classification) => {
                    return MatchOutcome {
                        classification,
                        failed_binding: None,
                    };
                }
                Err(reason) => failed_binding = Some(reason),
            }
        }

        let classification = match self.closest(prop.category, &prop.raw_value) {
            Some(candidate) => {
                let band = self.tolerance.band_for(prop.category);
                let exact = if prop.category == TokenCategory::Color {
                    candidate.distance < COLOR_EPSILON
                } else {
                    candidate.distance == 0.0
                };
                if exact || candidate.distance <= band {
                    let (confidence, delta) = if exact {
                        (Confidence::Exact, None)
                    } else {
                        (Confidence::Approximate, Some(candidate.delta))
                    };
                    self.tiered(
                        prop,
                        &candidate.token.path,
                        MatchMethod::Value,
                        confidence,
                        delta,
                    )
                } else {
                    Classification::Unidentified(UnidentifiedValue {
                        property: prop.property.clone(),
                        raw_value: prop.raw_value.clone(),
                        reason: if prop.bound_variable_id.is_some() {
                            UnidentifiedReason::UnresolvedBinding
                        } else {
                            UnidentifiedReason::OutOfTolerance
                        },
                        closest_match: Some(ClosestMatch {
                            token: candidate.token.path.clone(),
                            delta: candidate.delta,
                        }),
                        bound_variable_id: prop.bound_variable_id.clone(),
                    })
                }
            }
            None => Classification::Unidentified(UnidentifiedValue {
                property: prop.property.clone(),
                raw_value: prop.raw_value.clone(),
                reason: if prop.bound_variable_id.is_some() {
                    UnidentifiedReason::UnresolvedBinding
                } else {
                    UnidentifiedReason::NoTokenMatch
                },
                closest_match: None,
                bound_variable_id: prop.bound_variable_id.clone(),
            }),
        };
        MatchOutcome {
            classification,
            failed_binding,
        }
    }

    fn match_binding(
        &self,
        prop: &ExtractedProperty,
        variable_id: &str,
    ) -> Result<Classification, UnresolvedReason> {
        let variable = match self.variables.resolve(variable_id) {
            VariableResolution::Resolved(variable) => variable,
            VariableResolution::Failed | VariableResolution::Unknown => {
                return Err(reason_for(self.variables, variable_id));
            }
        };
        let Some(path) = self.tokens.resolve_variable_name(&variable.name) else {
            trace!(variable = %variable.name, "variable name has no token");
            return Err(UnresolvedReason::NotInTokenTable);
        };
        match self.tokens.lookup(path) {
            Some(TokenRef::Semantic(semantic)) => Ok(Classification::Semantic(ClassifiedToken {
                property: prop.property.clone(),
                semantic_token: Some(semantic.path.clone()),
                primitive_token: semantic.primitive.clone(),
                raw_value: prop.raw_value.clone(),
                match_method: MatchMethod::Binding,
                confidence: Confidence::Exact,
                delta: None,
            })),
            Some(TokenRef::Primitive(primitive)) => Ok(self.tiered(
                prop,
                &primitive.path,
                MatchMethod::Binding,
                Confidence::Exact,
                None,
            )),
            None => Err(UnresolvedReason::NotInTokenTable),
        }
    }

    /// Wrap a primitive match, upgrading it when a semantic of the
    /// property's category wraps the primitive.
    fn tiered(
        &self,
        prop: &ExtractedProperty,
        primitive: &str,
        method: MatchMethod,
        confidence: Confidence,
        delta: Option<String>,
    ) -> Classification {
        let semantic = self.tokens.semantic_for(primitive, prop.category);
        let token = ClassifiedToken {
            property: prop.property.clone(),
            semantic_token: semantic.map(|s| s.path.clone()),
            primitive_token: primitive.to_string(),
            raw_value: prop.raw_value.clone(),
            match_method: method,
            confidence,
            delta,
        };
        if semantic.is_some() {
            Classification::Semantic(token)
        } else {
            Classification::Primitive(token)
        }
    }

    /// Closest primitive of `category` to `raw`, regardless of tolerance.
    pub fn closest(&self, category: TokenCategory, raw: &Scalar) -> Option<Candidate<'a>> {
        if category == TokenCategory::Color {
            let lab = rgb_to_lab(parse_color(raw.as_str()?)?);
            self.tokens
                .primitives_in(category)
                .filter_map(|token| match token.value {
                    TokenValue::Color(rgb) => Some((token, delta_e(lab, rgb_to_lab(rgb)))),
                    TokenValue::Dimension(_) => None,
                })
                .min_by(|a, b| rank(a, b))
                .map(|(token, distance)| Candidate {
                    token,
                    distance,
                    delta: format!("ΔE {distance:.1}"),
                })
        } else {
            let value = parse_dimension(raw)?;
            let unit = if category.is_dimension() { "px" } else { "" };
            self.tokens
                .primitives_in(category)
                .filter_map(|token| match token.value {
                    TokenValue::Dimension(v) => Some((token, v)),
                    TokenValue::Color(_) => None,
                })
                .map(|(token, v)| (token, (value - v).abs(), value - v))
                .min_by(|a, b| rank(&(a.0, a.1), &(b.0, b.1)))
                .map(|(token, distance, signed)| Candidate {
                    token,
                    distance,
                    delta: fmt_signed_delta(signed, unit),
                })
        }
    }

    /// Classify every node of `root` in place.
    ///
    /// Failed bindings go to `resolver` as they are found.
    pub fn match_tree(&self, root: &mut Node, index: &PropertyIndex, resolver: &mut BindingResolver) {
        let mut nodes = 0usize;
        self.match_node(root, index, resolver, &mut nodes);
        let summary = fold(root);
        debug!(
            nodes,
            semantic = summary.0,
            primitive = summary.1,
            unidentified = summary.2,
            "matched node tree"
        );
    }

    fn match_node(
        &self,
        node: &mut Node,
        index: &PropertyIndex,
        resolver: &mut BindingResolver,
        nodes: &mut usize,
    ) {
        *nodes += 1;
        if let Some(props) = index.get(&node.id) {
            for prop in props {
                let outcome = self.classify(prop);
                if let (Some(reason), Some(variable_id)) =
                    (outcome.failed_binding, &prop.bound_variable_id)
                {
                    resolver.record(
                        &node.id,
                        &node.name,
                        &node.ancestor_chain,
                        &prop.property,
                        variable_id,
                        reason,
                    );
                }
                node.token_classifications.push(outcome.classification);
            }
        }
        for child in &mut node.children {
            self.match_node(child, index, resolver, nodes);
        }
    }
}

fn rank(a: &(&PrimitiveToken, f64), b: &(&PrimitiveToken, f64)) -> Ordering {
    a.1.total_cmp(&b.1)
        .then_with(|| a.0.multiplier.total_cmp(&b.0.multiplier))
        .then_with(|| a.0.path.cmp(&b.0.path))
}

fn fold(node: &Node) -> (usize, usize, usize) {
    let mut totals = (0, 0, 0);
    node.walk(&mut |n| {
        let s = n.token_classifications.summary();
        totals.0 += s.semantic_identified;
        totals.1 += s.primitive_identified;
        totals.2 += s.unidentified;
    });
    totals
}
