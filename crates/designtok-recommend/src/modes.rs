//! Cross-mode validation of bound variables.

use designtok_tokens::{ModeValue, ResolvedVariable, VariableLookup, VariableResolution, VariableValue};
use designtok_types::{DiscrepancyCategory, ModeDiscrepancy, ModeValidation, ReviewStatus};
use tracing::trace;

/// The light/dark pair when both exist, else the first two modes.
fn mode_pair(variable: &ResolvedVariable) -> Option<(&ModeValue, &ModeValue)> {
    let named = |needle: &str| {
        variable
            .modes
            .iter()
            .find(|m| m.mode.to_lowercase().contains(needle))
    };
    if let (Some(light), Some(dark)) = (named("light"), named("dark")) {
        return Some((light, dark));
    }
    match variable.modes.as_slice() {
        [a, b, ..] => Some((a, b)),
        _ => None,
    }
}

fn discrepancy(
    variable: &ResolvedVariable,
    documented_variations: &[String],
) -> Option<ModeDiscrepancy> {
    let (a, b) = mode_pair(variable)?;
    let (VariableValue::Literal(value_a), VariableValue::Literal(value_b)) = (&a.value, &b.value)
    else {
        trace!(variable = %variable.name, "alias mode value skipped");
        return None;
    };
    if value_a == value_b {
        return None;
    }
    let documented = documented_variations
        .iter()
        .any(|d| d == &variable.name || d == &variable.id);
    Some(ModeDiscrepancy {
        variable_id: variable.id.clone(),
        variable_name: variable.name.clone(),
        mode_a: a.mode.clone(),
        value_a: value_a.clone(),
        mode_b: b.mode.clone(),
        value_b: value_b.clone(),
        category: if variable.is_color() || documented {
            DiscrepancyCategory::Expected
        } else {
            DiscrepancyCategory::Unexpected
        },
    })
}

/// Compare two modes of every bound variable.
///
/// Color differences and names listed in `documented_variations` are
/// expected; any other difference is flagged as unexpected.
pub fn mode_validation<'a>(
    bound_variable_ids: impl IntoIterator<Item = &'a str>,
    variables: &dyn VariableLookup,
    documented_variations: &[String],
) -> Option<ModeValidation> {
    let discrepancies: Vec<ModeDiscrepancy> = bound_variable_ids
        .into_iter()
        .filter_map(|id| match variables.resolve(id) {
            VariableResolution::Resolved(variable) => discrepancy(variable, documented_variations),
            VariableResolution::Failed | VariableResolution::Unknown => None,
        })
        .collect();
    if discrepancies.is_empty() {
        return None;
    }
    let has_unexpected = discrepancies
        .iter()
        .any(|d| d.category == DiscrepancyCategory::Unexpected);
    Some(ModeValidation {
        review_status: ReviewStatus::PendingHumanReview,
        discrepancies,
        has_unexpected,
    })
}
