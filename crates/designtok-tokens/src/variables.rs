//! Bound-variable lookup.
//!
//! The design-tool adapter resolves variable ids to names and per-mode
//! values; the pipeline only sees this trait.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use designtok_types::{DesignTokError, Scalar};

/// A per-mode variable value: a literal or a reference to another variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Alias { alias_of: String },
    Literal(Scalar),
}

impl VariableValue {
    pub fn is_alias(&self) -> bool {
        matches!(self, VariableValue::Alias { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedVariable {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// `COLOR`, `FLOAT`, `STRING` or `BOOLEAN`.
    pub resolved_type: String,
    /// Mode name to value, in declared mode order.
    #[serde(default)]
    pub modes: Vec<ModeValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeValue {
    pub mode: String,
    pub value: VariableValue,
}

impl ResolvedVariable {
    pub fn is_color(&self) -> bool {
        self.resolved_type.eq_ignore_ascii_case("color")
    }
}

/// Outcome of looking up one variable id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariableResolution<'a> {
    Resolved(&'a ResolvedVariable),
    /// The adapter knew the id but could not resolve it.
    Failed,
    Unknown,
}

pub trait VariableLookup {
    fn resolve(&self, variable_id: &str) -> VariableResolution<'_>;
}

/// JSON-backed lookup table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableTable {
    pub variables: BTreeMap<String, ResolvedVariable>,
    pub failed: BTreeSet<String>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self, DesignTokError> {
        Self::from_json_value(serde_json::from_str(text)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, DesignTokError> {
        let mut table: VariableTable = serde_json::from_value(value)?;
        for (id, variable) in &mut table.variables {
            if variable.id.is_empty() {
                variable.id = id.clone();
            }
        }
        Ok(table)
    }

    pub fn insert(&mut self, variable: ResolvedVariable) {
        self.variables.insert(variable.id.clone(), variable);
    }

    pub fn mark_failed(&mut self, variable_id: &str) {
        self.failed.insert(variable_id.to_string());
    }
}

impl VariableLookup for VariableTable {
    fn resolve(&self, variable_id: &str) -> VariableResolution<'_> {
        if let Some(variable) = self.variables.get(variable_id) {
            VariableResolution::Resolved(variable)
        } else if self.failed.contains(variable_id) {
            VariableResolution::Failed
        } else {
            VariableResolution::Unknown
        }
    }
}
