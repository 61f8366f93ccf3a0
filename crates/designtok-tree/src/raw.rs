//! Serde model of a design-tool node export.
//!
//! Every field is optional on the wire; absent fields take their defaults so
//! partial exports still parse.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use designtok_types::{DesignTokError, Scalar};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    /// Main component id on `INSTANCE` nodes.
    pub component_id: Option<String>,

    pub layout_mode: Option<String>,
    pub padding_top: Option<f64>,
    pub padding_right: Option<f64>,
    pub padding_bottom: Option<f64>,
    pub padding_left: Option<f64>,
    pub item_spacing: Option<f64>,
    pub counter_axis_spacing: Option<f64>,

    pub corner_radius: Option<f64>,
    pub top_left_radius: Option<f64>,
    pub top_right_radius: Option<f64>,
    pub bottom_right_radius: Option<f64>,
    pub bottom_left_radius: Option<f64>,

    pub stroke_weight: Option<f64>,
    pub opacity: Option<f64>,
    pub fills: Vec<RawPaint>,
    pub strokes: Vec<RawPaint>,
    pub style: Option<RawTextStyle>,

    pub component_properties: BTreeMap<String, RawComponentProperty>,
    pub bound_variables: BTreeMap<String, BoundVariableRef>,

    pub children: Vec<RawNode>,
}

impl RawNode {
    /// Parse a node export. Accepts a bare node or a `{ "document": node }`
    /// envelope as returned by the design-tool REST API.
    pub fn from_json_str(text: &str) -> Result<Self, DesignTokError> {
        let value: serde_json::Value = designtok_types::json::from_str_bounded(text)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(mut value: serde_json::Value) -> Result<Self, DesignTokError> {
        if let Some(document) = value.get_mut("document").map(serde_json::Value::take) {
            value = document;
        }
        if !value.is_object() {
            return Err(DesignTokError::malformed("node export must be a JSON object"));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Bound variable id for a node-level field such as `paddingTop`.
    pub fn bound_id(&self, field: &str) -> Option<&str> {
        self.bound_variables.get(field).and_then(BoundVariableRef::first_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPaint {
    #[serde(rename = "type")]
    pub paint_type: Option<String>,
    pub visible: Option<bool>,
    pub opacity: Option<f64>,
    pub color: Option<RawColor>,
    pub bound_variables: BTreeMap<String, BoundVariableRef>,
}

impl RawPaint {
    pub fn is_visible_solid(&self) -> bool {
        self.visible != Some(false) && self.paint_type.as_deref().unwrap_or("SOLID") == "SOLID"
    }

    /// `rgba(r, g, b, a)` with 0-255 channels; paint opacity folds into alpha.
    pub fn rgba_string(&self) -> Option<String> {
        let color = self.color.as_ref()?;
        let alpha = color.a * self.opacity.unwrap_or(1.0);
        Some(format!(
            "rgba({}, {}, {}, {})",
            channel(color.r),
            channel(color.g),
            channel(color.b),
            designtok_math::fmt_trimmed(alpha, 2)
        ))
    }
}

fn channel(unit: f64) -> u8 {
    (unit.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTextStyle {
    pub font_size: Option<f64>,
    pub font_weight: Option<f64>,
    pub line_height_px: Option<f64>,
    pub letter_spacing: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawComponentProperty {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Scalar,
}

/// A bound variable appears as `{ "id": .. }` or as a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundVariableRef {
    One(VariableAlias),
    Many(Vec<VariableAlias>),
}

impl BoundVariableRef {
    pub fn first_id(&self) -> Option<&str> {
        match self {
            BoundVariableRef::One(alias) => Some(alias.id.as_str()),
            BoundVariableRef::Many(list) => list.first().map(|alias| alias.id.as_str()),
        }
        .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableAlias {
    pub id: String,
}
