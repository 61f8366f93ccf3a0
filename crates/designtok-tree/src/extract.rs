//! Matchable property extraction and variant-axis discovery.

use std::collections::BTreeMap;

use designtok_types::{NodeKind, Scalar, TokenCategory, VariantAxis};

use crate::raw::{RawNode, RawPaint};

/// One matchable visual property of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedProperty {
    pub property: String,
    pub category: TokenCategory,
    pub raw_value: Scalar,
    pub bound_variable_id: Option<String>,
}

/// Extracted properties for every node, keyed by node id.
pub type PropertyIndex = BTreeMap<String, Vec<ExtractedProperty>>;

fn dimension(
    out: &mut Vec<ExtractedProperty>,
    raw: &RawNode,
    property: &str,
    field: &str,
    category: TokenCategory,
    value: Option<f64>,
) {
    if let Some(value) = value {
        out.push(ExtractedProperty {
            property: property.to_string(),
            category,
            raw_value: Scalar::Number(value),
            bound_variable_id: raw.bound_id(field).map(str::to_string),
        });
    }
}

fn paint(
    out: &mut Vec<ExtractedProperty>,
    raw: &RawNode,
    property: &str,
    field: &str,
    paints: &[RawPaint],
) {
    let Some((index, first)) = paints
        .iter()
        .enumerate()
        .find(|(_, p)| p.is_visible_solid() && p.color.is_some())
    else {
        return;
    };
    let Some(rgba) = first.rgba_string() else {
        return;
    };
    // Paint-level binding wins over the node-level `fills`/`strokes` list.
    let bound = first
        .bound_variables
        .get("color")
        .and_then(|b| b.first_id())
        .or_else(|| {
            raw.bound_variables.get(field).and_then(|b| match b {
                crate::raw::BoundVariableRef::Many(list) => {
                    list.get(index).map(|alias| alias.id.as_str())
                }
                other => other.first_id(),
            })
        });
    out.push(ExtractedProperty {
        property: property.to_string(),
        category: TokenCategory::Color,
        raw_value: Scalar::Text(rgba),
        bound_variable_id: bound.filter(|id| !id.is_empty()).map(str::to_string),
    });
}

/// List the matchable properties of a single node, in a fixed order.
#[must_use]
pub fn extract_properties(raw: &RawNode) -> Vec<ExtractedProperty> {
    use TokenCategory::*;

    let mut out = Vec::new();
    dimension(&mut out, raw, "padding-top", "paddingTop", Spacing, raw.padding_top);
    dimension(&mut out, raw, "padding-right", "paddingRight", Spacing, raw.padding_right);
    dimension(&mut out, raw, "padding-bottom", "paddingBottom", Spacing, raw.padding_bottom);
    dimension(&mut out, raw, "padding-left", "paddingLeft", Spacing, raw.padding_left);
    dimension(&mut out, raw, "item-spacing", "itemSpacing", Spacing, raw.item_spacing);
    dimension(
        &mut out,
        raw,
        "counter-axis-spacing",
        "counterAxisSpacing",
        Spacing,
        raw.counter_axis_spacing,
    );

    if raw.corner_radius.is_some() {
        dimension(&mut out, raw, "border-radius", "cornerRadius", Radius, raw.corner_radius);
    } else {
        // Mixed corners: the export omits cornerRadius and lists each corner.
        let corners = [
            ("border-radius-top-left", "topLeftRadius", raw.top_left_radius),
            ("border-radius-top-right", "topRightRadius", raw.top_right_radius),
            ("border-radius-bottom-right", "bottomRightRadius", raw.bottom_right_radius),
            ("border-radius-bottom-left", "bottomLeftRadius", raw.bottom_left_radius),
        ];
        for (property, field, value) in corners {
            dimension(&mut out, raw, property, field, Radius, value);
        }
    }

    let has_stroke = raw.strokes.iter().any(RawPaint::is_visible_solid);
    if has_stroke {
        dimension(&mut out, raw, "border-width", "strokeWeight", BorderWidth, raw.stroke_weight);
    }
    let opacity_bound = raw.bound_id("opacity").is_some();
    if let Some(opacity) = raw.opacity
        && (opacity < 1.0 || opacity_bound)
    {
        dimension(&mut out, raw, "opacity", "opacity", Opacity, Some(opacity));
    }

    paint(&mut out, raw, "fill", "fills", &raw.fills);
    paint(&mut out, raw, "stroke", "strokes", &raw.strokes);

    if let Some(style) = &raw.style {
        dimension(&mut out, raw, "font-size", "fontSize", FontSize, style.font_size);
        dimension(&mut out, raw, "font-weight", "fontWeight", FontWeight, style.font_weight);
        dimension(&mut out, raw, "line-height", "lineHeight", LineHeight, style.line_height_px);
        let letter_spacing = style
            .letter_spacing
            .filter(|v| *v != 0.0 || raw.bound_id("letterSpacing").is_some());
        dimension(
            &mut out,
            raw,
            "letter-spacing",
            "letterSpacing",
            LetterSpacing,
            letter_spacing,
        );
    }
    out
}

/// Extract properties for the whole tree.
#[must_use]
pub fn index_properties(raw: &RawNode) -> PropertyIndex {
    fn walk(raw: &RawNode, index: &mut PropertyIndex) {
        let props = extract_properties(raw);
        if !props.is_empty() {
            index.insert(raw.id.clone(), props);
        }
        for child in &raw.children {
            walk(child, index);
        }
    }
    let mut index = PropertyIndex::new();
    walk(raw, &mut index);
    index
}

/// Variant axes declared by a component set's children.
///
/// Children named `Size=Large, State=Hover` contribute axis `Size` with option
/// `Large` and axis `State` with option `Hover`. Axes and options keep
/// first-seen order. Returns `None` when the root declares no axes.
#[must_use]
pub fn variant_axes(raw: &RawNode) -> Option<Vec<VariantAxis>> {
    if NodeKind::from_figma(raw.node_type.as_deref()) != NodeKind::ComponentSet {
        return None;
    }
    let mut axes: Vec<VariantAxis> = Vec::new();
    for child in &raw.children {
        if NodeKind::from_figma(child.node_type.as_deref()) != NodeKind::Component {
            continue;
        }
        for pair in child.name.split(',') {
            let Some((axis, option)) = pair.split_once('=') else {
                continue;
            };
            let (axis, option) = (axis.trim(), option.trim());
            if axis.is_empty() || option.is_empty() {
                continue;
            }
            let entry = match axes.iter_mut().position(|a| a.name == axis) {
                Some(pos) => &mut axes[pos],
                None => {
                    axes.push(VariantAxis {
                        name: axis.to_string(),
                        options: Vec::new(),
                    });
                    let last = axes.len() - 1;
                    &mut axes[last]
                }
            };
            if !entry.options.iter().any(|o| o == option) {
                entry.options.push(option.to_string());
            }
        }
    }
    (!axes.is_empty()).then_some(axes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{BoundVariableRef, RawColor, VariableAlias};

    fn purple_fill() -> RawPaint {
        RawPaint {
            paint_type: Some("SOLID".to_string()),
            color: Some(RawColor {
                r: 0.576,
                g: 0.2,
                b: 0.918,
                a: 1.0,
            }),
            ..RawPaint::default()
        }
    }

    #[test]
    fn fill_is_rendered_as_rgba_with_byte_channels() {
        let raw = RawNode {
            id: "1:0".into(),
            fills: vec![purple_fill()],
            ..RawNode::default()
        };
        let props = extract_properties(&raw);
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].property, "fill");
        assert_eq!(props[0].raw_value, Scalar::from("rgba(147, 51, 234, 1)"));
    }

    #[test]
    fn array_form_binding_is_read_by_paint_index() {
        let mut raw = RawNode {
            id: "1:0".into(),
            fills: vec![purple_fill()],
            ..RawNode::default()
        };
        raw.bound_variables.insert(
            "fills".into(),
            BoundVariableRef::Many(vec![VariableAlias {
                id: "VariableID:1:2".into(),
            }]),
        );
        let props = extract_properties(&raw);
        assert_eq!(props[0].bound_variable_id.as_deref(), Some("VariableID:1:2"));
    }

    #[test]
    fn mixed_corners_are_listed_individually() {
        let raw = RawNode {
            top_left_radius: Some(4.0),
            bottom_right_radius: Some(8.0),
            ..RawNode::default()
        };
        let names: Vec<_> = extract_properties(&raw)
            .into_iter()
            .map(|p| p.property)
            .collect();
        assert_eq!(names, vec!["border-radius-top-left", "border-radius-bottom-right"]);
    }

    #[test]
    fn opaque_nodes_do_not_report_opacity() {
        let raw = RawNode {
            opacity: Some(1.0),
            ..RawNode::default()
        };
        assert!(extract_properties(&raw).is_empty());
    }

    #[test]
    fn stroke_weight_requires_visible_stroke() {
        let mut raw = RawNode {
            stroke_weight: Some(1.0),
            ..RawNode::default()
        };
        assert!(extract_properties(&raw).is_empty());
        raw.strokes.push(purple_fill());
        let names: Vec<_> = extract_properties(&raw)
            .into_iter()
            .map(|p| p.property)
            .collect();
        assert_eq!(names, vec!["border-width", "stroke"]);
    }
}
