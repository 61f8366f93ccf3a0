//! Loading a token table from a DTCG (`$value` / `$type`) tree.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use designtok_types::{DesignTokError, Scalar, TokenCategory};

use crate::table::TokenTable;

/// Longest alias chain followed before giving up.
const MAX_ALIAS_HOPS: usize = 8;

struct Leaf {
    path: String,
    value: Scalar,
    token_type: Option<String>,
    family: Option<String>,
    base_value: Option<f64>,
    /// Set when the key itself is dotted (`color.feedback.text`).
    flat_name: Option<String>,
}

fn extension_field<'a>(token: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    token
        .get("$extensions")?
        .as_object()?
        .values()
        .filter_map(Value::as_object)
        .find_map(|ext| ext.get(field))
}

fn collect(node: &Map<String, Value>, parent: &str, out: &mut Vec<Leaf>) {
    for (key, child) in node {
        if key.starts_with('$') {
            continue;
        }
        let Some(child) = child.as_object() else {
            continue;
        };
        let path = if parent.is_empty() {
            key.clone()
        } else {
            format!("{parent}.{key}")
        };
        let Some(raw) = child.get("$value") else {
            collect(child, &path, out);
            continue;
        };
        let value = match raw {
            Value::Number(n) => n.as_f64().map(Scalar::Number),
            Value::String(s) => Some(Scalar::Text(s.clone())),
            // Composite values (shadows, typography) have no single scalar.
            _ => None,
        };
        if let Some(value) = value {
            out.push(Leaf {
                path: path.clone(),
                value,
                token_type: child.get("$type").and_then(Value::as_str).map(str::to_string),
                family: extension_field(child, "family")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                base_value: extension_field(child, "baseValue").and_then(Value::as_f64),
                flat_name: key.contains('.').then(|| key.replace('.', "/")),
            });
        }
        collect(child, &path, out);
    }
}

fn alias_target(value: &Scalar) -> Option<&str> {
    value
        .as_str()?
        .strip_prefix('{')?
        .strip_suffix('}')
}

fn category_of(leaf: &Leaf) -> Option<TokenCategory> {
    let family = leaf
        .family
        .as_deref()
        .unwrap_or_else(|| leaf.path.split('.').next().unwrap_or_default());
    TokenCategory::from_family(family).or(match leaf.token_type.as_deref() {
        Some("color") => Some(TokenCategory::Color),
        _ => None,
    })
}

impl TokenTable {
    /// Parse a DTCG token file.
    pub fn from_dtcg_str(text: &str) -> Result<Self, DesignTokError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_dtcg(&value)
    }

    /// Build a table from a DTCG tree.
    ///
    /// Literal tokens become primitives; `{path}` references become semantic
    /// aliases of the primitive at the end of their alias chain. Composite
    /// values are skipped.
    pub fn from_dtcg(root: &Value) -> Result<Self, DesignTokError> {
        let root = root
            .as_object()
            .ok_or_else(|| DesignTokError::malformed("DTCG token file must be a JSON object"))?;
        let mut leaves = Vec::new();
        collect(root, "", &mut leaves);

        let mut table = TokenTable::new();
        for leaf in &leaves {
            if let (Some(family), Some(base)) = (&leaf.family, leaf.base_value) {
                table.set_family_base(family, base)?;
            }
        }
        for leaf in leaves.iter().filter(|l| alias_target(&l.value).is_none()) {
            let Some(category) = category_of(leaf) else {
                debug!(path = %leaf.path, "no category for token");
                continue;
            };
            let family = leaf
                .family
                .clone()
                .unwrap_or_else(|| leaf.path.split('.').next().unwrap_or_default().to_string());
            table.insert_primitive(&leaf.path, &family, category, &leaf.value)?;
            if let Some(name) = &leaf.flat_name {
                table.insert_variable_name(name, &leaf.path);
            }
        }
        for leaf in leaves.iter().filter(|l| alias_target(&l.value).is_some()) {
            let Some(primitive) = resolve_chain(&leaves, &leaf.value) else {
                warn!(path = %leaf.path, "alias chain does not end at a primitive");
                continue;
            };
            if table.primitive(&primitive).is_none() {
                warn!(path = %leaf.path, target = %primitive, "alias targets a skipped token");
                continue;
            }
            let category = category_of(leaf)
                .filter(|_| leaf.family.is_some());
            table.insert_semantic(&leaf.path, &primitive, category)?;
            if let Some(name) = &leaf.flat_name {
                table.insert_variable_name(name, &leaf.path);
            }
        }
        debug!(
            primitives = table.primitive_count(),
            semantics = table.semantic_count(),
            "loaded DTCG tokens"
        );
        Ok(table)
    }
}

fn resolve_chain(leaves: &[Leaf], start: &Scalar) -> Option<String> {
    let mut target = alias_target(start)?.to_string();
    for _ in 0..MAX_ALIAS_HOPS {
        let next = leaves.iter().find(|l| l.path == target)?;
        match alias_target(&next.value) {
            Some(further) => target = further.to_string(),
            None => return Some(target),
        }
    }
    None
}
