//! The token value table: families, primitives and semantic aliases.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use designtok_types::{DesignTokError, Scalar, TokenCategory};

use crate::color::{Rgba, parse_color};

/// A primitive token's resolved value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenValue {
    Dimension(f64),
    Color(Rgba),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveToken {
    pub path: String,
    pub family: String,
    pub category: TokenCategory,
    pub value: TokenValue,
    /// Value relative to the family base value.
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticToken {
    pub path: String,
    pub category: TokenCategory,
    /// Path of the primitive this token wraps.
    pub primitive: String,
}

/// Token kind found at a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenRef<'a> {
    Primitive(&'a PrimitiveToken),
    Semantic(&'a SemanticToken),
}

/// Flat JSON form of a token table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenTableFile {
    /// Family name to base value (e.g. `space = 8`).
    pub families: BTreeMap<String, f64>,
    pub primitives: Vec<PrimitiveEntry>,
    pub semantics: Vec<SemanticEntry>,
    /// Extra variable-name to token-path pairs.
    pub variable_names: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveEntry {
    pub path: String,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub category: Option<TokenCategory>,
    pub value: Scalar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticEntry {
    pub path: String,
    pub references: String,
    #[serde(default)]
    pub category: Option<TokenCategory>,
}

#[derive(Debug, Clone, Default)]
pub struct TokenTable {
    families: BTreeMap<String, f64>,
    primitives: BTreeMap<String, PrimitiveToken>,
    semantics: BTreeMap<String, SemanticToken>,
    /// Primitive path to the semantics that wrap it, sorted.
    wrapped_by: BTreeMap<String, Vec<String>>,
    variable_names: BTreeMap<String, String>,
    generated_names: BTreeMap<String, String>,
}

/// Parse `16`, `"16"`, `"16px"` or `"50%"` into a number.
pub fn parse_dimension(value: &Scalar) -> Option<f64> {
    match value {
        Scalar::Number(n) => Some(*n),
        Scalar::Text(text) => {
            let trimmed = text.trim();
            let digits = trimmed
                .strip_suffix("px")
                .or_else(|| trimmed.strip_suffix('%'))
                .unwrap_or(trimmed)
                .trim();
            digits.parse::<f64>().ok()
        }
        Scalar::Bool(_) => None,
    }
}

/// First path segment, used as the family when none is declared.
fn leading_segment(path: &str) -> &str {
    path.split('.').next().unwrap_or(path)
}

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the flat JSON form.
    pub fn from_json_str(text: &str) -> Result<Self, DesignTokError> {
        let file: TokenTableFile = serde_json::from_str(text)?;
        Self::from_file(file)
    }

    pub fn from_file(file: TokenTableFile) -> Result<Self, DesignTokError> {
        let mut table = TokenTable::new();
        for (family, base) in file.families {
            table.set_family_base(&family, base)?;
        }
        for entry in file.primitives {
            let family = entry
                .family
                .unwrap_or_else(|| leading_segment(&entry.path).to_string());
            let Some(category) = entry.category.or_else(|| TokenCategory::from_family(&family))
            else {
                warn!(path = %entry.path, family = %family, "skipping primitive with unknown category");
                continue;
            };
            table.insert_primitive(&entry.path, &family, category, &entry.value)?;
        }
        for entry in file.semantics {
            table.insert_semantic(&entry.path, &entry.references, entry.category)?;
        }
        for (name, path) in file.variable_names {
            table.variable_names.insert(name, path);
        }
        debug!(
            primitives = table.primitives.len(),
            semantics = table.semantics.len(),
            "loaded token table"
        );
        Ok(table)
    }

    pub fn set_family_base(&mut self, family: &str, base: f64) -> Result<(), DesignTokError> {
        if !base.is_finite() || base <= 0.0 {
            return Err(DesignTokError::malformed(format!(
                "family {family} has a non-positive base value {base}"
            )));
        }
        self.families.insert(family.to_string(), base);
        for token in self.primitives.values_mut() {
            if token.family == family
                && let TokenValue::Dimension(v) = token.value
            {
                token.multiplier = v / base;
            }
        }
        Ok(())
    }

    pub fn insert_primitive(
        &mut self,
        path: &str,
        family: &str,
        category: TokenCategory,
        value: &Scalar,
    ) -> Result<(), DesignTokError> {
        let value = if category == TokenCategory::Color {
            let text = value.as_str().unwrap_or_default();
            TokenValue::Color(parse_color(text).ok_or_else(|| {
                DesignTokError::malformed(format!("token {path} has an unparsable color {value}"))
            })?)
        } else {
            TokenValue::Dimension(parse_dimension(value).ok_or_else(|| {
                DesignTokError::malformed(format!("token {path} has a non-numeric value {value}"))
            })?)
        };
        let base = self.families.get(family).copied().unwrap_or(1.0);
        let multiplier = match value {
            TokenValue::Dimension(v) => v / base,
            TokenValue::Color(_) => 1.0,
        };
        self.primitives.insert(
            path.to_string(),
            PrimitiveToken {
                path: path.to_string(),
                family: family.to_string(),
                category,
                value,
                multiplier,
            },
        );
        self.index_variable_name(path);
        Ok(())
    }

    /// Register a semantic alias. The referenced primitive must already exist.
    pub fn insert_semantic(
        &mut self,
        path: &str,
        references: &str,
        category: Option<TokenCategory>,
    ) -> Result<(), DesignTokError> {
        let references = references.trim_start_matches('{').trim_end_matches('}');
        let primitive = self.primitives.get(references).ok_or_else(|| {
            DesignTokError::malformed(format!(
                "semantic token {path} references unknown primitive {references}"
            ))
        })?;
        let category = category.unwrap_or(primitive.category);
        self.semantics.insert(
            path.to_string(),
            SemanticToken {
                path: path.to_string(),
                category,
                primitive: references.to_string(),
            },
        );
        let wrapped = self.wrapped_by.entry(references.to_string()).or_default();
        if let Err(pos) = wrapped.binary_search_by(|p| p.as_str().cmp(path)) {
            wrapped.insert(pos, path.to_string());
        }
        self.index_variable_name(path);
        Ok(())
    }

    pub fn insert_variable_name(&mut self, name: &str, path: &str) {
        self.variable_names
            .insert(name.to_string(), path.to_string());
    }

    pub fn primitive(&self, path: &str) -> Option<&PrimitiveToken> {
        self.primitives.get(path)
    }

    pub fn semantic(&self, path: &str) -> Option<&SemanticToken> {
        self.semantics.get(path)
    }

    pub fn lookup(&self, path: &str) -> Option<TokenRef<'_>> {
        self.primitives
            .get(path)
            .map(TokenRef::Primitive)
            .or_else(|| self.semantics.get(path).map(TokenRef::Semantic))
    }

    /// Primitives of one category, in path order.
    pub fn primitives_in(&self, category: TokenCategory) -> impl Iterator<Item = &PrimitiveToken> {
        self.primitives
            .values()
            .filter(move |token| token.category == category)
    }

    /// The lexically first semantic of `category` wrapping `primitive`.
    pub fn semantic_for(&self, primitive: &str, category: TokenCategory) -> Option<&SemanticToken> {
        self.wrapped_by
            .get(primitive)?
            .iter()
            .filter_map(|path| self.semantics.get(path))
            .find(|semantic| semantic.category == category)
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    pub fn semantic_count(&self) -> usize {
        self.semantics.len()
    }

    /// Map a design-tool variable name to a token path.
    ///
    /// Explicit names win, then the generated reverse index (group-prefix
    /// stripping, name/number splitting), then a naive slash-to-dot rewrite.
    /// Returns `None` when no known token sits at the resulting path.
    pub fn resolve_variable_name(&self, name: &str) -> Option<&str> {
        if let Some(path) = self.variable_names.get(name)
            && let Some(found) = self.canonical_path(path)
        {
            return Some(found);
        }
        if let Some(path) = self.generated_names.get(name) {
            return Some(path.as_str());
        }
        self.canonical_path(&name.replace('/', "."))
    }

    fn canonical_path(&self, path: &str) -> Option<&str> {
        self.primitives
            .get_key_value(path)
            .map(|(k, _)| k.as_str())
            .or_else(|| self.semantics.get_key_value(path).map(|(k, _)| k.as_str()))
    }

    fn index_variable_name(&mut self, path: &str) {
        self.generated_names
            .entry(variable_name_for(path))
            .or_insert_with(|| path.to_string());
    }
}

fn strip_group_prefix<'a>(group: &str, key: &'a str) -> &'a str {
    if key.len() > group.len()
        && key.is_char_boundary(group.len())
        && key[..group.len()].eq_ignore_ascii_case(group)
    {
        let rest = &key[group.len()..];
        if rest
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        {
            return rest;
        }
    }
    key
}

fn split_name_number(value: &str) -> Option<(&str, &str)> {
    let split = value.find(|c: char| c.is_ascii_digit())?;
    let (name, number) = value.split_at(split);
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphabetic())
        && number.chars().all(|c| c.is_ascii_digit());
    valid.then_some((name, number))
}

/// The variable name a token path is published under.
///
/// `space.space100` becomes `space/100`, `color.purple300` becomes
/// `color/purple/300`, nested groups keep their full slash path.
#[must_use]
pub fn variable_name_for(path: &str) -> String {
    let segments: Vec<&str> = path.split('.').collect();
    let Some((key, groups)) = segments.split_last() else {
        return path.to_string();
    };
    if groups.is_empty() {
        return (*key).to_string();
    }
    let group_path = groups.join("/");
    let base = groups[0];
    let stripped = strip_group_prefix(base, key);
    let prefix = if groups.len() > 1 { group_path.as_str() } else { base };
    match split_name_number(stripped) {
        Some((name, number)) => format!("{prefix}/{name}/{number}"),
        None => format!("{prefix}/{stripped}"),
    }
}
