//! Depth-bounded JSON parsing for node exports and analysis records.
//!
//! serde_json stops at 128 levels of nesting, and every tree level costs two
//! (the node object and its `children` array). Inputs are scanned first and
//! rejected above [`MAX_JSON_NESTING`]; within that bound the parser runs
//! without its own limit so the tree builder's depth ceiling decides.

use serde::de::DeserializeOwned;

use crate::DesignTokError;

/// Largest configurable tree depth.
pub const MAX_TREE_DEPTH: usize = 256;

/// Deepest JSON nesting accepted: two levels per tree level plus headroom
/// for envelopes and per-node fields.
pub const MAX_JSON_NESTING: usize = 2 * (MAX_TREE_DEPTH + 1) + 32;

/// Deepest object/array nesting in `text`, ignoring brackets inside strings.
pub fn nesting_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Parse `text`, failing with `MalformedInput` when nested deeper than
/// [`MAX_JSON_NESTING`] and `InvalidJson` on syntax errors.
pub fn from_str_bounded<T: DeserializeOwned>(text: &str) -> Result<T, DesignTokError> {
    let depth = nesting_depth(text);
    if depth > MAX_JSON_NESTING {
        return Err(DesignTokError::malformed(format!(
            "JSON nesting of {depth} levels exceeds the supported maximum of {MAX_JSON_NESTING}"
        )));
    }
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value: T = serde::Deserialize::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}
