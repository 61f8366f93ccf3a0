//! # designtok-tokens
//!
//! Token value tables and the variable-lookup seam the matcher reads from.
//! Tables are read-only once built; nothing in the pipeline mutates them.

#![forbid(unsafe_code)]

pub mod color;
mod dtcg;
mod table;
mod variables;

pub use color::{Lab, Rgba, delta_e, parse_color, parse_hex, parse_rgba, rgb_to_lab};
pub use table::{
    PrimitiveEntry, PrimitiveToken, SemanticEntry, SemanticToken, TokenRef, TokenTable,
    TokenTableFile, TokenValue, parse_dimension, variable_name_for,
};
pub use variables::{
    ModeValue, ResolvedVariable, VariableLookup, VariableResolution, VariableTable, VariableValue,
};
