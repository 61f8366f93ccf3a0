//! # designtok-analysis
//!
//! **Tier 3 (Orchestration)**
//!
//! Runs the builder, matcher, pattern detector, binding resolver and
//! recommendation synthesizer in order, then assembles the record.
//!
//! ## What belongs here
//! * Pipeline ordering
//! * Summary and confidence folds
//! * Extraction metadata
//!
//! ## What does NOT belong here
//! * Rendering (see `designtok-format`)
//! * File loading (see `designtok-core`)

#![forbid(unsafe_code)]

mod assemble;
mod pipeline;

pub use assemble::{AssemblyParts, assemble, confidence_counts, summarize};
pub use pipeline::{AnalysisContext, AnalysisRequest, analyze, bound_variable_ids, timestamp_utc};
