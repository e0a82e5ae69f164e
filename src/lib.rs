//! P&ID diagram annotator.
//!
//! This crate turns a scanned technical drawing (pre-extracted JSON position
//! and line-segment artifacts) plus Lua-style control configuration files
//! into an annotated SVG diagram with icons, tooltips, and a legend.
//!
//! The core pipeline is `parser` → `merge` → `index` → `classify`; the
//! `svg` module consumes classification results to emit the final markup.
//! The binary `pidviz` wires the stages together.

pub mod classify;
pub mod index;
pub mod merge;
pub mod model;
pub mod parser;
pub mod svg;
