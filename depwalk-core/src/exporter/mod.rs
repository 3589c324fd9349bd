//! Graph exporters.
//!
//! - [`dot`]: Graphviz DOT, shaped by a [`dot::DotTemplate`]
//! - [`json`]: vertex/edge snapshot for machine consumption

pub mod dot;
pub mod json;

pub use dot::DotTemplate;
pub use json::GraphSnapshot;
