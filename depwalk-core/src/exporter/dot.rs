//! Graphviz DOT exporter.
//!
//! Renders every vertex once and every edge once, in graph insertion order.
//! The layout of each statement comes from a [`DotTemplate`] whose format
//! strings use the placeholders `{name}`, `{from}` and `{to}`; identifiers
//! are substituted already quoted and escaped.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::graph::DependencyGraph;

/// Formatting scheme for DOT output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotTemplate {
    /// Name after the `digraph` keyword.
    pub graph_name: String,

    /// Graph-level statements emitted before vertices, e.g. `rankdir=LR`.
    pub graph_attributes: Vec<String>,

    /// Statement per vertex; `{name}` is the quoted identifier.
    pub vertex_format: String,

    /// Statement per edge; `{from}` and `{to}` are quoted identifiers.
    pub edge_format: String,
}

impl Default for DotTemplate {
    fn default() -> Self {
        Self {
            graph_name: "dependencies".to_string(),
            graph_attributes: Vec::new(),
            vertex_format: "{name};".to_string(),
            edge_format: "{from} -> {to};".to_string(),
        }
    }
}

/// Quote a DOT identifier.
fn quote(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 2);
    out.push('"');
    for c in id.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Substitute `{placeholder}` tokens of `format` in one left-to-right pass.
///
/// Inserted values are never rescanned, so identifiers that themselves
/// contain `{to}` or `{name}` come out verbatim. Unknown tokens are kept.
fn fill(format: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(format.len() + 32);
    let mut rest = format;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let token = values.iter().find(|(key, _)| {
            tail.strip_prefix('{')
                .and_then(|t| t.strip_prefix(*key))
                .is_some_and(|t| t.starts_with('}'))
        });
        match token {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Render `graph` as a DOT document.
pub fn export(graph: &DependencyGraph, template: &DotTemplate) -> String {
    let mut lines = Vec::with_capacity(graph.vertex_count() + graph.edge_count() + 2);
    lines.push(format!("digraph {} {{", quote(&template.graph_name)));

    for attr in &template.graph_attributes {
        lines.push(format!("  {};", attr.trim_end_matches(';')));
    }

    for vertex in graph.vertices() {
        let line = fill(&template.vertex_format, &[("name", quote(vertex).as_str())]);
        lines.push(format!("  {}", line));
    }

    for (from, to) in graph.edges() {
        let line = fill(
            &template.edge_format,
            &[("from", quote(from).as_str()), ("to", quote(to).as_str())],
        );
        lines.push(format!("  {}", line));
    }

    lines.push("}".to_string());
    let mut output = lines.join("\n");
    output.push('\n');
    output
}

/// Render `graph` and write it to `path`.
pub fn write_file(graph: &DependencyGraph, path: &Path, template: &DotTemplate) -> io::Result<()> {
    fs::write(path, export(graph, template))
}
