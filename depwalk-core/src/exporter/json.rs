//! JSON format exporter.

use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;

/// Serializable view of a graph: vertices and `[from, to]` edge pairs in
/// insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub vertices: Vec<String>,
    pub edges: Vec<(String, String)>,
}

impl From<&DependencyGraph> for GraphSnapshot {
    fn from(graph: &DependencyGraph) -> Self {
        Self {
            vertices: graph.vertices().map(str::to_string).collect(),
            edges: graph
                .edges()
                .into_iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        }
    }
}

/// Export a graph to JSON.
pub fn export(graph: &DependencyGraph, pretty: bool) -> Result<String, serde_json::Error> {
    let snapshot = GraphSnapshot::from(graph);
    if pretty {
        serde_json::to_string_pretty(&snapshot)
    } else {
        serde_json::to_string(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_json() {
        let mut graph = DependencyGraph::new();
        graph.add_vertex("a");
        graph.add_vertex("b");
        graph.add_edge("a", "b");

        let output = export(&graph, false).unwrap();
        assert_eq!(output, r#"{"vertices":["a","b"],"edges":[["a","b"]]}"#);
    }

    #[test]
    fn test_export_json_pretty() {
        let mut graph = DependencyGraph::new();
        graph.add_vertex("a");

        let output = export(&graph, true).unwrap();
        assert!(output.contains('\n'));
        let parsed: GraphSnapshot = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.vertices, vec!["a"]);
        assert!(parsed.edges.is_empty());
    }
}
