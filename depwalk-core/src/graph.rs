//! Dependency graph powered by petgraph.
//!
//! Holds the vertices (logical units such as modules or components) and the
//! directed "depends on" edges discovered by the walker, and provides the
//! reachability and transitive-reduction algorithms used for cycle checks
//! and visualization.
//!
//! # Key Features
//!
//! - **Set semantics**: vertices and edges are never duplicated.
//! - **Reachability**: explicit-stack DFS, `has_path(v, v)` is always true.
//! - **Transitive reduction**: minimal edge set with the same reachability,
//!   refused with [`GraphError::CycleDetected`] on cyclic input.

use petgraph::algo::{kosaraju_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

use crate::error::GraphError;

/// Directed graph of named vertices where an edge `from -> to` means
/// "from depends on to".
///
/// The graph itself is policy-agnostic: it does not reject cycles or
/// self-loops. Keeping it acyclic is the walker's job.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex. Re-adding an existing identifier is a no-op.
    ///
    /// Returns `true` if the vertex was newly inserted.
    pub fn add_vertex(&mut self, id: &str) -> bool {
        if self.node_map.contains_key(id) {
            return false;
        }
        let idx = self.graph.add_node(id.to_string());
        self.node_map.insert(id.to_string(), idx);
        true
    }

    /// Check if a vertex exists.
    pub fn has_vertex(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    /// Add a directed edge between two existing vertices.
    ///
    /// Returns `true` if the edge was inserted, `false` if it already
    /// existed or either endpoint is unknown.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let (Some(&src), Some(&dst)) = (self.node_map.get(from), self.node_map.get(to)) else {
            return false;
        };
        if self.graph.contains_edge(src, dst) {
            return false;
        }
        self.graph.add_edge(src, dst, ());
        true
    }

    /// Check if the edge `from -> to` exists.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_map.get(from), self.node_map.get(to)) {
            (Some(&src), Some(&dst)) => self.graph.contains_edge(src, dst),
            _ => false,
        }
    }

    /// Out-neighbors of `id`. Unknown vertices have none.
    pub fn adjacent(&self, id: &str) -> Vec<&str> {
        match self.node_map.get(id) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, Direction::Outgoing)
                .map(|n| self.graph[n].as_str())
                .collect(),
            None => vec![],
        }
    }

    /// Is `to` reachable from `from` via zero or more edges?
    ///
    /// A vertex always reaches itself. The walker relies on this to reject
    /// self-loops through the cycle policy: adding `from -> to` closes a
    /// cycle iff `has_path(to, from)` holds beforehand.
    pub fn has_path(&self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }
        let (Some(&start), Some(&target)) = (self.node_map.get(from), self.node_map.get(to)) else {
            return false;
        };

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            for neighbor in self.graph.neighbors_directed(current, Direction::Outgoing) {
                if !visited.contains(&neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        false
    }

    /// Vertex identifiers in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_weights().map(String::as_str)
    }

    /// Edges as `(from, to)` pairs in insertion order.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.graph
            .edge_references()
            .map(|e| (self.graph[e.source()].as_str(), self.graph[e.target()].as_str()))
            .collect()
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Check whether the graph contains any cycle, self-loops included.
    pub fn is_cyclic(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Find all cycles as groups of vertices.
    ///
    /// Uses Kosaraju's algorithm: O(V + E). Strongly connected components
    /// with more than one vertex are reported, as are single vertices with a
    /// self-loop. Members are sorted for stable output.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut members: Vec<String> =
                    scc.into_iter().map(|idx| self.graph[idx].clone()).collect();
                members.sort_unstable();
                members
            })
            .collect()
    }

    /// Compute the transitive reduction of this graph.
    ///
    /// Returns a new graph with the same vertices and only the edges needed
    /// to preserve reachability. An edge `(u, v)` is removed iff `v` is
    /// reachable from some other direct successor `w != v` of `u`. For a DAG
    /// the result is unique.
    ///
    /// # Algorithm
    ///
    /// Process vertices in reverse topological order (sinks first) so every
    /// successor's reachable set is complete before its predecessors are
    /// visited, then filter edges against those sets.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CycleDetected`] if the graph is not acyclic.
    pub fn transitive_reduction(&self) -> Result<DependencyGraph, GraphError> {
        let topo = toposort(&self.graph, None).map_err(|cycle| GraphError::CycleDetected {
            vertex: self.graph[cycle.node_id()].clone(),
        })?;

        let mut reachable: HashMap<NodeIndex, HashSet<NodeIndex>> =
            HashMap::with_capacity(self.graph.node_count());

        for &u in topo.iter().rev() {
            let mut reach_u: HashSet<NodeIndex> = HashSet::new();
            for v in self.graph.neighbors_directed(u, Direction::Outgoing) {
                reach_u.insert(v);
                if let Some(rv) = reachable.get(&v) {
                    reach_u.extend(rv.iter().copied());
                }
            }
            reachable.insert(u, reach_u);
        }

        let mut reduced = DependencyGraph::new();
        for id in self.vertices() {
            reduced.add_vertex(id);
        }

        for edge in self.graph.edge_references() {
            let (u, v) = (edge.source(), edge.target());
            let redundant = self
                .graph
                .neighbors_directed(u, Direction::Outgoing)
                .filter(|&w| w != v)
                .any(|w| reachable.get(&w).is_some_and(|rw| rw.contains(&v)));

            if !redundant {
                reduced.add_edge(&self.graph[u], &self.graph[v]);
            }
        }

        Ok(reduced)
    }
}

/// Two graphs are equal when their vertex and edge sets are equal,
/// regardless of insertion order.
impl PartialEq for DependencyGraph {
    fn eq(&self, other: &Self) -> bool {
        if self.vertex_count() != other.vertex_count() || self.edge_count() != other.edge_count() {
            return false;
        }
        self.vertices().all(|v| other.has_vertex(v))
            && self.edges().into_iter().all(|(a, b)| other.has_edge(a, b))
    }
}

impl Eq for DependencyGraph {}
