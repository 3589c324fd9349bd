//! Ready-made conflict handlers for [`Walker::on_unknown_vertex`] and
//! [`Walker::on_cycle`].
//!
//! [`Walker::on_unknown_vertex`]: super::Walker::on_unknown_vertex
//! [`Walker::on_cycle`]: super::Walker::on_cycle

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::graph::DependencyGraph;

/// A dependency the walker could not insert as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeEvent<'a> {
    /// Indexed path of the file declaring the dependency.
    pub path: &'a str,
    /// Vertex of that file.
    pub from: &'a str,
    /// Target named by the dependency.
    pub to: &'a str,
}

/// Boxed conflict handler. Handlers may mutate the graph; the defaults don't.
pub type EdgeHandler =
    Box<dyn FnMut(&EdgeEvent<'_>, &mut DependencyGraph, &dyn DiagnosticSink) + Send>;

/// Default unknown-vertex handler: report and drop the edge.
pub fn report_unknown(event: &EdgeEvent<'_>, _graph: &mut DependencyGraph, sink: &dyn DiagnosticSink) {
    sink.report(Diagnostic::UnknownVertex {
        path: event.path.to_string(),
        from: event.from.to_string(),
        to: event.to.to_string(),
    });
}

/// Default cycle handler: report (except for self-references) and drop the edge.
pub fn report_cycle(event: &EdgeEvent<'_>, _graph: &mut DependencyGraph, sink: &dyn DiagnosticSink) {
    if event.from != event.to {
        sink.report(Diagnostic::CyclicDependency {
            path: event.path.to_string(),
            from: event.from.to_string(),
            to: event.to.to_string(),
        });
    }
}

/// Record cycle-forming edges as data. Self-references are still skipped.
pub fn allow_cycle(event: &EdgeEvent<'_>, graph: &mut DependencyGraph, _sink: &dyn DiagnosticSink) {
    if event.from != event.to {
        graph.add_edge(event.from, event.to);
    }
}

/// Register the unknown target as a new vertex and keep the edge.
pub fn register_unknown(event: &EdgeEvent<'_>, graph: &mut DependencyGraph, _sink: &dyn DiagnosticSink) {
    graph.add_vertex(event.to);
    graph.add_edge(event.from, event.to);
}
