//! depwalk core - dependency graph discovery over file corpora.
//!
//! Files are grouped into logical units (vertices) by a naming function,
//! dependencies between units are extracted from file content, and the
//! resulting directed graph can be reduced to its minimal equivalent for
//! visualization.
//!
//! # Features
//!
//! - **Two-phase walk**: index files into vertices, then parse them for edges
//! - **Conflict policies**: pluggable handling of unknown targets and cycles
//! - **Parallel parsing**: file reading and extraction run on rayon
//! - **Transitive reduction**: minimal edge set with identical reachability
//! - **Export formats**: Graphviz DOT, JSON
//!
//! # Usage
//!
//! ```no_run
//! use depwalk_core::{exporter, LineExtractor, Walker};
//!
//! let mut walker = Walker::new();
//! walker.index("tests/files", &["*.txt"], |path| {
//!     path.strip_suffix(".txt").map(str::to_string)
//! })?;
//!
//! let extractor = LineExtractor::new(r"^->\s*(\w+)")?;
//! walker.parse("tests/files", &["*.txt"], |file, reader| extractor.extract(file, reader))?;
//!
//! let reduced = walker.graph().transitive_reduction()?;
//! println!("{}", exporter::dot::export(&reduced, &Default::default()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod diagnostics;
pub mod error;
pub mod exporter;
pub mod extract;
pub mod graph;
pub mod resolver;
pub mod scanner;
pub mod walker;

pub use diagnostics::{Diagnostic, DiagnosticSink, MemorySink, NullSink, TracingSink};
pub use error::{GraphError, WalkError};
pub use extract::LineExtractor;
pub use graph::DependencyGraph;
pub use resolver::Resolver;
pub use scanner::WalkOptions;
pub use walker::{EdgeEvent, IndexSummary, ParseSummary, SourceFile, Walker};
