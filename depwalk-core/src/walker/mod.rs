//! Two-phase dependency discovery over a file corpus.
//!
//! 1. **Index**: enumerate files matching glob patterns and map each one to
//!    a vertex through a caller-supplied naming function.
//! 2. **Parse**: read previously indexed files, let a caller-supplied
//!    extraction function list the vertices each file depends on, and
//!    insert the resulting edges subject to the conflict policies.
//!
//! File reading and extraction run on a rayon pool. Candidate edges are
//! applied afterwards on the calling thread in path order, so the
//! unknown-vertex check, the cycle check and the insertion happen
//! atomically per edge and the resulting graph is deterministic.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::{debug, info};

use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::{Result, WalkError};
use crate::graph::DependencyGraph;
use crate::resolver::{clean_path, join_path, Resolver};
use crate::scanner::{self, WalkOptions};

pub mod policy;

pub use policy::{EdgeEvent, EdgeHandler};

/// Files between two progress log lines while parsing.
const PROGRESS_INTERVAL: usize = 1000;

/// A file handed to the extraction function.
#[derive(Clone, Copy, Debug)]
pub struct SourceFile<'a> {
    /// Path relative to the parse root, `/`-separated.
    pub relative_path: &'a str,
    /// Indexed (canonical) path, usable with [`Resolver::resolve`].
    pub path: &'a str,
    /// Vertex the file belongs to.
    pub vertex: &'a str,
    /// Path index, for translating raw references into vertices.
    pub resolver: &'a Resolver,
}

/// Statistics from one `index` call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexSummary {
    /// Files matching the patterns.
    pub discovered: usize,
    /// Files newly mapped to a vertex.
    pub indexed: usize,
    /// Files the naming function declined.
    pub excluded: usize,
    /// Files indexed by an earlier call.
    pub already_indexed: usize,
    /// Vertices created by this call.
    pub new_vertices: usize,
    pub duration_ms: f64,
}

/// Outcome of applying extracted dependencies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeStats {
    /// Edges inserted by the walker.
    pub added: usize,
    /// Dependencies already present as edges.
    pub duplicates: usize,
    /// Dependencies handed to the unknown-vertex handler.
    pub unknown_targets: usize,
    /// Dependencies handed to the cycle handler.
    pub cycles: usize,
}

impl EdgeStats {
    fn absorb(&mut self, other: EdgeStats) {
        self.added += other.added;
        self.duplicates += other.duplicates;
        self.unknown_targets += other.unknown_targets;
        self.cycles += other.cycles;
    }
}

/// Statistics from one `parse` call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseSummary {
    /// Files whose dependencies were extracted.
    pub files_parsed: usize,
    /// Files that could not be opened or extracted.
    pub failed_files: usize,
    pub edges: EdgeStats,
    pub duration_ms: f64,
}

/// Why a file contributed nothing.
enum FileFailure {
    Open(String),
    Extract(String),
}

/// Per-file result of the parallel phase of `parse`.
struct FileOutcome {
    path: String,
    vertex: String,
    result: std::result::Result<Vec<String>, FileFailure>,
}

/// Builds a [`DependencyGraph`] from a file corpus.
///
/// # Example
///
/// ```no_run
/// use depwalk_core::walker::Walker;
/// use std::io::BufRead;
///
/// let mut walker = Walker::new();
/// walker
///     .index("include", &["boost/*/**/*.hpp"], |path| {
///         path.split('/').nth(1).map(str::to_string)
///     })
///     .unwrap();
/// walker
///     .parse("include", &["boost/**/*.hpp"], |file, reader| {
///         let mut deps = Vec::new();
///         for line in reader.lines() {
///             let line = line?;
///             if let Some(rest) = line.strip_prefix("#include <") {
///                 let target = rest.trim_end_matches('>');
///                 if let Some(v) = file.resolver.try_resolve(target, &["include"]) {
///                     deps.push(v.to_string());
///                 }
///             }
///         }
///         Ok::<_, std::io::Error>(deps)
///     })
///     .unwrap();
/// let reduced = walker.graph().transitive_reduction().unwrap();
/// ```
pub struct Walker {
    graph: DependencyGraph,
    resolver: Resolver,
    on_unknown_vertex: EdgeHandler,
    on_cycle: EdgeHandler,
    sink: Arc<dyn DiagnosticSink>,
    options: WalkOptions,
    pool: OnceLock<rayon::ThreadPool>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for Walker {
    fn default() -> Self {
        Self::new()
    }
}

impl Walker {
    /// Create a walker with default policies, logging diagnostics through
    /// `tracing`.
    pub fn new() -> Self {
        Self {
            graph: DependencyGraph::new(),
            resolver: Resolver::new(),
            on_unknown_vertex: Box::new(policy::report_unknown),
            on_cycle: Box::new(policy::report_cycle),
            sink: Arc::new(TracingSink),
            options: WalkOptions::default(),
            pool: OnceLock::new(),
            cancel: None,
        }
    }

    /// Replace the diagnostic sink.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace traversal and worker-pool options.
    pub fn with_options(mut self, options: WalkOptions) -> Self {
        self.options = options;
        self.pool = OnceLock::new();
        self
    }

    /// Abort `index`/`parse` with [`WalkError::Cancelled`] once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Set the handler called when a dependency names an unindexed vertex.
    pub fn on_unknown_vertex<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&EdgeEvent<'_>, &mut DependencyGraph, &dyn DiagnosticSink) + Send + 'static,
    {
        self.on_unknown_vertex = Box::new(handler);
        self
    }

    /// Set the handler called when a dependency would close a cycle.
    ///
    /// The default keeps the graph acyclic. A handler that calls
    /// `graph.add_edge` records cyclic dependencies instead.
    pub fn on_cycle<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&EdgeEvent<'_>, &mut DependencyGraph, &dyn DiagnosticSink) + Send + 'static,
    {
        self.on_cycle = Box::new(handler);
        self
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut DependencyGraph {
        &mut self.graph
    }

    pub fn into_graph(self) -> DependencyGraph {
        self.graph
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Map an indexed path to its vertex.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.resolver.resolve(path)
    }

    /// Resolve `basename` against candidate roots, first hit wins.
    pub fn try_resolve(&self, basename: &str, roots: &[&str]) -> Option<&str> {
        self.resolver.try_resolve(basename, roots)
    }

    /// Record files under `root` matching any of `patterns`.
    ///
    /// `naming` receives the root-relative path and returns the vertex the
    /// file belongs to, or `None` (or an empty name) to leave the file out.
    /// Files indexed by an earlier call keep their first mapping.
    ///
    /// # Errors
    ///
    /// Fails on a missing root, an empty or invalid pattern list, or
    /// cancellation.
    pub fn index<P, S, F>(&mut self, root: P, patterns: &[S], naming: F) -> Result<IndexSummary>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String> + Sync,
    {
        let start = Instant::now();
        let root = root.as_ref();
        let scan = scanner::scan(root, patterns, &self.options)?;
        info!(
            "Indexing {} files from {} pattern(s).",
            scan.len(),
            patterns.len()
        );

        let root_key = root_key(root);
        let mut summary = IndexSummary {
            discovered: scan.len(),
            ..Default::default()
        };

        let pending: Vec<(String, String)> = scan
            .files
            .into_iter()
            .map(|rel| (clean_path(&join_path(&root_key, &rel)), rel))
            .filter(|(key, _)| {
                let seen = self.resolver.contains(key);
                if seen {
                    summary.already_indexed += 1;
                }
                !seen
            })
            .collect();

        let cancel = self.cancel.clone();
        let named: Vec<(String, Option<String>)> = self.run_parallel(|| {
            pending
                .into_par_iter()
                .map(|(key, rel)| {
                    if is_set(&cancel) {
                        return (key, None);
                    }
                    let vertex = naming(&rel).filter(|name| !name.is_empty());
                    (key, vertex)
                })
                .collect()
        })?;
        self.check_cancelled()?;

        for (key, vertex) in named {
            match vertex {
                Some(vertex) => {
                    if self.graph.add_vertex(&vertex) {
                        summary.new_vertices += 1;
                    }
                    self.resolver.insert(&key, &vertex);
                    summary.indexed += 1;
                }
                None => {
                    debug!("Excluded '{}' from the graph", key);
                    summary.excluded += 1;
                }
            }
        }

        summary.duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        Ok(summary)
    }

    /// Extract dependencies from indexed files under `root` matching any of
    /// `patterns`.
    ///
    /// `extract` receives the file and a buffered reader over its content
    /// and returns the vertices the file depends on. A file that cannot be
    /// opened, or whose extraction fails, is reported and skipped.
    ///
    /// Each dependency `to` of a file with vertex `from` goes to the
    /// unknown-vertex handler if `to` is not a vertex, to the cycle handler
    /// if `to` already reaches `from`, and becomes an edge otherwise.
    ///
    /// # Errors
    ///
    /// Fails on a missing root, an empty or invalid pattern list, or
    /// cancellation.
    pub fn parse<P, S, F, E>(&mut self, root: P, patterns: &[S], extract: F) -> Result<ParseSummary>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
        F: Fn(&SourceFile<'_>, &mut dyn BufRead) -> std::result::Result<Vec<String>, E> + Sync,
        E: Display,
    {
        let start = Instant::now();
        let root = root.as_ref();
        scanner::ensure_root(root)?;
        let matcher = scanner::build_globset(patterns)?;
        info!("Parsing files matching {} pattern(s).", patterns.len());

        let root_key = clean_path(&root_key(root));
        let targets: Vec<(&str, String, &str)> = self
            .resolver
            .iter()
            .filter_map(|(path, vertex)| {
                let rel = strip_root(&root_key, path)?;
                matcher.is_match(&rel).then_some((path, rel, vertex))
            })
            .collect();
        debug!("{} indexed files selected for parsing", targets.len());

        let resolver = &self.resolver;
        let cancel = self.cancel.clone();
        let outcomes: Vec<FileOutcome> = self.run_parallel(|| {
            targets
                .par_iter()
                .filter(|_| !is_set(&cancel))
                .map(|(path, rel, vertex)| {
                    let source = SourceFile {
                        relative_path: rel,
                        path,
                        vertex,
                        resolver,
                    };
                    FileOutcome {
                        path: path.to_string(),
                        vertex: vertex.to_string(),
                        result: read_dependencies(&source, &extract),
                    }
                })
                .collect()
        })?;
        self.check_cancelled()?;

        let mut summary = ParseSummary::default();
        for (counter, outcome) in outcomes.into_iter().enumerate() {
            self.check_cancelled()?;
            match outcome.result {
                Ok(dependencies) => {
                    let stats = self.add_dependencies(&outcome.path, &outcome.vertex, &dependencies);
                    summary.edges.absorb(stats);
                    summary.files_parsed += 1;
                }
                Err(FileFailure::Open(message)) => {
                    self.sink.report(Diagnostic::OpenFailed {
                        path: outcome.path,
                        message,
                    });
                    summary.failed_files += 1;
                }
                Err(FileFailure::Extract(message)) => {
                    self.sink.report(Diagnostic::ExtractFailed {
                        path: outcome.path,
                        message,
                    });
                    summary.failed_files += 1;
                }
            }
            if (counter + 1) % PROGRESS_INTERVAL == 0 {
                info!("{} files parsed.", counter + 1);
            }
        }

        summary.duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        Ok(summary)
    }

    /// Insert dependencies from vertex `from` (declared in file `path`) to
    /// each of `tos`, applying the conflict handlers.
    pub fn add_dependencies<S: AsRef<str>>(&mut self, path: &str, from: &str, tos: &[S]) -> EdgeStats {
        let mut stats = EdgeStats::default();

        for to in tos {
            let to = to.as_ref();
            let event = EdgeEvent { path, from, to };

            if !self.graph.has_vertex(to) {
                (self.on_unknown_vertex)(&event, &mut self.graph, self.sink.as_ref());
                stats.unknown_targets += 1;
            } else if self.graph.has_path(to, from) {
                (self.on_cycle)(&event, &mut self.graph, self.sink.as_ref());
                stats.cycles += 1;
            } else if self.graph.add_edge(from, to) {
                stats.added += 1;
            } else {
                stats.duplicates += 1;
            }
        }

        stats
    }

    /// Dedicated worker pool when `threads` is set, built on first use
    /// and shared by every later `index`/`parse` call.
    fn thread_pool(&self) -> Result<Option<&rayon::ThreadPool>> {
        let threads = match self.options.threads {
            Some(n) if n > 0 => n,
            _ => return Ok(None),
        };
        if self.pool.get().is_none() {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
            debug!("Built worker pool with {} threads", threads);
            let _ = self.pool.set(pool);
        }
        Ok(self.pool.get())
    }

    /// Run `f` on the configured pool, or on rayon's global pool.
    fn run_parallel<R, F>(&self, f: F) -> Result<R>
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match self.thread_pool()? {
            Some(pool) => Ok(pool.install(f)),
            None => Ok(f()),
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        if is_set(&self.cancel) {
            Err(WalkError::Cancelled)
        } else {
            Ok(())
        }
    }
}

fn is_set(flag: &Option<Arc<AtomicBool>>) -> bool {
    flag.as_ref().is_some_and(|f| f.load(Ordering::Relaxed))
}

/// Root directory as a `/`-separated string, used as the index key prefix.
fn root_key(root: &Path) -> String {
    root.to_string_lossy().replace('\\', "/")
}

/// Path of an indexed file relative to a cleaned root, if it lies below it.
fn strip_root(root: &str, path: &str) -> Option<String> {
    let rel = match root {
        "." if !path.starts_with('/') && !path.starts_with("../") => Some(path),
        "." => None,
        "/" => path.strip_prefix('/'),
        _ => path.strip_prefix(root).and_then(|rest| rest.strip_prefix('/')),
    }?;
    (!rel.is_empty()).then(|| rel.to_string())
}

/// Open a file and run the extraction function over it.
fn read_dependencies<F, E>(
    source: &SourceFile<'_>,
    extract: &F,
) -> std::result::Result<Vec<String>, FileFailure>
where
    F: Fn(&SourceFile<'_>, &mut dyn BufRead) -> std::result::Result<Vec<String>, E>,
    E: Display,
{
    let file = File::open(source.path).map_err(|e| FileFailure::Open(e.to_string()))?;
    let mut reader = BufReader::new(file);
    extract(source, &mut reader).map_err(|e| FileFailure::Extract(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use std::fs;
    use tempfile::TempDir;

    fn corpus(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn stem(path: &str) -> Option<String> {
        Path::new(path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
    }

    fn arrow_lines(_: &SourceFile<'_>, reader: &mut dyn BufRead) -> std::io::Result<Vec<String>> {
        let mut deps = Vec::new();
        for line in reader.lines() {
            if let Some(target) = line?.strip_prefix("->") {
                deps.push(target.trim().to_string());
            }
        }
        Ok(deps)
    }

    #[test]
    fn test_strip_root() {
        assert_eq!(strip_root("a/b", "a/b/c.txt").as_deref(), Some("c.txt"));
        assert_eq!(strip_root("a/b", "a/bc/d.txt"), None);
        assert_eq!(strip_root(".", "c.txt").as_deref(), Some("c.txt"));
        assert_eq!(strip_root(".", "/abs/c.txt"), None);
        assert_eq!(strip_root("/", "/abs/c.txt").as_deref(), Some("abs/c.txt"));
        assert_eq!(strip_root("a", "a"), None);
    }

    #[test]
    fn test_index_twice_is_idempotent() {
        let dir = corpus(&[("a.txt", ""), ("b.txt", "")]);
        let mut walker = Walker::new().with_sink(Arc::new(MemorySink::new()));

        let first = walker.index(dir.path(), &["*.txt"], stem).unwrap();
        assert_eq!(first.indexed, 2);
        assert_eq!(first.new_vertices, 2);

        let second = walker
            .index(dir.path(), &["*.txt"], |_| Some("renamed".to_string()))
            .unwrap();
        assert_eq!(second.indexed, 0);
        assert_eq!(second.already_indexed, 2);

        assert_eq!(walker.graph().vertex_count(), 2);
        assert_eq!(walker.resolver().len(), 2);
        assert!(!walker.graph().has_vertex("renamed"));
    }

    #[test]
    fn test_index_excludes_declined_files() {
        let dir = corpus(&[("keep.txt", ""), ("skip.txt", ""), ("empty.txt", "")]);
        let mut walker = Walker::new();

        let summary = walker
            .index(dir.path(), &["*.txt"], |path| match path {
                "keep.txt" => Some("keep".to_string()),
                "empty.txt" => Some(String::new()),
                _ => None,
            })
            .unwrap();

        assert_eq!(summary.indexed, 1);
        assert_eq!(summary.excluded, 2);
        assert_eq!(walker.graph().vertex_count(), 1);
        assert!(walker.resolve(&dir.path().join("skip.txt").to_string_lossy()).is_none());
    }

    #[test]
    fn test_many_files_one_vertex() {
        let dir = corpus(&[
            ("lib/a.txt", "-> app\n"),
            ("lib/b.txt", "-> util\n"),
            ("app/main.txt", ""),
            ("util/u.txt", ""),
        ]);
        let mut walker = Walker::new();
        walker
            .index(dir.path(), &["**/*.txt"], |path| {
                path.split('/').next().map(str::to_string)
            })
            .unwrap();
        let summary = walker.parse(dir.path(), &["**/*.txt"], arrow_lines).unwrap();

        assert_eq!(walker.graph().vertex_count(), 3);
        assert!(walker.graph().has_edge("lib", "app"));
        assert!(walker.graph().has_edge("lib", "util"));
        assert_eq!(summary.files_parsed, 4);
        assert_eq!(summary.edges.added, 2);
    }

    #[test]
    fn test_duplicate_dependencies_absorbed() {
        let dir = corpus(&[("a.txt", "-> b\n-> b\n"), ("b.txt", "")]);
        let mut walker = Walker::new();
        walker.index(dir.path(), &["*.txt"], stem).unwrap();
        let summary = walker.parse(dir.path(), &["*.txt"], arrow_lines).unwrap();

        assert_eq!(walker.graph().edge_count(), 1);
        assert_eq!(summary.edges.added, 1);
        assert_eq!(summary.edges.duplicates, 1);
    }

    #[test]
    fn test_self_dependency_is_silent() {
        let dir = corpus(&[("a.txt", "-> a\n")]);
        let sink = Arc::new(MemorySink::new());
        let mut walker = Walker::new().with_sink(sink.clone());
        walker.index(dir.path(), &["*.txt"], stem).unwrap();
        let summary = walker.parse(dir.path(), &["*.txt"], arrow_lines).unwrap();

        assert!(!walker.graph().has_edge("a", "a"));
        assert_eq!(summary.edges.cycles, 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_parse_only_touches_indexed_files() {
        let dir = corpus(&[("a.txt", "-> b\n"), ("b.txt", ""), ("notes.md", "-> a\n")]);
        let mut walker = Walker::new();
        walker.index(dir.path(), &["*.txt"], stem).unwrap();
        let summary = walker.parse(dir.path(), &["*"], arrow_lines).unwrap();

        assert_eq!(summary.files_parsed, 2);
        assert_eq!(walker.graph().edge_count(), 1);
    }

    #[test]
    fn test_extraction_failure_is_reported_and_skipped() {
        let dir = corpus(&[("a.txt", "-> b\n"), ("b.txt", "-> c\n"), ("c.txt", "")]);
        let sink = Arc::new(MemorySink::new());
        let mut walker = Walker::new().with_sink(sink.clone());
        walker.index(dir.path(), &["*.txt"], stem).unwrap();

        let summary = walker
            .parse(dir.path(), &["*.txt"], |file, reader| {
                if file.relative_path == "a.txt" {
                    return Err("malformed".to_string());
                }
                arrow_lines(file, reader).map_err(|e| e.to_string())
            })
            .unwrap();

        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.files_parsed, 2);
        assert!(!walker.graph().has_edge("a", "b"));
        assert!(walker.graph().has_edge("b", "c"));

        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            &diagnostics[0],
            Diagnostic::ExtractFailed { message, .. } if message == "malformed"
        ));
    }

    #[test]
    fn test_open_failure_is_reported() {
        let dir = corpus(&[("a.txt", "-> b\n"), ("b.txt", "")]);
        let sink = Arc::new(MemorySink::new());
        let mut walker = Walker::new().with_sink(sink.clone());
        walker.index(dir.path(), &["*.txt"], stem).unwrap();
        fs::remove_file(dir.path().join("b.txt")).unwrap();

        let summary = walker.parse(dir.path(), &["*.txt"], arrow_lines).unwrap();

        assert_eq!(summary.failed_files, 1);
        assert!(walker.graph().has_edge("a", "b"));
        assert!(matches!(
            &sink.diagnostics()[0],
            Diagnostic::OpenFailed { path, .. } if path.ends_with("b.txt")
        ));
    }

    #[test]
    fn test_add_dependencies_directly() {
        let mut walker = Walker::new().with_sink(Arc::new(MemorySink::new()));
        for v in ["a", "b", "c"] {
            walker.graph_mut().add_vertex(v);
        }

        let stats = walker.add_dependencies("manual", "a", &["b", "c", "missing"]);
        assert_eq!(stats.added, 2);
        assert_eq!(stats.unknown_targets, 1);

        let stats = walker.add_dependencies("manual", "c", &["a"]);
        assert_eq!(stats.cycles, 1);
        assert!(!walker.graph().has_edge("c", "a"));
    }

    #[test]
    fn test_thread_option_respected() {
        let dir = corpus(&[("a.txt", "-> b\n"), ("b.txt", "")]);
        let options = WalkOptions {
            threads: Some(2),
            ..Default::default()
        };
        let mut walker = Walker::new().with_options(options);
        walker.index(dir.path(), &["*.txt"], stem).unwrap();

        let seen = std::sync::Mutex::new(Vec::new());
        walker
            .parse(dir.path(), &["*.txt"], |file, reader| {
                seen.lock().unwrap().push(rayon::current_num_threads());
                arrow_lines(file, reader)
            })
            .unwrap();

        assert!(walker.graph().has_edge("a", "b"));
        assert_eq!(seen.into_inner().unwrap(), vec![2, 2]);
    }

    #[test]
    fn test_thread_pool_built_once() {
        let dir = corpus(&[("a.txt", ""), ("b.txt", "")]);
        let options = WalkOptions {
            threads: Some(2),
            ..Default::default()
        };
        let mut walker = Walker::new().with_options(options.clone());
        walker.index(dir.path(), &["a.txt"], stem).unwrap();
        let first: *const rayon::ThreadPool = walker.thread_pool().unwrap().unwrap();
        walker.index(dir.path(), &["b.txt"], stem).unwrap();
        walker.parse(dir.path(), &["*.txt"], arrow_lines).unwrap();
        let second: *const rayon::ThreadPool = walker.thread_pool().unwrap().unwrap();
        assert!(std::ptr::eq(first, second));

        let walker = walker.with_options(WalkOptions::default());
        assert!(walker.thread_pool().unwrap().is_none());
        let walker = walker.with_options(options);
        assert_eq!(walker.thread_pool().unwrap().unwrap().current_num_threads(), 2);
    }

    #[test]
    fn test_cancelled_walk() {
        let dir = corpus(&[("a.txt", "")]);
        let flag = Arc::new(AtomicBool::new(true));
        let mut walker = Walker::new().with_cancel_flag(flag);
        let result = walker.index(dir.path(), &["*.txt"], stem);
        assert!(matches!(result, Err(WalkError::Cancelled)));
        assert!(walker.graph().is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_arguments() {
        let dir = corpus(&[("a.txt", "")]);
        let mut walker = Walker::new();
        let none: [&str; 0] = [];
        assert!(matches!(
            walker.parse(dir.path(), &none, arrow_lines),
            Err(WalkError::NoPatterns)
        ));
        assert!(matches!(
            walker.parse(dir.path().join("missing"), &["*"], arrow_lines),
            Err(WalkError::RootNotFound { .. })
        ));
    }
}
