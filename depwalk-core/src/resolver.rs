//! Path-to-vertex resolution.
//!
//! The walker records every indexed file under its canonical path. The
//! [`Resolver`] answers "which vertex does this path belong to?" both for
//! the walker itself and for extraction functions translating raw
//! references (an include string, say) into vertex identifiers.

use std::collections::BTreeMap;

/// Canonicalize a path lexically.
///
/// Backslashes become `/`, empty and `.` segments are dropped, and `..`
/// consumes the preceding segment. Leading `..` segments of relative paths
/// are kept; on absolute paths they stop at the root. The filesystem is
/// never consulted, so symlinks are not resolved.
pub fn clean_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            s => parts.push(s),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Join a root directory and a relative reference with `/`.
pub fn join_path(root: &str, relative: &str) -> String {
    if root.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", root.trim_end_matches(['/', '\\']), relative)
    }
}

/// Mapping from canonical file path to vertex identifier.
///
/// One path maps to at most one vertex; many paths may share a vertex.
/// Entries are kept sorted by path so iteration is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    index: BTreeMap<String, String>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path -> vertex`. The first mapping for a path wins.
    ///
    /// Returns `true` if the path was not indexed before.
    pub fn insert(&mut self, path: &str, vertex: &str) -> bool {
        let key = clean_path(path);
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, vertex.to_string());
        true
    }

    /// Check if a path has already been indexed.
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(&clean_path(path))
    }

    /// Map a path to its vertex, if it was indexed.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.index.get(&clean_path(path)).map(String::as_str)
    }

    /// Resolve `basename` against each candidate root in order.
    ///
    /// Returns the vertex of the first `root/basename` that was indexed.
    /// With no roots, `basename` is resolved relative to `./`.
    pub fn try_resolve(&self, basename: &str, roots: &[&str]) -> Option<&str> {
        if roots.is_empty() {
            return self.resolve(&join_path("./", basename));
        }
        roots
            .iter()
            .find_map(|root| self.resolve(&join_path(root, basename)))
    }

    /// All indexed paths belonging to `vertex`, in path order.
    pub fn paths_for(&self, vertex: &str) -> Vec<&str> {
        self.index
            .iter()
            .filter(|(_, v)| v.as_str() == vertex)
            .map(|(p, _)| p.as_str())
            .collect()
    }

    /// Iterate `(path, vertex)` entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.index.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// Get the number of indexed paths.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
