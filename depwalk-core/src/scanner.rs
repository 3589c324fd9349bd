//! File discovery using the `ignore` crate.
//!
//! Enumerates regular files below a root directory and keeps those whose
//! root-relative path matches at least one glob pattern. Patterns are
//! path-aware: `*` and `?` never cross a `/`, while `**` spans any number
//! of directories.
//!
//! Ignore files (`.gitignore`, `.ignore`) are not consulted unless
//! [`WalkOptions::respect_ignore_files`] is set, so a scan behaves like
//! plain globbing by default.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use crate::error::{Result, WalkError};

/// Options controlling directory traversal and the worker pool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkOptions {
    /// Honor `.gitignore`, `.ignore` and global git excludes.
    pub respect_ignore_files: bool,

    /// Visit hidden files and directories (names starting with `.`).
    pub include_hidden: bool,

    /// Follow symbolic links.
    pub follow_links: bool,

    /// Number of worker threads (defaults to number of CPUs).
    pub threads: Option<usize>,
}

/// Result of scanning a directory.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScanResult {
    /// Matching root-relative paths, `/`-separated and sorted.
    pub files: Vec<String>,

    /// Number of files that matched no pattern.
    pub skipped_count: usize,

    /// Number of directory entries that could not be read.
    pub error_count: usize,

    /// Time taken for the scan in milliseconds.
    pub duration_ms: f64,
}

impl ScanResult {
    /// Get the number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Compile path patterns into a single matcher.
///
/// Fails with [`WalkError::NoPatterns`] on an empty list and
/// [`WalkError::InvalidPattern`] on a malformed glob.
pub fn build_globset<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    if patterns.is_empty() {
        return Err(WalkError::NoPatterns);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let glob = GlobBuilder::new(&pattern.replace('\\', "/"))
            .literal_separator(true)
            .build()
            .map_err(|e| WalkError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.kind().to_string(),
            })?;
        builder.add(glob);
    }

    builder.build().map_err(|e| WalkError::InvalidPattern {
        pattern: patterns
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join(", "),
        message: e.to_string(),
    })
}

/// Check that `root` is an existing directory.
pub fn ensure_root(root: &Path) -> Result<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(WalkError::RootNotFound {
            path: root.display().to_string(),
        })
    }
}

/// Convert a path below `root` to a `/`-separated relative string.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Scan `root` for files matching any of `patterns`.
///
/// # Arguments
///
/// * `root` - Root directory to scan
/// * `patterns` - Glob patterns relative to `root` (e.g. `boost/*/**/*.hpp`)
/// * `options` - Traversal options
///
/// # Returns
///
/// ScanResult containing matching files and statistics.
pub fn scan<S: AsRef<str>>(root: &Path, patterns: &[S], options: &WalkOptions) -> Result<ScanResult> {
    let start = Instant::now();
    ensure_root(root)?;
    let matcher = build_globset(patterns)?;

    let respect = options.respect_ignore_files;
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(!options.include_hidden)
        .git_ignore(respect)
        .git_global(respect)
        .git_exclude(respect)
        .ignore(respect)
        .parents(respect)
        .follow_links(options.follow_links);

    let mut error_count = 0;
    let mut candidates = Vec::new();
    for entry in builder.build() {
        match entry {
            Ok(entry) if entry.file_type().is_some_and(|ft| ft.is_file()) => {
                candidates.push(entry.into_path());
            }
            Ok(_) => {}
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                error_count += 1;
            }
        }
    }

    let total = candidates.len();
    let mut files: Vec<String> = candidates
        .par_iter()
        .filter_map(|path| relative_path(root, path))
        .filter(|rel| matcher.is_match(rel))
        .collect();
    files.sort_unstable();

    Ok(ScanResult {
        skipped_count: total - files.len(),
        files,
        error_count,
        duration_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}
