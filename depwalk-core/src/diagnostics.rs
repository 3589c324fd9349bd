//! Diagnostic reporting for the walker.
//!
//! Conflicts (unknown targets, cycle-forming edges) and per-file failures
//! are not errors: the walker hands them to an injected [`DiagnosticSink`]
//! and carries on. [`TracingSink`] is the default.

use std::fmt;
use std::sync::Mutex;
use tracing::{error, warn};

/// A non-fatal event raised while walking a corpus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A dependency names a vertex that was never indexed.
    UnknownVertex {
        path: String,
        from: String,
        to: String,
    },

    /// Adding the dependency would close a cycle.
    CyclicDependency {
        path: String,
        from: String,
        to: String,
    },

    /// The file could not be opened.
    OpenFailed { path: String, message: String },

    /// The extraction function failed on the file.
    ExtractFailed { path: String, message: String },
}

impl Diagnostic {
    /// Path of the file that triggered the event.
    pub fn path(&self) -> &str {
        match self {
            Diagnostic::UnknownVertex { path, .. }
            | Diagnostic::CyclicDependency { path, .. }
            | Diagnostic::OpenFailed { path, .. }
            | Diagnostic::ExtractFailed { path, .. } => path,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownVertex { path, to, .. } => {
                write!(f, "In '{}': Dependency target '{}' not listed.", path, to)
            }
            Diagnostic::CyclicDependency { path, from, to } => write!(
                f,
                "In '{}': Cannot add cyclic dependency from '{}' to '{}'.",
                path, from, to
            ),
            Diagnostic::OpenFailed { path, message } => {
                write!(f, "Failed to open '{}': {}", path, message)
            }
            Diagnostic::ExtractFailed { path, message } => {
                write!(f, "Exception raised: '{}' while parsing '{}'", message, path)
            }
        }
    }
}

/// Receiver for walker diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Logs every diagnostic through `tracing`.
///
/// Dependency conflicts are logged at `warn`, file failures at `error`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::UnknownVertex { .. } | Diagnostic::CyclicDependency { .. } => {
                warn!("{}", diagnostic)
            }
            Diagnostic::OpenFailed { .. } | Diagnostic::ExtractFailed { .. } => {
                error!("{}", diagnostic)
            }
        }
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Collects diagnostics in memory for later inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far, in report order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Get the number of collected diagnostics.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, diagnostic: Diagnostic) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(diagnostic);
        }
    }
}
