//! Error types for depwalk-core.

use thiserror::Error;

/// Result type alias for walker operations.
pub type Result<T> = std::result::Result<T, WalkError>;

/// Errors raised by graph algorithms.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The operation requires an acyclic graph.
    #[error("Cycle detected at vertex '{vertex}'")]
    CycleDetected {
        /// A vertex that lies on a cycle.
        vertex: String,
    },
}

/// Errors raised at the walker's call boundary.
///
/// Per-file failures during parsing are not errors; they are reported
/// through the diagnostic sink and the batch continues.
#[derive(Error, Debug)]
pub enum WalkError {
    /// Root directory does not exist or is not a directory.
    #[error("Root directory not found: {path}")]
    RootNotFound {
        /// The offending root.
        path: String,
    },

    /// No glob patterns were supplied.
    #[error("At least one path pattern must be provided")]
    NoPatterns,

    /// A glob pattern failed to compile.
    #[error("Invalid path pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern as given.
        pattern: String,
        /// Description of the problem.
        message: String,
    },

    /// The walk was aborted through the cancellation flag.
    #[error("Walk cancelled")]
    Cancelled,

    /// Worker pool could not be created.
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// IO error while enumerating files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
