//! Error types for YAML parsing and path lookup.

use thiserror::Error;

/// Result type alias for awf-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing YAML or resolving a path in it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The YAML text is empty or contains no document.
    #[error("YAML content is empty")]
    EmptyInput,

    /// The path expression is empty or malformed.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// YAML syntax error.
    #[error("YAML parse error at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    /// A mapping key along the path does not exist.
    #[error("key '{key}' not found (path '{path}')")]
    NotFound { key: String, path: String },

    /// A path segment addresses a node of the wrong kind.
    #[error("cannot apply segment '{segment}' to a {found} (path '{path}')")]
    TypeMismatch {
        segment: String,
        found: &'static str,
        path: String,
    },

    /// A sequence index is past the end of the sequence.
    #[error("index {index} out of range for sequence of length {len} (path '{path}')")]
    Range {
        index: usize,
        len: usize,
        path: String,
    },
}
