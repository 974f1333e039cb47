//! Error types for schema validation.

use crate::location::JsonPathLocation;
use crate::schema::SchemaKind;
use awf_error_reporting::{CompilerDiagnostic, DiagnosticFormatter, PlainFormatter};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchemaError>;

/// One cause reported by the schema engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationCause {
    /// Pointer segments, unescaped.
    pub instance_path: Vec<String>,

    /// The pointer as reported (`/tools/github`).
    pub pointer: String,

    pub message: String,
}

/// A schema violation with its best-known location.
#[derive(Debug, Clone)]
pub struct SchemaViolation {
    pub schema: SchemaKind,

    /// Pointer of the first cause.
    pub pointer: String,

    /// Cleaned, user-facing message.
    pub message: String,

    pub causes: Vec<ValidationCause>,

    /// Resolved position in the frontmatter text, when a file was given.
    pub location: Option<JsonPathLocation>,

    /// Rendered-ready diagnostic, when a file was given and could be read.
    pub diagnostic: Option<CompilerDiagnostic>,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.diagnostic {
            Some(diagnostic) => write!(f, "{}", PlainFormatter.format(diagnostic).trim_end()),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Errors produced by validation.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{0}")]
    Violation(Box<SchemaViolation>),

    /// A domain rule the schema cannot express was violated.
    #[error("{0}")]
    EngineRule(String),

    #[error("failed to normalize configuration: {0}")]
    Normalize(#[from] serde_json::Error),

    #[error("failed to compile embedded schema '{schema}': {reason}")]
    Compile { schema: &'static str, reason: String },
}

impl SchemaError {
    pub fn violation(&self) -> Option<&SchemaViolation> {
        match self {
            SchemaError::Violation(violation) => Some(violation),
            _ => None,
        }
    }
}
