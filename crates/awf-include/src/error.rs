//! Error types for include expansion.

use awf_config::MergeError;
use awf_frontmatter::FrontmatterError;
use awf_schema::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IncludeError>;

#[derive(Debug, Error)]
pub enum IncludeError {
    /// A required include names a file that does not exist.
    #[error("failed to resolve required include '{directive}': {} not found", path.display())]
    Resolve { directive: String, path: PathBuf },

    #[error("failed to read included file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid frontmatter in included file {}: {source}", path.display())]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },

    #[error("section '{section}' not found in included file {}", path.display())]
    Section { path: PathBuf, section: String },

    #[error("included file {} failed validation: {source}", path.display())]
    Validation {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    #[error("failed to merge tools from includes: {0}")]
    Merge(#[from] MergeError),
}

impl IncludeError {
    /// The included file the error is about, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            IncludeError::Resolve { path, .. }
            | IncludeError::Read { path, .. }
            | IncludeError::Frontmatter { path, .. }
            | IncludeError::Section { path, .. }
            | IncludeError::Validation { path, .. } => Some(path),
            IncludeError::Merge(_) => None,
        }
    }

    /// Catalog code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            IncludeError::Resolve { .. } | IncludeError::Read { .. } | IncludeError::Section { .. } => "AWF-3-1",
            IncludeError::Frontmatter {
                source: FrontmatterError::Unclosed { .. },
                ..
            } => "AWF-1-2",
            IncludeError::Frontmatter { .. } => "AWF-1-1",
            IncludeError::Validation {
                source: SchemaError::EngineRule(_),
                ..
            } => "AWF-2-2",
            IncludeError::Validation { .. } => "AWF-2-1",
            IncludeError::Merge(MergeError::Conflict { .. }) => "AWF-4-1",
            IncludeError::Merge(_) => "AWF-0-1",
        }
    }
}
