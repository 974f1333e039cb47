//! Error types for frontmatter extraction.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FrontmatterError>;

#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// An opening `---` fence with no closing fence.
    #[error("frontmatter not properly closed: missing closing '---' after line {open_line}")]
    Unclosed { open_line: usize },

    /// The frontmatter is not valid YAML. `line` is file-absolute.
    #[error("failed to parse frontmatter at line {line}, column {column}: {message}")]
    Yaml {
        message: String,
        line: usize,
        column: usize,
    },

    /// The frontmatter parsed to something other than a mapping.
    #[error("frontmatter must be a mapping, found a {found}")]
    NotAMapping { found: &'static str },

    #[error("section '{section}' not found")]
    SectionNotFound { section: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
