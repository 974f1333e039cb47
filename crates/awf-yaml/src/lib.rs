//! # awf-yaml
//!
//! YAML parsing with source span tracking for workflow frontmatter.
//!
//! This crate parses a YAML document once into a tree of [`YamlNode`]s, each
//! carrying the 1-based [`SourceSpan`] it occupies in the original text, and
//! answers path queries like `tools.github.allowed[0]` against that tree.
//!
//! ## Design
//!
//! Node kinds form a closed enum ([`NodeKind`]) so span arithmetic and path
//! navigation are exhaustive per kind. Spans are computed while the tree is
//! built; the tree is never mutated afterwards, so a [`YamlLocator`] can be
//! shared and queried any number of times without reparsing.
//!
//! ## Example
//!
//! ```rust
//! use awf_yaml::YamlLocator;
//!
//! let locator = YamlLocator::new("on: push\ntools:\n  github:\n    allowed: [a, b]\n").unwrap();
//! let span = locator.locate("tools.github.allowed[1]").unwrap();
//! assert_eq!(span.start_line, 4);
//! ```

mod error;
mod json;
mod locator;
mod node;
mod parser;
mod path;
mod span;

pub use error::{Error, Result};
pub use locator::{YamlLocator, locate};
pub use node::{NodeKind, ScalarNode, ScalarStyle, YamlDocument, YamlHashEntry, YamlNode};
pub use parser::parse;
pub use path::{PathSegment, parse_path};
pub use span::{Position, SourceSpan};
