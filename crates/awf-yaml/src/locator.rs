//! Path-based source location lookup over a parsed document.

use crate::node::{YamlDocument, YamlNode};
use crate::path::parse_path;
use crate::span::SourceSpan;
use crate::{Result, parse};

/// A parsed YAML document that answers repeated path lookups.
///
/// Parsing happens once in [`YamlLocator::new`]; every query walks the same
/// immutable tree, so the locator can be shared freely between callers.
#[derive(Debug, Clone)]
pub struct YamlLocator {
    document: YamlDocument,
}

impl YamlLocator {
    /// Parse `yaml` and keep the tree for later queries.
    pub fn new(yaml: &str) -> Result<Self> {
        Ok(Self {
            document: parse(yaml)?,
        })
    }

    pub fn from_document(document: YamlDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &YamlDocument {
        &self.document
    }

    /// Resolve `path` to the node it addresses.
    pub fn node(&self, path: &str) -> Result<&YamlNode> {
        let segments = parse_path(path)?;
        self.document.root().resolve(&segments, path)
    }

    /// Resolve `path` to the span of the node it addresses.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidPath`, `NotFound`, `TypeMismatch` or `Range`.
    pub fn locate(&self, path: &str) -> Result<SourceSpan> {
        self.node(path).map(|node| node.span)
    }

    /// Like [`locate`](Self::locate), but returns the unresolved (all-zero)
    /// span instead of an error.
    pub fn find_span(&self, path: &str) -> SourceSpan {
        self.locate(path).unwrap_or_default()
    }
}

/// Parse `yaml` and resolve a single `path` in it.
///
/// Use [`YamlLocator`] when looking up more than one path in the same text.
pub fn locate(yaml: &str, path: &str) -> Result<SourceSpan> {
    // Validate the path before paying for the parse.
    parse_path(path)?;
    YamlLocator::new(yaml)?.locate(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const WORKFLOW: &str = "\
on:
  issues:
    types: [opened]
permissions:
  contents: read
tools:
  github:
    allowed:
      - get_issue
      - add_issue_comment
  edit: {}
";

    #[test]
    fn test_locate_nested_key() {
        let locator = YamlLocator::new(WORKFLOW).unwrap();
        let span = locator.locate("permissions.contents").unwrap();
        assert_eq!(span, SourceSpan::new(5, 13, 5, 16));
    }

    #[test]
    fn test_locate_sequence_item() {
        let locator = YamlLocator::new(WORKFLOW).unwrap();
        let span = locator.locate("tools.github.allowed[1]").unwrap();
        assert_eq!(span, SourceSpan::new(10, 9, 10, 25));
    }

    #[test]
    fn test_mapping_spans_to_last_child() {
        let locator = YamlLocator::new(WORKFLOW).unwrap();
        let span = locator.locate("tools.github").unwrap();
        assert_eq!(span.start_line, 8);
        assert_eq!(span.end_line, 10);
        assert_eq!(span.end_column, 25);
    }

    #[test]
    fn test_empty_flow_mapping_spans_opening_token() {
        let locator = YamlLocator::new(WORKFLOW).unwrap();
        let span = locator.locate("tools.edit").unwrap();
        assert_eq!(span, SourceSpan::new(11, 9, 11, 9));
    }

    #[test]
    fn test_leading_dollar() {
        let locator = YamlLocator::new(WORKFLOW).unwrap();
        assert_eq!(
            locator.locate("$.on.issues.types[0]").unwrap(),
            locator.locate("on.issues.types[0]").unwrap()
        );
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let locator = YamlLocator::new(WORKFLOW).unwrap();
        let first = locator.locate("tools.github.allowed").unwrap();
        let second = locator.locate("tools.github.allowed").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_failures() {
        let locator = YamlLocator::new(WORKFLOW).unwrap();
        assert!(matches!(locator.locate("tools.missing"), Err(Error::NotFound { .. })));
        assert!(matches!(
            locator.locate("tools.github.allowed[5]"),
            Err(Error::Range { index: 5, len: 2, .. })
        ));
        assert!(matches!(
            locator.locate("permissions.contents.deep"),
            Err(Error::TypeMismatch { found: "scalar", .. })
        ));
        assert!(matches!(
            locator.locate("tools[0]"),
            Err(Error::TypeMismatch { found: "mapping", .. })
        ));
        assert!(matches!(locator.locate(""), Err(Error::InvalidPath { .. })));
    }

    #[test]
    fn test_find_span_reports_unresolved() {
        let locator = YamlLocator::new(WORKFLOW).unwrap();
        assert!(!locator.find_span("nope").is_found());
        assert!(locator.find_span("tools").is_found());
    }

    #[test]
    fn test_one_shot_locate() {
        assert_eq!(locate("", "a"), Err(Error::EmptyInput));
        assert!(matches!(locate("a: 1", ""), Err(Error::InvalidPath { .. })));
        assert!(matches!(locate("a: [1", "a"), Err(Error::Parse { .. })));
        assert_eq!(locate("a: 1", "a").unwrap(), SourceSpan::new(1, 4, 1, 4));
    }

    #[test]
    fn test_literal_and_folded_block_spans() {
        let literal = locate("description: |\n  L1\n  L2\n", "description").unwrap();
        assert_eq!(literal.start_line, 1);
        assert_eq!(literal.end_line, 2);
        assert_eq!(literal.end_column, 2);

        let folded = locate("description: >\n  L1\n  L2\n", "description").unwrap();
        assert_eq!(folded.start_line, 1);
        assert_eq!(folded.end_line, 1);
        assert_eq!(folded.start_column, folded.end_column);
    }
}
