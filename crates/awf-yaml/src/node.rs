//! YAML nodes with source span tracking.

use crate::span::{Position, SourceSpan};
use crate::{Error, PathSegment, Result};
use yaml_rust2::Yaml;

/// How a scalar was written in the source.
///
/// The style decides span arithmetic: flow scalars stay on one line, literal
/// blocks keep their line breaks, folded blocks lose them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    /// `|` block scalar
    Literal,
    /// `>` block scalar
    Folded,
}

/// A scalar leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarNode {
    /// The value resolved with the YAML 1.2 core schema.
    pub value: Yaml,

    /// The decoded scalar text as produced by the scanner.
    pub raw: String,

    pub style: ScalarStyle,
}

/// The closed set of node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Scalar(ScalarNode),
    Mapping(Vec<YamlHashEntry>),
    Sequence(Vec<YamlNode>),
}

/// A YAML node and the source region it occupies.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlNode {
    pub kind: NodeKind,

    /// Source span, computed once when the node is built.
    pub span: SourceSpan,

    /// Tag suffix (e.g. `str` for `!!str`), if the node carried one.
    pub tag: Option<String>,
}

/// A key-value pair in a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlHashEntry {
    pub key: YamlNode,
    pub value: YamlNode,
}

/// A parsed YAML document. Owns its root node; never mutated after parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlDocument {
    root: YamlNode,
}

impl YamlDocument {
    pub(crate) fn new(root: YamlNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &YamlNode {
        &self.root
    }

    /// Span of the whole document (the root node's span).
    pub fn span(&self) -> SourceSpan {
        self.root.span
    }

    pub fn into_root(self) -> YamlNode {
        self.root
    }
}

impl YamlNode {
    /// Build a scalar node. `width` is the number of source characters the
    /// token occupies on its first line.
    pub fn new_scalar(scalar: ScalarNode, start: Position, width: usize, tag: Option<String>) -> Self {
        let span = match scalar.style {
            ScalarStyle::Plain | ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted => {
                let end_column = start.column + width.saturating_sub(1);
                SourceSpan::new(start.line, start.column, start.line, end_column)
            }
            ScalarStyle::Literal => {
                let content = scalar.raw.trim_end_matches('\n');
                if content.is_empty() {
                    SourceSpan::point(start)
                } else {
                    let lines: Vec<&str> = content.split('\n').collect();
                    let last_len = lines.last().map_or(0, |l| l.chars().count());
                    SourceSpan::new(
                        start.line,
                        start.column,
                        start.line + lines.len() - 1,
                        last_len.max(1),
                    )
                }
            }
            // Folding discards the line structure, so only the start is known.
            ScalarStyle::Folded => SourceSpan::point(start),
        };
        Self {
            kind: NodeKind::Scalar(scalar),
            span,
            tag,
        }
    }

    pub fn new_mapping(entries: Vec<YamlHashEntry>, start: Position, tag: Option<String>) -> Self {
        let span = match entries.last() {
            Some(entry) if entry.value.is_empty_scalar() => SourceSpan::through(start, &entry.key.span),
            Some(entry) => SourceSpan::through(start, &entry.value.span),
            None => SourceSpan::point(start),
        };
        Self {
            kind: NodeKind::Mapping(entries),
            span,
            tag,
        }
    }

    pub fn new_sequence(items: Vec<YamlNode>, start: Position, tag: Option<String>) -> Self {
        let span = match items.last() {
            Some(item) => SourceSpan::through(start, &item.span),
            None => SourceSpan::point(start),
        };
        Self {
            kind: NodeKind::Sequence(items),
            span,
            tag,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.kind, NodeKind::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, NodeKind::Sequence(_))
    }

    /// A plain scalar with no text, e.g. the value of `key:` on its own line.
    pub fn is_empty_scalar(&self) -> bool {
        match &self.kind {
            NodeKind::Scalar(s) => s.style == ScalarStyle::Plain && s.raw.is_empty(),
            _ => false,
        }
    }

    /// Human-readable kind name, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Scalar(_) => "scalar",
            NodeKind::Mapping(_) => "mapping",
            NodeKind::Sequence(_) => "sequence",
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarNode> {
        match &self.kind {
            NodeKind::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// The scalar's text, whatever type it resolved to.
    pub fn scalar_text(&self) -> Option<&str> {
        self.as_scalar().map(|s| s.raw.as_str())
    }

    pub fn as_mapping(&self) -> Option<&[YamlHashEntry]> {
        match &self.kind {
            NodeKind::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[YamlNode]> {
        match &self.kind {
            NodeKind::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a mapping value by key text.
    pub fn get(&self, key: &str) -> Option<&YamlNode> {
        self.as_mapping()?
            .iter()
            .find(|entry| entry.key.scalar_text() == Some(key))
            .map(|entry| &entry.value)
    }

    /// Get a sequence item by index.
    pub fn get_index(&self, index: usize) -> Option<&YamlNode> {
        self.as_sequence()?.get(index)
    }

    /// Number of children (mapping entries or sequence items).
    pub fn len(&self) -> usize {
        match &self.kind {
            NodeKind::Scalar(_) => 0,
            NodeKind::Mapping(entries) => entries.len(),
            NodeKind::Sequence(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Follow `segments` from this node, failing on the first step that does
    /// not resolve. `path` is only used for error messages.
    pub fn resolve(&self, segments: &[PathSegment], path: &str) -> Result<&YamlNode> {
        let mut current = self;
        for segment in segments {
            current = match (segment, &current.kind) {
                (PathSegment::Key(key), NodeKind::Mapping(entries)) => entries
                    .iter()
                    .find(|entry| entry.key.scalar_text() == Some(key.as_str()))
                    .map(|entry| &entry.value)
                    .ok_or_else(|| Error::NotFound {
                        key: key.clone(),
                        path: path.to_string(),
                    })?,
                (PathSegment::Index { index, .. }, NodeKind::Sequence(items)) => {
                    items.get(*index).ok_or_else(|| Error::Range {
                        index: *index,
                        len: items.len(),
                        path: path.to_string(),
                    })?
                }
                (segment, _) => {
                    return Err(Error::TypeMismatch {
                        segment: segment.to_string(),
                        found: current.kind_name(),
                        path: path.to_string(),
                    });
                }
            };
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> ScalarNode {
        ScalarNode {
            value: Yaml::String(text.into()),
            raw: text.into(),
            style: ScalarStyle::Plain,
        }
    }

    #[test]
    fn test_plain_scalar_span() {
        let node = YamlNode::new_scalar(plain("hello"), Position::new(2, 5), 5, None);
        assert_eq!(node.span, SourceSpan::new(2, 5, 2, 9));
    }

    #[test]
    fn test_literal_scalar_spans_content_lines() {
        let scalar = ScalarNode {
            value: Yaml::String("L1\nlonger\n".into()),
            raw: "L1\nlonger\n".into(),
            style: ScalarStyle::Literal,
        };
        let node = YamlNode::new_scalar(scalar, Position::new(1, 14), 1, None);
        assert_eq!(node.span, SourceSpan::new(1, 14, 2, 6));
    }

    #[test]
    fn test_folded_scalar_collapses_to_start() {
        let scalar = ScalarNode {
            value: Yaml::String("L1 L2\n".into()),
            raw: "L1 L2\n".into(),
            style: ScalarStyle::Folded,
        };
        let node = YamlNode::new_scalar(scalar, Position::new(1, 14), 1, None);
        assert_eq!(node.span, SourceSpan::new(1, 14, 1, 14));
    }

    #[test]
    fn test_empty_containers_span_opening_token() {
        let map = YamlNode::new_mapping(Vec::new(), Position::new(3, 4), None);
        assert_eq!(map.span, SourceSpan::new(3, 4, 3, 4));
        let seq = YamlNode::new_sequence(Vec::new(), Position::new(5, 1), None);
        assert_eq!(seq.span, SourceSpan::new(5, 1, 5, 1));
    }

    #[test]
    fn test_sequence_spans_through_last_item() {
        let a = YamlNode::new_scalar(plain("a"), Position::new(1, 3), 1, None);
        let b = YamlNode::new_scalar(plain("bcd"), Position::new(2, 3), 3, None);
        let seq = YamlNode::new_sequence(vec![a, b], Position::new(1, 1), None);
        assert_eq!(seq.span, SourceSpan::new(1, 1, 2, 5));
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.get_index(1).and_then(|n| n.scalar_text()), Some("bcd"));
    }
}
