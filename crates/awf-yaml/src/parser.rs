//! YAML parser that builds span-tracked node trees.

use crate::node::{ScalarNode, ScalarStyle, YamlDocument, YamlHashEntry, YamlNode};
use crate::span::Position;
use crate::{Error, Result};
use std::collections::HashMap;
use yaml_rust2::Yaml;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Parse YAML text into a [`YamlDocument`].
///
/// Only the first document of a multi-document stream is loaded.
///
/// # Example
///
/// ```rust
/// use awf_yaml::parse;
///
/// let doc = parse("name: triage").unwrap();
/// assert!(doc.root().is_mapping());
/// ```
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] for blank text or a stream with no
/// document, and [`Error::Parse`] for syntax errors.
pub fn parse(content: &str) -> Result<YamlDocument> {
    if content.trim().is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut parser = Parser::new_from_str(content);
    let mut builder = YamlBuilder::new(content);

    if let Err(err) = parser.load(&mut builder, false) {
        let position = builder.position(err.marker());
        return Err(Error::Parse {
            message: err.info().to_string(),
            line: position.line,
            column: position.column,
        });
    }

    builder.result()
}

/// Builder that implements MarkedEventReceiver to construct the node tree.
struct YamlBuilder<'a> {
    /// Source lines, used to measure quoted scalars
    lines: Vec<&'a str>,

    /// Line number the scanner reports for the first line of input
    line_base: usize,

    /// Stack of containers being constructed
    stack: Vec<BuildNode>,

    /// Anchored nodes by anchor id, for alias resolution
    anchors: HashMap<usize, YamlNode>,

    /// The completed root node
    root: Option<YamlNode>,
}

/// A container being constructed during parsing.
enum BuildNode {
    Sequence {
        start: Position,
        anchor: usize,
        tag: Option<String>,
        items: Vec<YamlNode>,
    },

    Mapping {
        start: Position,
        anchor: usize,
        tag: Option<String>,
        entries: Vec<YamlHashEntry>,
        pending_key: Option<YamlNode>,
    },
}

impl<'a> YamlBuilder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().collect(),
            line_base: 1,
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
        }
    }

    fn result(self) -> Result<YamlDocument> {
        self.root.map(YamlDocument::new).ok_or(Error::EmptyInput)
    }

    fn position(&self, marker: &Marker) -> Position {
        let line = (marker.line() + 1).saturating_sub(self.line_base).max(1);
        Position::new(line, marker.col() + 1)
    }

    fn push_complete(&mut self, node: YamlNode, anchor: usize) {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }

        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
            Some(BuildNode::Sequence { items, .. }) => items.push(node),
            Some(BuildNode::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => entries.push(YamlHashEntry { key, value: node }),
                None => *pending_key = Some(node),
            },
        }
    }

    /// Number of source characters a scalar token occupies on its first line.
    /// Tokens that continue onto later lines are cut at the end of the first.
    fn scalar_width(&self, start: Position, value: &str, style: ScalarStyle) -> usize {
        let width = match style {
            ScalarStyle::Plain => value.chars().count(),
            ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted => self
                .quoted_width(start)
                .unwrap_or_else(|| value.chars().count() + 2),
            ScalarStyle::Literal | ScalarStyle::Folded => 1,
        };
        match self.rest_of_line(start) {
            Some(rest) if rest > 0 => width.min(rest),
            _ => width,
        }
    }

    /// Characters from `start` to the end of its line, inclusive.
    fn rest_of_line(&self, start: Position) -> Option<usize> {
        let line = self.lines.get(start.line.checked_sub(1)?)?;
        Some(line.chars().count().saturating_sub(start.column - 1))
    }

    /// Position of the `|` or `>` header that opens a block scalar whose
    /// content the scanner reports at `content`.
    fn block_indicator(&self, content: Position) -> Option<Position> {
        let last = content.line.min(self.lines.len());
        for line_no in (1..=last).rev() {
            let chars: Vec<char> = self.lines[line_no - 1].chars().collect();
            let end = if line_no == content.line {
                (content.column - 1).min(chars.len())
            } else {
                chars.len()
            };
            for i in (0..end).rev() {
                if (chars[i] == '|' || chars[i] == '>') && is_block_header_tail(&chars[i + 1..]) {
                    return Some(Position::new(line_no, i + 1));
                }
            }
        }
        None
    }

    /// Measure a quoted token from its opening quote to its closing quote.
    /// Returns None when the token does not close on its first line.
    fn quoted_width(&self, start: Position) -> Option<usize> {
        let line = self.lines.get(start.line.checked_sub(1)?)?;
        let chars: Vec<char> = line.chars().skip(start.column - 1).collect();
        let quote = *chars.first()?;
        if quote != '\'' && quote != '"' {
            return None;
        }

        let mut i = 1;
        while i < chars.len() {
            let c = chars[i];
            if quote == '"' && c == '\\' {
                i += 2;
                continue;
            }
            if c == quote {
                if quote == '\'' && chars.get(i + 1) == Some(&'\'') {
                    i += 2;
                    continue;
                }
                return Some(i + 1);
            }
            i += 1;
        }
        None
    }
}

impl MarkedEventReceiver for YamlBuilder<'_> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        match ev {
            Event::StreamStart => {
                self.line_base = marker.line();
            }
            Event::Nothing | Event::StreamEnd | Event::DocumentStart | Event::DocumentEnd => {}

            Event::Scalar(value, style, anchor, tag) => {
                let style = scalar_style(style);
                let tag = tag_suffix(tag);
                let mut start = self.position(&marker);
                if matches!(style, ScalarStyle::Literal | ScalarStyle::Folded) {
                    start = self.block_indicator(start).unwrap_or(start);
                }
                let width = self.scalar_width(start, &value, style);
                let scalar = ScalarNode {
                    value: resolve_scalar(&value, style, tag.as_deref()),
                    raw: value,
                    style,
                };
                let node = YamlNode::new_scalar(scalar, start, width, tag);
                self.push_complete(node, anchor);
            }

            Event::SequenceStart(anchor, tag) => {
                let start = self.position(&marker);
                self.stack.push(BuildNode::Sequence {
                    start,
                    anchor,
                    tag: tag_suffix(tag),
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => {
                if let Some(BuildNode::Sequence {
                    start,
                    anchor,
                    tag,
                    items,
                }) = self.stack.pop()
                {
                    let node = YamlNode::new_sequence(items, start, tag);
                    self.push_complete(node, anchor);
                }
            }

            Event::MappingStart(anchor, tag) => {
                let start = self.position(&marker);
                self.stack.push(BuildNode::Mapping {
                    start,
                    anchor,
                    tag: tag_suffix(tag),
                    entries: Vec::new(),
                    pending_key: None,
                });
            }

            Event::MappingEnd => {
                if let Some(BuildNode::Mapping {
                    start,
                    anchor,
                    tag,
                    entries,
                    ..
                }) = self.stack.pop()
                {
                    let node = YamlNode::new_mapping(entries, start, tag);
                    self.push_complete(node, anchor);
                }
            }

            Event::Alias(anchor) => {
                let node = match self.anchors.get(&anchor) {
                    Some(node) => node.clone(),
                    None => {
                        let scalar = ScalarNode {
                            value: Yaml::Null,
                            raw: String::new(),
                            style: ScalarStyle::Plain,
                        };
                        YamlNode::new_scalar(scalar, self.position(&marker), 0, None)
                    }
                };
                self.push_complete(node, 0);
            }
        }
    }
}

/// What may follow a block scalar indicator on its line: chomping and
/// indentation indicators, then whitespace or a comment.
fn is_block_header_tail(tail: &[char]) -> bool {
    let rest: String = tail
        .iter()
        .skip_while(|c| c.is_ascii_digit() || **c == '+' || **c == '-')
        .collect();
    let rest = rest.trim_start();
    rest.is_empty() || rest.starts_with('#')
}

fn scalar_style(style: TScalarStyle) -> ScalarStyle {
    match style {
        TScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
        TScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
        TScalarStyle::Literal => ScalarStyle::Literal,
        TScalarStyle::Folded => ScalarStyle::Folded,
        _ => ScalarStyle::Plain,
    }
}

fn tag_suffix(tag: Option<Tag>) -> Option<String> {
    tag.map(|t| t.suffix)
}

/// Resolve a scalar with the YAML 1.2 core schema.
///
/// Only plain scalars are typed; quoted and block scalars are strings.
/// Unlike YAML 1.1, `on`/`off`/`yes`/`no` stay strings, which matters for
/// the `on:` trigger key.
fn resolve_scalar(value: &str, style: ScalarStyle, tag: Option<&str>) -> Yaml {
    if style != ScalarStyle::Plain || tag == Some("str") {
        return Yaml::String(value.to_string());
    }

    match value {
        "" | "~" | "null" | "Null" | "NULL" => return Yaml::Null,
        "true" | "True" | "TRUE" => return Yaml::Boolean(true),
        "false" | "False" | "FALSE" => return Yaml::Boolean(false),
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" | "-.inf" | "-.Inf" | "-.INF"
        | ".nan" | ".NaN" | ".NAN" => return Yaml::Real(value.to_string()),
        _ => {}
    }

    if let Some(octal) = value.strip_prefix("0o") {
        if let Ok(i) = i64::from_str_radix(octal, 8) {
            return Yaml::Integer(i);
        }
    }
    if let Some(hex) = value.strip_prefix("0x") {
        if let Ok(i) = i64::from_str_radix(hex, 16) {
            return Yaml::Integer(i);
        }
    }

    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(i) = value.parse::<i64>() {
            return Yaml::Integer(i);
        }
    }

    let looks_numeric = digits.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && digits
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'));
    if looks_numeric && value.parse::<f64>().is_ok() {
        return Yaml::Real(value.to_string());
    }

    Yaml::String(value.to_string())
}
