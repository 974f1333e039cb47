//! Splitting a document into frontmatter and markdown body.

use crate::error::{FrontmatterError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

/// A document split at its frontmatter fences.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrontmatterResult {
    /// The parsed frontmatter; empty when the document has none.
    pub frontmatter: Map<String, Value>,
    /// Everything after the closing fence, trimmed.
    pub markdown: String,
    /// The raw lines strictly between the fences.
    pub frontmatter_lines: Vec<String>,
    /// 1-based file line of the first frontmatter content line.
    pub frontmatter_start: usize,
}

impl FrontmatterResult {
    /// Whether the document carried a frontmatter block.
    pub fn has_frontmatter(&self) -> bool {
        self.frontmatter_start > 0
    }

    /// The raw frontmatter text.
    pub fn frontmatter_text(&self) -> String {
        self.frontmatter_lines.join("\n")
    }

    /// Convert a frontmatter-relative line to a file line.
    pub fn file_line(&self, frontmatter_line: usize) -> usize {
        frontmatter_line + self.frontmatter_start.max(1) - 1
    }
}

/// Split `content` into frontmatter and markdown body.
///
/// A document whose first line is not `---` has no frontmatter; the whole
/// text becomes the body. An empty frontmatter block yields an empty map.
///
/// ```
/// use awf_frontmatter::extract_frontmatter_from_content;
///
/// let result = extract_frontmatter_from_content("---\non: push\n---\n\n# Triage\n").unwrap();
/// assert_eq!(result.frontmatter["on"], "push");
/// assert_eq!(result.markdown, "# Triage");
/// assert_eq!(result.frontmatter_start, 2);
/// ```
///
/// # Errors
///
/// [`FrontmatterError::Unclosed`] when the closing fence is missing,
/// [`FrontmatterError::Yaml`] for invalid YAML and
/// [`FrontmatterError::NotAMapping`] for a scalar or sequence block.
pub fn extract_frontmatter_from_content(content: &str) -> Result<FrontmatterResult> {
    let content = content.replace("\r\n", "\n");
    let lines: Vec<&str> = content.split('\n').collect();

    if lines.first() != Some(&"---") {
        return Ok(FrontmatterResult {
            markdown: content,
            ..FrontmatterResult::default()
        });
    }

    let close = lines
        .iter()
        .skip(1)
        .position(|line| *line == "---")
        .map(|i| i + 1)
        .ok_or(FrontmatterError::Unclosed { open_line: 1 })?;

    let frontmatter_lines: Vec<String> = lines[1..close].iter().map(|line| line.to_string()).collect();
    let frontmatter_start = 2;
    let frontmatter = parse_mapping(&frontmatter_lines.join("\n"), frontmatter_start)?;
    let markdown = lines[close + 1..].join("\n").trim().to_string();

    debug!(keys = frontmatter.len(), lines = frontmatter_lines.len(), "extracted frontmatter");
    Ok(FrontmatterResult {
        frontmatter,
        markdown,
        frontmatter_lines,
        frontmatter_start,
    })
}

/// Read `path` and split it with [`extract_frontmatter_from_content`].
pub fn extract_frontmatter_from_file(path: &Path) -> Result<FrontmatterResult> {
    let content = std::fs::read_to_string(path).map_err(|source| FrontmatterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    extract_frontmatter_from_content(&content)
}

/// The markdown body of `content`, without its frontmatter.
pub fn extract_markdown_body(content: &str) -> Result<String> {
    Ok(extract_frontmatter_from_content(content)?.markdown)
}

fn parse_mapping(yaml: &str, start_line: usize) -> Result<Map<String, Value>> {
    let document = match awf_yaml::parse(yaml) {
        Ok(document) => document,
        Err(awf_yaml::Error::EmptyInput) => return Ok(Map::new()),
        Err(awf_yaml::Error::Parse { message, line, column }) => {
            return Err(FrontmatterError::Yaml {
                message,
                line: line + start_line - 1,
                column,
            });
        }
        Err(other) => {
            return Err(FrontmatterError::Yaml {
                message: other.to_string(),
                line: start_line,
                column: 1,
            });
        }
    };

    match document.root().to_json() {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(FrontmatterError::NotAMapping {
            found: document.root().kind_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_frontmatter() {
        let result = extract_frontmatter_from_content("# Title\n\nBody\n").unwrap();
        assert!(result.frontmatter.is_empty());
        assert_eq!(result.markdown, "# Title\n\nBody\n");
        assert!(!result.has_frontmatter());
    }

    #[test]
    fn test_fence_must_be_first_line() {
        let result = extract_frontmatter_from_content("\n---\non: push\n---\n").unwrap();
        assert!(result.frontmatter.is_empty());
    }

    #[test]
    fn test_frontmatter_and_body() {
        let content = "---\non:\n  issues:\n    types: [opened]\ntimeout_minutes: 10\n---\n\n# Triage\n\nLabel it.\n";
        let result = extract_frontmatter_from_content(content).unwrap();
        assert_eq!(Value::Object(result.frontmatter.clone()), json!({
            "on": {"issues": {"types": ["opened"]}},
            "timeout_minutes": 10
        }));
        assert_eq!(result.markdown, "# Triage\n\nLabel it.");
        assert_eq!(result.frontmatter_lines.len(), 4);
        assert_eq!(result.frontmatter_start, 2);
        assert_eq!(result.file_line(4), 5);
    }

    #[test]
    fn test_crlf_normalized() {
        let result = extract_frontmatter_from_content("---\r\nname: x\r\n---\r\nBody\r\n").unwrap();
        assert_eq!(result.frontmatter["name"], "x");
        assert_eq!(result.markdown, "Body");
        assert_eq!(result.frontmatter_lines, vec!["name: x"]);
    }

    #[test]
    fn test_empty_frontmatter() {
        let result = extract_frontmatter_from_content("---\n---\nBody").unwrap();
        assert!(result.frontmatter.is_empty());
        assert!(result.has_frontmatter());

        let result = extract_frontmatter_from_content("---\n# just a comment\n---\nBody").unwrap();
        assert!(result.frontmatter.is_empty());
    }

    #[test]
    fn test_indented_rule_in_block_scalar_is_not_a_fence() {
        let content = "---\ndescription: |\n  intro\n  ---\n  more\n---\nBody\n";
        let result = extract_frontmatter_from_content(content).unwrap();
        assert_eq!(result.frontmatter["description"], "intro\n---\nmore\n");
        assert_eq!(result.markdown, "Body");
    }

    #[test]
    fn test_indented_fence_does_not_open_frontmatter() {
        let result = extract_frontmatter_from_content(" ---\nname: x\n ---\nBody").unwrap();
        assert!(!result.has_frontmatter());
        assert_eq!(result.markdown, " ---\nname: x\n ---\nBody");
    }

    #[test]
    fn test_unclosed() {
        let err = extract_frontmatter_from_content("---\non: push\n# Title\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Unclosed { open_line: 1 }));
    }

    #[test]
    fn test_yaml_error_line_is_file_absolute() {
        let err = extract_frontmatter_from_content("---\non: push\ntools: [a\n---\n").unwrap_err();
        match err {
            FrontmatterError::Yaml { line, .. } => assert!(line >= 3, "line {line}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scalar_frontmatter_is_rejected() {
        let err = extract_frontmatter_from_content("---\njust text\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::NotAMapping { found: "scalar" }));
    }

    #[test]
    fn test_extract_markdown_body() {
        assert_eq!(extract_markdown_body("---\na: 1\n---\n  Body  \n").unwrap(), "Body");
    }
}
