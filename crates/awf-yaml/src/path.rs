//! Locator path syntax: `a.b[0].c`, optionally prefixed with `$.`.

use crate::{Error, Result};
use std::fmt;

/// One step of a path: a mapping key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index { raw: String, index: usize },
}

impl PathSegment {
    pub fn key(key: impl Into<String>) -> Self {
        PathSegment::Key(key.into())
    }

    pub fn index(index: usize) -> Self {
        PathSegment::Index {
            raw: index.to_string(),
            index,
        }
    }

    /// The segment text as written.
    pub fn raw(&self) -> &str {
        match self {
            PathSegment::Key(key) => key,
            PathSegment::Index { raw, .. } => raw,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index { raw, .. } => write!(f, "[{}]", raw),
        }
    }
}

/// Parse a locator path into segments.
///
/// `$` on its own addresses the document root and yields no segments.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>> {
    let invalid = |reason: &str| Error::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(invalid("path is empty"));
    }
    if trimmed == "$" {
        return Ok(Vec::new());
    }
    let body = trimmed.strip_prefix("$.").unwrap_or(trimmed);
    if body.is_empty() {
        return Err(invalid("path is empty"));
    }

    let mut segments = Vec::new();
    for part in body.split('.') {
        if part.is_empty() {
            return Err(invalid("empty path segment"));
        }
        let (name, mut rest) = match part.find('[') {
            Some(pos) => part.split_at(pos),
            None => (part, ""),
        };
        if !name.is_empty() {
            segments.push(PathSegment::Key(name.to_string()));
        }
        while !rest.is_empty() {
            let close = rest
                .find(']')
                .ok_or_else(|| invalid("unclosed '[' in path"))?;
            let raw = rest[1..close].trim();
            let index = raw
                .parse::<usize>()
                .map_err(|_| invalid(&format!("'{}' is not a valid index", raw)))?;
            segments.push(PathSegment::Index {
                raw: raw.to_string(),
                index,
            });
            rest = &rest[close + 1..];
            if !rest.is_empty() && !rest.starts_with('[') {
                return Err(invalid("unexpected text after ']'"));
            }
        }
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_keys() {
        assert_eq!(
            parse_path("tools.github").unwrap(),
            vec![PathSegment::key("tools"), PathSegment::key("github")]
        );
    }

    #[test]
    fn test_leading_dollar_and_indices() {
        assert_eq!(
            parse_path("$.steps[0].with[12]").unwrap(),
            vec![
                PathSegment::key("steps"),
                PathSegment::index(0),
                PathSegment::key("with"),
                PathSegment::index(12),
            ]
        );
    }

    #[test]
    fn test_leading_index_and_chained_indices() {
        assert_eq!(
            parse_path("[1][2]").unwrap(),
            vec![PathSegment::index(1), PathSegment::index(2)]
        );
    }

    #[test]
    fn test_root_path() {
        assert!(parse_path("$").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_paths() {
        assert!(matches!(parse_path(""), Err(Error::InvalidPath { .. })));
        assert!(matches!(parse_path("a..b"), Err(Error::InvalidPath { .. })));
        assert!(matches!(parse_path("a[x]"), Err(Error::InvalidPath { .. })));
        assert!(matches!(parse_path("a[-1]"), Err(Error::InvalidPath { .. })));
        assert!(matches!(parse_path("a[0"), Err(Error::InvalidPath { .. })));
        assert!(matches!(parse_path("a[0]b"), Err(Error::InvalidPath { .. })));
    }

    #[test]
    fn test_display() {
        assert_eq!(PathSegment::key("on").to_string(), "on");
        assert_eq!(PathSegment::index(3).to_string(), "[3]");
    }
}
