//! Source positions and spans for YAML nodes.

use serde::{Deserialize, Serialize};

/// A single 1-based line/column position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-based)
    pub line: usize,

    /// Column number (1-based, in characters)
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// An inclusive source region `(start_line, start_column)..=(end_line, end_column)`.
///
/// All fields are 1-based. The all-zero default means "unresolved": lookups
/// that cannot find their target return it instead of failing so callers can
/// fall back to a less precise location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl SourceSpan {
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// A span covering a single position.
    pub fn point(at: Position) -> Self {
        Self::new(at.line, at.column, at.line, at.column)
    }

    /// Span from `start` through the end of `last`.
    pub fn through(start: Position, last: &SourceSpan) -> Self {
        Self::new(start.line, start.column, last.end_line, last.end_column)
    }

    /// Whether this span was resolved to a real location.
    pub fn is_found(&self) -> bool {
        self.start_line >= 1 && self.end_line >= 1
    }

    pub fn start(&self) -> Position {
        Position::new(self.start_line, self.start_column)
    }

    pub fn end(&self) -> Position {
        Position::new(self.end_line, self.end_column)
    }

    /// Whether `pos` falls inside this span (inclusive).
    pub fn contains(&self, pos: Position) -> bool {
        self.start() <= pos && pos <= self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unresolved() {
        let span = SourceSpan::default();
        assert!(!span.is_found());
        assert_eq!(span.start_line, 0);
        assert_eq!(span.end_column, 0);
    }

    #[test]
    fn test_point_span() {
        let span = SourceSpan::point(Position::new(3, 7));
        assert!(span.is_found());
        assert_eq!(span.start(), span.end());
    }

    #[test]
    fn test_contains() {
        let span = SourceSpan::new(2, 3, 4, 1);
        assert!(span.contains(Position::new(3, 80)));
        assert!(span.contains(Position::new(2, 3)));
        assert!(!span.contains(Position::new(2, 2)));
        assert!(!span.contains(Position::new(4, 2)));
    }
}
