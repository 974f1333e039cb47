//! Frontmatter bounds in a whole file, for placing diagnostics.

/// Line indices (0-based) of the opening and closing `---` fences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontmatterBounds {
    pub open: usize,
    pub close: usize,
}

impl FrontmatterBounds {
    /// 1-based file line of the first frontmatter content line.
    pub fn start_line(&self) -> usize {
        self.open + 2
    }

    /// The text strictly between the fences.
    pub fn content(&self, lines: &[&str]) -> String {
        lines[self.open + 1..self.close].join("\n")
    }
}

/// Find the frontmatter fences in `lines`.
///
/// Blank lines and comment lines (`#` or `<!--`) may precede the opening
/// fence; any other line before it means there is no frontmatter. Returns
/// `None` when either fence is missing.
pub fn find_frontmatter_bounds(lines: &[&str]) -> Option<FrontmatterBounds> {
    let mut open = None;
    for (i, line) in lines.iter().enumerate() {
        if *line == "---" {
            open = Some(i);
            break;
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('#') && !trimmed.starts_with("<!--") {
            return None;
        }
    }
    let open = open?;

    let close = lines
        .iter()
        .enumerate()
        .skip(open + 1)
        .find(|(_, line)| **line == "---")
        .map(|(i, _)| i)?;

    Some(FrontmatterBounds { open, close })
}

/// Up to `radius` lines either side of 1-based `line`, clamped to
/// `[first, last]` (1-based, inclusive). Returns the first line's number
/// and the lines.
pub fn context_window(lines: &[&str], line: usize, radius: usize, first: usize, last: usize) -> (usize, Vec<String>) {
    let first = first.max(1);
    let last = last.min(lines.len());
    if lines.is_empty() || first > last {
        return (line, Vec::new());
    }
    let start = line.saturating_sub(radius).max(first);
    let end = (line + radius).min(last);
    if start > end {
        return (line, Vec::new());
    }
    let window = lines[start - 1..end].iter().map(|s| s.to_string()).collect();
    (start, window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_simple() {
        let lines = ["---", "on: push", "---", "# Title"];
        let bounds = find_frontmatter_bounds(&lines).unwrap();
        assert_eq!(bounds, FrontmatterBounds { open: 0, close: 2 });
        assert_eq!(bounds.start_line(), 2);
        assert_eq!(bounds.content(&lines), "on: push");
    }

    #[test]
    fn test_bounds_tolerate_leading_blank_and_comments() {
        let lines = ["", "<!-- generated -->", "# note", "---", "a: 1", "---"];
        let bounds = find_frontmatter_bounds(&lines).unwrap();
        assert_eq!(bounds.open, 3);
        assert_eq!(bounds.start_line(), 5);
    }

    #[test]
    fn test_bounds_rejects_text_before_fence() {
        assert_eq!(find_frontmatter_bounds(&["Some text", "---", "a: 1", "---"]), None);
    }

    #[test]
    fn test_bounds_need_exact_fences() {
        let lines = ["---", "description: |", "  ---", "---", "body"];
        assert_eq!(find_frontmatter_bounds(&lines), Some(FrontmatterBounds { open: 0, close: 3 }));
        assert_eq!(find_frontmatter_bounds(&[" ---", "a: 1", " ---"]), None);
    }

    #[test]
    fn test_bounds_unclosed() {
        assert_eq!(find_frontmatter_bounds(&["---", "a: 1"]), None);
    }

    #[test]
    fn test_context_window_clamps() {
        let lines = ["---", "a: 1", "b: 2", "c: 3", "---", "body"];
        let (start, window) = context_window(&lines, 2, 2, 1, 5);
        assert_eq!(start, 1);
        assert_eq!(window, vec!["---", "a: 1", "b: 2", "c: 3"]);

        let (start, window) = context_window(&lines, 4, 2, 1, 5);
        assert_eq!(start, 2);
        assert_eq!(window.len(), 4);
    }
}
