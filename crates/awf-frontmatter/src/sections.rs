//! Slicing YAML key blocks and markdown sections out of text.

use crate::error::{FrontmatterError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+?)\s*#*\s*$").expect("valid regex literal"));

/// The block of a top-level `key` in `yaml`: the key line plus every
/// following line indented deeper than it. Blank lines inside the block are
/// kept; trailing ones are dropped. Empty when the key is absent.
///
/// ```
/// use awf_frontmatter::extract_key_block;
///
/// let yaml = "on: push\ntools:\n  github:\n    allowed: [a]\n  edit:\nname: x\n";
/// assert_eq!(extract_key_block(yaml, "tools"), "tools:\n  github:\n    allowed: [a]\n  edit:");
/// ```
pub fn extract_key_block(yaml: &str, key: &str) -> String {
    let prefix = format!("{}:", key);
    let lines: Vec<&str> = yaml.lines().collect();
    let Some(start) = lines
        .iter()
        .position(|line| indentation(line) == 0 && line.trim_end().starts_with(&prefix))
    else {
        return String::new();
    };

    let key_indent = indentation(lines[start]);
    let mut block = vec![lines[start]];
    for &line in &lines[start + 1..] {
        if line.trim().is_empty() || indentation(line) > key_indent {
            block.push(line);
        } else {
            break;
        }
    }
    while block.last().is_some_and(|line| line.trim().is_empty()) {
        block.pop();
    }
    block.join("\n")
}

/// The markdown section headed `name` (level 1 to 3), from its heading up
/// to the next heading of equal or higher level. Headings inside fenced
/// code blocks are ignored.
///
/// # Errors
///
/// [`FrontmatterError::SectionNotFound`] when no heading matches.
pub fn extract_markdown_section(content: &str, name: &str) -> Result<String> {
    let wanted = name.trim();
    let mut section: Vec<&str> = Vec::new();
    let mut level = None;
    let mut in_fence = false;

    for line in content.lines() {
        let fence = is_fence(line);
        let heading = if in_fence || fence { None } else { heading(line) };
        if fence {
            in_fence = !in_fence;
        }

        match (level, heading) {
            (None, Some((found, text))) if found <= 3 && text == wanted => {
                level = Some(found);
                section.push(line);
            }
            (Some(current), Some((found, _))) if found <= current => break,
            (Some(_), _) => section.push(line),
            (None, _) => {}
        }
    }

    if level.is_none() {
        return Err(FrontmatterError::SectionNotFound {
            section: wanted.to_string(),
        });
    }
    Ok(section.join("\n").trim().to_string())
}

/// The level and text of an ATX heading line.
pub(crate) fn heading(line: &str) -> Option<(usize, &str)> {
    let caps = HEADING_RE.captures(line)?;
    let level = caps.get(1)?.as_str().len();
    Some((level, caps.get(2)?.as_str()))
}

pub(crate) fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}
