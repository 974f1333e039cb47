//! Mapping schema-engine error paths back to YAML source positions.
//!
//! The schema engine reports where a violation happened as a JSON pointer
//! (`/tools/github/allowed/0`). This module turns that pointer into a
//! line/column in the YAML text the value was parsed from. Resolution is
//! textual and best-effort: when nothing matches, callers get
//! [`JsonPathLocation::not_found`] and fall back to a coarser location.

use awf_yaml::PathSegment;
use once_cell::sync::Lazy;
use regex::Regex;

/// A 1-based position produced by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonPathLocation {
    pub line: usize,
    pub column: usize,
    pub found: bool,
}

impl JsonPathLocation {
    pub fn at(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            found: true,
        }
    }

    /// `(1, 1)` with `found == false`.
    pub fn not_found() -> Self {
        Self {
            line: 1,
            column: 1,
            found: false,
        }
    }
}

/// "additional properties 'a', 'b' not allowed"
static ADDITIONAL_PROPERTIES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)additional propert(?:y|ies)\s+((?:'[^']*'(?:\s*,\s*)?)+)\s*(?:(?:is|are)\s+)?not allowed")
        .expect("valid regex literal")
});

/// "Additional properties are not allowed ('a', 'b' were unexpected)"
static UNEXPECTED_PROPERTIES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)additional properties are not allowed \(((?:'[^']*'(?:\s*,\s*)?)+)\s+(?:was|were) unexpected\)")
        .expect("valid regex literal")
});

static QUOTED_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"'([^']*)'").expect("valid regex literal"));

/// Split a JSON pointer into path segments.
///
/// Segments made only of ASCII digits become indices; `~1` and `~0` are
/// unescaped. The empty pointer yields no segments.
pub fn parse_json_pointer(pointer: &str) -> Vec<PathSegment> {
    let pointer = pointer.strip_prefix('#').unwrap_or(pointer);
    pointer
        .split('/')
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            let segment = raw.replace("~1", "/").replace("~0", "~");
            let numeric = segment.chars().all(|c| c.is_ascii_digit());
            match segment.parse::<usize>() {
                Ok(index) if numeric => PathSegment::Index {
                    raw: segment,
                    index,
                },
                _ => PathSegment::Key(segment),
            }
        })
        .collect()
}

/// Render segments in locator syntax: `tools.github.allowed[0]`.
pub fn to_locator_path(segments: &[PathSegment]) -> String {
    let mut path = String::new();
    for segment in segments {
        match segment {
            PathSegment::Key(key) => {
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(key);
            }
            PathSegment::Index { index, .. } => path.push_str(&format!("[{}]", index)),
        }
    }
    if path.is_empty() { "$".to_string() } else { path }
}

/// Property names named by an "additional properties" message, in order.
///
/// ```
/// use awf_schema::location::extract_additional_property_names;
///
/// let names = extract_additional_property_names(
///     "Additional properties are not allowed ('foo', 'bar' were unexpected)",
/// );
/// assert_eq!(names, vec!["foo", "bar"]);
/// ```
pub fn extract_additional_property_names(message: &str) -> Vec<String> {
    let list = UNEXPECTED_PROPERTIES_RE
        .captures(message)
        .or_else(|| ADDITIONAL_PROPERTIES_RE.captures(message))
        .and_then(|caps| caps.get(1));

    match list {
        Some(list) => QUOTED_NAME_RE
            .captures_iter(list.as_str())
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|name| !name.is_empty())
            .collect(),
        None => Vec::new(),
    }
}

/// Resolve a JSON pointer against YAML text.
///
/// The column is placed just after the matched key's colon, or just after
/// the `- ` marker of a matched list item. When only a prefix of the pointer
/// resolves, the deepest matched segment is returned.
pub fn locate_json_path_in_yaml(yaml: &str, pointer: &str) -> JsonPathLocation {
    let entries = scan_entries(yaml);
    let segments = parse_json_pointer(pointer);
    if segments.is_empty() {
        return root_location(&entries);
    }
    walk(&entries, &segments).location
}

/// Like [`locate_json_path_in_yaml`], but uses the error message to place
/// "additional properties" violations on the offending key.
///
/// With an empty pointer the offending key is searched among top-level keys
/// first and then anywhere in the document. With a non-empty pointer it is
/// searched under the object the pointer addresses; if the key is not found
/// there, the object's own location is returned.
pub fn locate_json_path_in_yaml_with_message(yaml: &str, pointer: &str, message: &str) -> JsonPathLocation {
    let names = extract_additional_property_names(message);
    if names.is_empty() {
        return locate_json_path_in_yaml(yaml, pointer);
    }

    let entries = scan_entries(yaml);
    let segments = parse_json_pointer(pointer);
    let everywhere: Vec<usize> = (0..entries.len()).collect();

    if segments.is_empty() {
        let top_level = direct_children(&entries, 0, None);
        return find_named(&entries, &top_level, &names)
            .or_else(|| find_named(&entries, &everywhere, &names))
            .unwrap_or_else(JsonPathLocation::not_found);
    }

    let resolved = walk(&entries, &segments);
    if resolved.matched == 0 {
        return find_named(&entries, &everywhere, &names).unwrap_or_else(JsonPathLocation::not_found);
    }
    let scope = direct_children(&entries, resolved.children_start, resolved.parent);
    find_named(&entries, &scope, &names).unwrap_or(resolved.location)
}

/// One significant source line, or the content following a `- ` marker.
#[derive(Debug)]
struct Entry<'a> {
    line: usize,
    indent: usize,
    text: &'a str,
    item: bool,

    /// For list items: the column just after the marker.
    column: usize,
}

#[derive(Debug, Clone, Copy)]
struct Parent {
    indent: usize,
    is_key: bool,
}

struct Resolved {
    location: JsonPathLocation,
    matched: usize,
    children_start: usize,
    parent: Option<Parent>,
}

fn scan_entries(yaml: &str) -> Vec<Entry<'_>> {
    let mut entries = Vec::new();
    let mut block_indent: Option<usize> = None;

    for (idx, raw) in yaml.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim_start();
        let mut indent = raw.len() - trimmed.len();

        // Skip the body of `|` / `>` block scalars.
        if let Some(owner) = block_indent {
            if trimmed.is_empty() || indent > owner {
                continue;
            }
            block_indent = None;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---" {
            continue;
        }

        let mut rest = trimmed;
        loop {
            if rest == "-" || rest.starts_with("- ") {
                let after = rest[1..].trim_start();
                let marker_width = rest.len() - after.len();
                entries.push(Entry {
                    line,
                    indent,
                    text: rest,
                    item: true,
                    column: indent + marker_width + 1,
                });
                if after.is_empty() {
                    break;
                }
                indent += marker_width;
                rest = after;
            } else {
                if starts_block_scalar(rest) {
                    block_indent = Some(indent);
                }
                entries.push(Entry {
                    line,
                    indent,
                    text: rest,
                    item: false,
                    column: 0,
                });
                break;
            }
        }
    }
    entries
}

fn starts_block_scalar(text: &str) -> bool {
    let Some(colon) = text.find(": ") else {
        return false;
    };
    let value = text[colon + 1..].split(" #").next().unwrap_or_default().trim();
    let mut chars = value.chars();
    matches!(chars.next(), Some('|' | '>')) && chars.all(|c| matches!(c, '-' | '+') || c.is_ascii_digit())
}

/// Indices of the entries one level below `parent`, starting at `start`.
///
/// A key's children may be an indentless sequence at the key's own indent.
fn direct_children(entries: &[Entry<'_>], start: usize, parent: Option<Parent>) -> Vec<usize> {
    let mut children = Vec::new();
    let mut level: Option<usize> = None;

    for (i, entry) in entries.iter().enumerate().skip(start) {
        if let Some(parent) = parent {
            let inside = entry.indent > parent.indent || (entry.indent == parent.indent && entry.item && parent.is_key);
            if !inside {
                break;
            }
        }
        let level = *level.get_or_insert(entry.indent);
        if entry.indent < level {
            break;
        }
        if entry.indent == level {
            children.push(i);
        }
    }
    children
}

/// Byte offset of the colon ending `key` at the start of `text`.
fn key_colon(text: &str, key: &str) -> Option<usize> {
    let candidates = [key.to_string(), format!("\"{}\"", key), format!("'{}'", key)];
    candidates.iter().find_map(|candidate| {
        let rest = text.strip_prefix(candidate.as_str())?;
        let after_space = rest.trim_start_matches(' ');
        let tail = after_space.strip_prefix(':')?;
        if tail.is_empty() || tail.starts_with([' ', '\t']) {
            Some(text.len() - after_space.len())
        } else {
            None
        }
    })
}

fn key_location(entry: &Entry<'_>, colon: usize) -> JsonPathLocation {
    let colon_column = entry.indent + entry.text[..colon].chars().count() + 1;
    JsonPathLocation::at(entry.line, colon_column + 1)
}

fn find_key(entries: &[Entry<'_>], scope: &[usize], key: &str) -> Option<(usize, JsonPathLocation)> {
    scope.iter().find_map(|&i| {
        let entry = &entries[i];
        if entry.item {
            return None;
        }
        key_colon(entry.text, key).map(|colon| (i, key_location(entry, colon)))
    })
}

/// First entry in `scope` whose key is one of `names`; the column is the
/// colon's column, i.e. right after the key name.
fn find_named(entries: &[Entry<'_>], scope: &[usize], names: &[String]) -> Option<JsonPathLocation> {
    scope.iter().find_map(|&i| {
        let entry = &entries[i];
        if entry.item {
            return None;
        }
        names.iter().find_map(|name| {
            key_colon(entry.text, name)
                .map(|colon| JsonPathLocation::at(entry.line, entry.indent + entry.text[..colon].chars().count() + 1))
        })
    })
}

fn root_location(entries: &[Entry<'_>]) -> JsonPathLocation {
    entries
        .first()
        .map_or_else(JsonPathLocation::not_found, |e| JsonPathLocation::at(e.line, e.indent + 1))
}

fn walk(entries: &[Entry<'_>], segments: &[PathSegment]) -> Resolved {
    let mut resolved = Resolved {
        location: JsonPathLocation::not_found(),
        matched: 0,
        children_start: 0,
        parent: None,
    };

    for segment in segments {
        let scope = direct_children(entries, resolved.children_start, resolved.parent);
        let hit = match segment {
            PathSegment::Key(key) => find_key(entries, &scope, key),
            PathSegment::Index { raw, index } => scope
                .iter()
                .copied()
                .filter(|&i| entries[i].item)
                .nth(*index)
                .map(|i| (i, JsonPathLocation::at(entries[i].line, entries[i].column)))
                // A numeric mapping key, e.g. `env: {1: x}`.
                .or_else(|| find_key(entries, &scope, raw)),
        };

        let Some((i, location)) = hit else {
            break;
        };
        let entry = &entries[i];
        resolved = Resolved {
            location,
            matched: resolved.matched + 1,
            children_start: i + 1,
            parent: Some(Parent {
                indent: entry.indent,
                is_key: !entry.item,
            }),
        };
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRONTMATTER: &str = "\
on:
  issues:
    types: [opened]
# comment
permissions:
  contents: read
tools:
  github:
    allowed:
      - get_issue
      - add_issue_comment
  custom:
    mcp:
      type: stdio
steps:
  - name: Checkout
    uses: actions/checkout@v4
  - name: Run
    run: |
      echo name: hidden
";

    #[test]
    fn test_parse_json_pointer() {
        assert_eq!(
            parse_json_pointer("/tools/github/allowed/0"),
            vec![
                PathSegment::key("tools"),
                PathSegment::key("github"),
                PathSegment::key("allowed"),
                PathSegment::index(0),
            ]
        );
        assert!(parse_json_pointer("").is_empty());
        assert_eq!(parse_json_pointer("/a~1b/c~0d"), vec![PathSegment::key("a/b"), PathSegment::key("c~d")]);
        assert_eq!(parse_json_pointer("/+1"), vec![PathSegment::key("+1")]);
    }

    #[test]
    fn test_to_locator_path() {
        assert_eq!(to_locator_path(&parse_json_pointer("/tools/github/allowed/1")), "tools.github.allowed[1]");
        assert_eq!(to_locator_path(&[]), "$");
    }

    #[test]
    fn test_extract_additional_property_names() {
        assert_eq!(
            extract_additional_property_names("additional properties 'foo', 'bar' not allowed"),
            vec!["foo", "bar"]
        );
        assert_eq!(
            extract_additional_property_names("additional property 'x' is not allowed"),
            vec!["x"]
        );
        assert_eq!(
            extract_additional_property_names("Additional properties are not allowed ('timeout' was unexpected)"),
            vec!["timeout"]
        );
        assert!(extract_additional_property_names("\"on\" is a required property").is_empty());
    }

    #[test]
    fn test_locate_key_column_after_colon() {
        let loc = locate_json_path_in_yaml(FRONTMATTER, "/permissions/contents");
        assert_eq!(loc, JsonPathLocation::at(6, 12));
    }

    #[test]
    fn test_locate_list_item_column_after_marker() {
        let loc = locate_json_path_in_yaml(FRONTMATTER, "/tools/github/allowed/1");
        assert_eq!(loc, JsonPathLocation::at(11, 9));
    }

    #[test]
    fn test_locate_key_inside_list_item() {
        let loc = locate_json_path_in_yaml(FRONTMATTER, "/steps/1/run");
        assert_eq!(loc, JsonPathLocation::at(19, 9));
        let loc = locate_json_path_in_yaml(FRONTMATTER, "/steps/0/uses");
        assert_eq!(loc, JsonPathLocation::at(17, 10));
    }

    #[test]
    fn test_block_scalar_body_is_not_scanned() {
        let loc = locate_json_path_in_yaml_with_message(
            FRONTMATTER,
            "",
            "additional properties 'echo name' not allowed",
        );
        assert!(!loc.found);
    }

    #[test]
    fn test_partial_match_returns_deepest_segment() {
        let loc = locate_json_path_in_yaml(FRONTMATTER, "/tools/github/missing");
        assert_eq!(loc, JsonPathLocation::at(8, 10));
    }

    #[test]
    fn test_unresolvable_pointer() {
        let loc = locate_json_path_in_yaml(FRONTMATTER, "/nope/deeper");
        assert_eq!(loc, JsonPathLocation::not_found());
    }

    #[test]
    fn test_root_pointer_points_at_first_key() {
        assert_eq!(locate_json_path_in_yaml(FRONTMATTER, ""), JsonPathLocation::at(1, 1));
        assert!(!locate_json_path_in_yaml("", "").found);
    }

    #[test]
    fn test_indentless_sequence() {
        let yaml = "allowed:\n- a\n- b\nnext: 1\n";
        assert_eq!(locate_json_path_in_yaml(yaml, "/allowed/1"), JsonPathLocation::at(3, 3));
        assert_eq!(locate_json_path_in_yaml(yaml, "/next"), JsonPathLocation::at(4, 6));
    }

    #[test]
    fn test_additional_property_at_root() {
        let yaml = "on: push\nfoo: bar\n";
        let loc = locate_json_path_in_yaml_with_message(yaml, "", "additional properties 'foo' not allowed");
        assert_eq!(loc, JsonPathLocation::at(2, 4));
    }

    #[test]
    fn test_additional_property_prefers_top_level() {
        let yaml = "tools:\n  foo: 1\nfoo: 2\n";
        let loc = locate_json_path_in_yaml_with_message(
            yaml,
            "",
            "Additional properties are not allowed ('foo' was unexpected)",
        );
        assert_eq!(loc, JsonPathLocation::at(3, 4));
    }

    #[test]
    fn test_additional_property_scoped_under_pointer() {
        let yaml = "foo: 0\ntools:\n  github:\n    foo: 1\n";
        let loc = locate_json_path_in_yaml_with_message(
            yaml,
            "/tools/github",
            "Additional properties are not allowed ('foo' was unexpected)",
        );
        assert_eq!(loc, JsonPathLocation::at(4, 8));
    }

    #[test]
    fn test_additional_property_falls_back_to_object() {
        let yaml = "tools:\n  github: {foo: 1}\n";
        let loc = locate_json_path_in_yaml_with_message(
            yaml,
            "/tools/github",
            "Additional properties are not allowed ('foo' was unexpected)",
        );
        assert_eq!(loc, JsonPathLocation::at(2, 10));
    }

    #[test]
    fn test_quoted_keys() {
        let yaml = "\"on\":\n  push: {}\n";
        assert_eq!(locate_json_path_in_yaml(yaml, "/on/push"), JsonPathLocation::at(2, 8));
        assert_eq!(locate_json_path_in_yaml(yaml, "/on"), JsonPathLocation::at(1, 6));
    }
}
