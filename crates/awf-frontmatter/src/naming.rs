//! Workflow names and locations derived from paths and bodies.

use crate::sections::{heading, is_fence};
use std::path::{Component, Path};

/// Title derived from a file name: the extension is dropped, the stem is
/// split on hyphens, and each word is capitalized.
///
/// ```
/// use awf_frontmatter::default_title_from_filename;
/// use std::path::Path;
///
/// assert_eq!(default_title_from_filename(Path::new("weekly-issue-triage.md")), "Weekly Issue Triage");
/// ```
pub fn default_title_from_filename(path: &Path) -> String {
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    stem.split('-')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The first level-one heading of `body`, or the title derived from `path`.
pub fn extract_workflow_name(body: &str, path: &Path) -> String {
    let mut in_fence = false;
    for line in body.lines() {
        if is_fence(line) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some((1, text)) = heading(line) {
            return text.to_string();
        }
    }
    default_title_from_filename(path)
}

/// Whether `path` lies under a `.github/workflows` directory.
pub fn is_under_workflows_dir(path: &Path) -> bool {
    let names: Vec<&std::ffi::OsStr> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name),
            _ => None,
        })
        .collect();
    names
        .windows(2)
        .any(|pair| pair[0] == ".github" && pair[1] == "workflows")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
