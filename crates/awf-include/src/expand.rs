//! Recursive `@include` expansion.
//!
//! Expansion runs in passes. Each pass replaces every directive in the
//! current text, and substituted text may carry further directives (rebased
//! onto the included file's directory) for the next pass. Passes are capped
//! at [`ExpandOptions::max_depth`]; an include cycle stops at the cap and is
//! reported through [`ExpandOutput::depth_exhausted`], not as an error.

use crate::directive::{IncludeDirective, has_directive, rebase_directives};
use crate::error::{IncludeError, Result};
use awf_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};
use awf_frontmatter::{FrontmatterResult, extract_frontmatter_from_content, extract_markdown_section, is_under_workflows_dir};
use awf_schema::{validate_included_file_frontmatter, validate_included_file_frontmatter_with_location};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info, warn};

/// Frontmatter keys an included file may carry.
pub const ALLOWED_INCLUDE_KEYS: &[&str] = &["tools", "engine"];

pub const DEFAULT_MAX_DEPTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Maximum number of passes.
    pub max_depth: usize,
    /// Produce `tools` JSON fragments instead of markdown.
    pub extract_tools: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            extract_tools: false,
        }
    }
}

impl ExpandOptions {
    pub fn extract_tools() -> Self {
        Self {
            extract_tools: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandOutput {
    /// Expanded markdown, or one JSON `tools` object per line.
    pub content: String,
    /// Warnings and info notes raised while expanding, without duplicates.
    pub notes: Vec<DiagnosticMessage>,
    /// The pass limit was reached while the output was still changing.
    pub depth_exhausted: bool,
}

/// Expand the directives in `content`, resolving relative paths against
/// `base_dir`.
///
/// # Errors
///
/// A missing required include, an unreadable or malformed included file,
/// or a strict validation failure aborts the expansion.
pub fn expand_includes(content: &str, base_dir: &Path, options: ExpandOptions) -> Result<ExpandOutput> {
    let mut expander = Expander {
        extract_tools: options.extract_tools,
        notes: Vec::new(),
    };

    let mut current = if options.extract_tools {
        content
            .lines()
            .filter_map(IncludeDirective::parse)
            .map(|directive| directive.rebased(base_dir).to_string())
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        rebase_directives(content, base_dir)
    };

    let mut passes = 0;
    let depth_exhausted = loop {
        if !has_directive(&current) {
            break false;
        }
        if passes == options.max_depth {
            break true;
        }
        let next = expander.pass(&current)?;
        passes += 1;
        debug!(pass = passes, bytes = next.len(), "include pass");
        let settled = options.extract_tools && next == current;
        current = next;
        if settled {
            break false;
        }
    };

    if depth_exhausted {
        warn!(max_depth = options.max_depth, "include expansion stopped at the maximum depth");
        expander.note(
            DiagnosticMessageBuilder::warning("Include expansion stopped at the maximum depth")
                .with_code("AWF-3-4")
                .add_info(format!("Passes run: {}", options.max_depth))
                .add_note("Directives left after the last pass were not expanded")
                .add_hint("Check whether the includes form a cycle")
                .build(),
        );
    }

    let content = if options.extract_tools {
        current
            .lines()
            .filter(|line| IncludeDirective::parse(line).is_none() && !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        current
    };

    Ok(ExpandOutput {
        content,
        notes: expander.notes,
        depth_exhausted,
    })
}

struct Expander {
    extract_tools: bool,
    notes: Vec<DiagnosticMessage>,
}

impl Expander {
    fn pass(&mut self, text: &str) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        for line in text.lines() {
            match IncludeDirective::parse(line) {
                Some(directive) => {
                    if let Some(substitution) = self.substitute(line, &directive)? {
                        out.push_str(&substitution);
                    }
                }
                None => {
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        Ok(out)
    }

    /// The replacement text for one directive, newline-terminated. `None`
    /// for a missing optional include.
    fn substitute(&mut self, line: &str, directive: &IncludeDirective) -> Result<Option<String>> {
        // Directives are rebased before they reach a pass.
        let path = directive.resolve(Path::new(""));
        if !path.is_file() {
            if directive.optional {
                info!(path = %path.display(), "optional include file not found");
                self.note(
                    DiagnosticMessageBuilder::info(format!("Optional include file not found: {}", path.display()))
                        .with_code("AWF-3-2")
                        .add_note("The directive was removed from the output")
                        .build(),
                );
                return Ok(None);
            }
            return Err(IncludeError::Resolve {
                directive: line.trim().to_string(),
                path,
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|source| IncludeError::Read {
            path: path.clone(),
            source,
        })?;
        let parsed = extract_frontmatter_from_content(&content).map_err(|source| IncludeError::Frontmatter {
            path: path.clone(),
            source,
        })?;
        self.validate(&path, &parsed)?;

        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        let substitution = if self.extract_tools {
            tools_fragment(&parsed, dir)
        } else {
            let body = match &directive.section {
                Some(section) => {
                    extract_markdown_section(&parsed.markdown, section).map_err(|_| IncludeError::Section {
                        path: path.clone(),
                        section: section.clone(),
                    })?
                }
                None => parsed.markdown.clone(),
            };
            format!("{}\n", rebase_directives(body.trim(), dir))
        };
        Ok(Some(substitution))
    }

    /// Strict schema validation under `.github/workflows`, warnings
    /// elsewhere.
    fn validate(&mut self, path: &Path, parsed: &FrontmatterResult) -> Result<()> {
        if is_under_workflows_dir(path) {
            return validate_included_file_frontmatter_with_location(&parsed.frontmatter, path).map_err(|source| {
                IncludeError::Validation {
                    path: path.to_path_buf(),
                    source,
                }
            });
        }

        let unexpected: Vec<&str> = parsed
            .frontmatter
            .keys()
            .map(String::as_str)
            .filter(|key| !ALLOWED_INCLUDE_KEYS.contains(key))
            .collect();
        if !unexpected.is_empty() {
            warn!(path = %path.display(), keys = ?unexpected, "ignoring unexpected frontmatter fields in include");
            let mut builder = DiagnosticMessageBuilder::warning(format!(
                "Ignoring unexpected frontmatter fields in {}: {}",
                path.display(),
                unexpected.join(", ")
            ))
            .with_code("AWF-3-3");
            for key in &unexpected {
                builder = builder.add_detail(format!("'{}' is not used from an included file", key));
            }
            self.note(
                builder
                    .add_hint(format!("Included files may only declare: {}", ALLOWED_INCLUDE_KEYS.join(", ")))
                    .build(),
            );
        }

        let subset: Map<String, Value> = parsed
            .frontmatter
            .iter()
            .filter(|(key, _)| ALLOWED_INCLUDE_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        if subset.is_empty() {
            return Ok(());
        }
        if let Err(err) = validate_included_file_frontmatter(&subset) {
            warn!(path = %path.display(), error = %err, "included file failed validation");
            self.note(
                DiagnosticMessageBuilder::warning(format!("Invalid frontmatter in included file {}", path.display()))
                    .with_code("AWF-2-1")
                    .problem(err.to_string())
                    .build(),
            );
        }
        Ok(())
    }

    fn note(&mut self, note: DiagnosticMessage) {
        if !self.notes.contains(&note) {
            self.notes.push(note);
        }
    }
}

/// The file's `tools` as one JSON line, followed by its own directives.
fn tools_fragment(parsed: &FrontmatterResult, dir: &Path) -> String {
    let tools = match parsed.frontmatter.get("tools") {
        Some(Value::Object(tools)) => Value::Object(tools.clone()),
        _ => Value::Object(Map::new()),
    };
    let mut out = format!("{}\n", tools);
    for directive in parsed.markdown.lines().filter_map(IncludeDirective::parse) {
        out.push_str(&directive.rebased(dir).to_string());
        out.push('\n');
    }
    out
}

/// Expand `content` into markdown with every include substituted.
pub fn expand_includes_in_body(content: &str, base_dir: &Path) -> Result<ExpandOutput> {
    expand_includes(content, base_dir, ExpandOptions::default())
}

/// Collect the `tools` fragments contributed by the includes in `content`,
/// one JSON object per line in directive order.
pub fn extract_included_tools(content: &str, base_dir: &Path) -> Result<ExpandOutput> {
    expand_includes(content, base_dir, ExpandOptions::extract_tools())
}

/// Merge the included `tools` fragments into `base_tools`.
///
/// Returns the merged map and the notes raised while expanding.
pub fn merge_tools_from_includes(
    base_tools: &Map<String, Value>,
    content: &str,
    base_dir: &Path,
) -> Result<(Map<String, Value>, ExpandOutput)> {
    let output = extract_included_tools(content, base_dir)?;
    let merged = awf_config::merge_included_tools(base_tools, &output.content)?;
    Ok((merged, output))
}
