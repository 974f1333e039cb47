//! Command implementations for the awf CLI
//!
//! Each command module parses nothing itself: `main` hands it an args
//! struct, and it delegates to the library crates.

pub mod expand;
pub mod locate;
pub mod mcp;
pub mod validate;

use anyhow::{Context, Result, anyhow};
use awf_error_reporting::{CompilerDiagnostic, DiagnosticFormatter, DiagnosticMessage, PlainFormatter};
use awf_frontmatter::{FrontmatterError, FrontmatterResult, extract_frontmatter_from_content};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// A workflow file read from disk and split at its fences.
pub struct Workflow {
    pub path: PathBuf,
    pub parsed: FrontmatterResult,
}

impl Workflow {
    /// Directory that relative includes resolve against.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// The workflow's own `tools` map.
    pub fn tools(&self) -> Map<String, Value> {
        match self.parsed.frontmatter.get("tools") {
            Some(Value::Object(tools)) => tools.clone(),
            _ => Map::new(),
        }
    }
}

/// Read and split `path`. Frontmatter errors with a position are printed as
/// compiler diagnostics before the error is returned.
pub fn load_workflow(path: &Path) -> Result<Workflow> {
    let content = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    match extract_frontmatter_from_content(&content) {
        Ok(parsed) => Ok(Workflow {
            path: path.to_path_buf(),
            parsed,
        }),
        Err(err) => {
            if let Some(diagnostic) = frontmatter_diagnostic(path, &content, &err) {
                eprint!("{}", PlainFormatter.format(&diagnostic));
            }
            Err(anyhow!(err)).with_context(|| format!("failed to parse frontmatter in {}", path.display()))
        }
    }
}

fn frontmatter_diagnostic(path: &Path, content: &str, err: &FrontmatterError) -> Option<CompilerDiagnostic> {
    let (line, column) = match err {
        FrontmatterError::Yaml { line, column, .. } => (*line, *column),
        FrontmatterError::Unclosed { open_line } => (*open_line, 1),
        _ => return None,
    };
    let context: Vec<String> = content
        .lines()
        .skip(line.saturating_sub(1))
        .take(1)
        .map(str::to_string)
        .collect();
    let hint = match err {
        FrontmatterError::Unclosed { .. } => "Add a closing '---' line after the frontmatter",
        _ => "Check the YAML syntax of the frontmatter",
    };
    Some(
        CompilerDiagnostic::error(path.display().to_string(), line, column, err.to_string())
            .with_context(line, context)
            .with_hint(hint),
    )
}

/// Print side-channel notes to stderr.
pub fn report_notes(notes: &[DiagnosticMessage], json: bool) {
    for note in notes {
        if json {
            eprintln!("{}", note.to_json());
        } else {
            eprint!("{}", note.to_text());
        }
    }
}

pub fn report_diagnostic(diagnostic: &CompilerDiagnostic, json: bool) {
    if json {
        match serde_json::to_string(diagnostic) {
            Ok(line) => eprintln!("{}", line),
            Err(_) => eprint!("{}", PlainFormatter.format(diagnostic)),
        }
    } else {
        eprint!("{}", PlainFormatter.format(diagnostic));
    }
}
