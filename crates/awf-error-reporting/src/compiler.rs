//! Compiler-style diagnostics with file positions and source context.

use crate::diagnostic::DiagnosticKind;
use serde::{Deserialize, Serialize};

/// A diagnostic anchored at a 1-based file position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerDiagnostic {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub severity: DiagnosticKind,
    pub message: String,

    /// Source lines surrounding the position.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub context: Vec<String>,

    /// File line number of `context[0]`.
    #[serde(default)]
    pub context_start_line: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CompilerDiagnostic {
    pub fn error(file: impl Into<String>, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            severity: DiagnosticKind::Error,
            message: message.into(),
            context: Vec::new(),
            context_start_line: 0,
            hint: None,
        }
    }

    pub fn with_severity(mut self, severity: DiagnosticKind) -> Self {
        self.severity = severity;
        self
    }

    /// Attach source lines; `start_line` is the file line number of the first.
    pub fn with_context(mut self, start_line: usize, lines: Vec<String>) -> Self {
        self.context_start_line = start_line;
        self.context = lines;
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Renders a [`CompilerDiagnostic`] to text.
pub trait DiagnosticFormatter {
    fn format(&self, diagnostic: &CompilerDiagnostic) -> String;
}

/// Plain-text formatter with no terminal styling.
///
/// ```text
/// workflow.md:4:3: error: Unknown property: bogus
/// 3 | tools:
/// 4 |   bogus: true
///   |   ^
/// hint: Valid properties are: github, edit
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl DiagnosticFormatter for PlainFormatter {
    fn format(&self, diagnostic: &CompilerDiagnostic) -> String {
        let mut out = format!(
            "{}:{}:{}: {}: {}\n",
            diagnostic.file,
            diagnostic.line,
            diagnostic.column,
            diagnostic.severity.label(),
            diagnostic.message
        );

        if !diagnostic.context.is_empty() {
            let last = diagnostic.context_start_line + diagnostic.context.len() - 1;
            let width = last.to_string().len();
            for (offset, text) in diagnostic.context.iter().enumerate() {
                let number = diagnostic.context_start_line + offset;
                out.push_str(&format!("{:>width$} | {}\n", number, text, width = width));
                if number == diagnostic.line {
                    let pad = " ".repeat(diagnostic.column.saturating_sub(1));
                    out.push_str(&format!("{:>width$} | {}^\n", "", pad, width = width));
                }
            }
        }

        if let Some(hint) = &diagnostic.hint {
            out.push_str(&format!("hint: {}\n", hint));
        }
        out
    }
}
