//! Core diagnostic message types.
//!
//! A [`DiagnosticMessage`] is the structured form of an error, warning or
//! informational note. Library crates collect them on side channels (for
//! example, the include expander's non-fatal warnings); the command-line
//! front-end renders them.

use serde::{Deserialize, Serialize};

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// An error that prevents completion
    Error,
    /// A warning that doesn't prevent completion but indicates a problem
    Warning,
    /// Informational message
    Info,
}

impl DiagnosticKind {
    /// Lowercase label used in compiler-style output (`error`, `warning`, `info`).
    pub fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Info => "info",
        }
    }

    fn title_label(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
            DiagnosticKind::Info => "Info",
        }
    }
}

/// How detail items should be presented (x/i bullet style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    /// Error detail (✖ bullet)
    Error,
    /// Info detail (ℹ bullet)
    Info,
    /// Note detail (plain bullet)
    Note,
}

impl DetailKind {
    fn bullet(self) -> &'static str {
        match self {
            DetailKind::Error => "✖",
            DetailKind::Info => "ℹ",
            DetailKind::Note => "•",
        }
    }
}

/// A detail item in a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailItem {
    pub kind: DetailKind,
    pub content: String,
}

/// A structured diagnostic message.
///
/// Structure:
/// 1. **Code**: Optional error code (e.g., "AWF-3-2") from the catalog
/// 2. **Title**: Brief message
/// 3. **Kind**: Error, Warning, Info
/// 4. **Problem**: What went wrong
/// 5. **Details**: Specific information (bulleted)
/// 6. **Hints**: Optional guidance for fixing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    pub title: String,

    pub kind: DiagnosticKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub details: Vec<DetailItem>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub hints: Vec<String>,
}

impl DiagnosticMessage {
    /// Create a new diagnostic message with just a title and kind.
    ///
    /// Prefer [`DiagnosticMessageBuilder`](crate::DiagnosticMessageBuilder)
    /// for anything with details or hints.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            kind,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// The problem statement, falling back to the catalog's default
    /// message for this code.
    pub fn problem_text(&self) -> Option<&str> {
        self.problem.as_deref().or_else(|| {
            self.code
                .as_deref()
                .and_then(crate::catalog::get_error_info)
                .map(|info| info.message_template.as_str())
        })
    }

    /// Render as bulleted text.
    ///
    /// Format:
    /// ```text
    /// Warning [AWF-3-3]: title
    /// Problem statement, or the catalog default for the code
    /// ✖ Error detail
    /// ℹ Info detail
    /// • Note detail
    /// ? Hint
    /// ```
    ///
    /// # Example
    ///
    /// ```
    /// use awf_error_reporting::DiagnosticMessageBuilder;
    ///
    /// let msg = DiagnosticMessageBuilder::info("Optional include file not found: shared.md")
    ///     .with_code("AWF-3-2")
    ///     .build();
    /// assert_eq!(
    ///     msg.to_text(),
    ///     "Info [AWF-3-2]: Optional include file not found: shared.md\n\
    ///      An optional include file was not found and was skipped\n"
    /// );
    /// ```
    pub fn to_text(&self) -> String {
        let mut result = match &self.code {
            Some(code) => format!("{} [{}]: {}\n", self.kind.title_label(), code, self.title),
            None => format!("{}: {}\n", self.kind.title_label(), self.title),
        };

        if let Some(problem) = self.problem_text() {
            result.push_str(problem);
            result.push('\n');
        }

        for detail in &self.details {
            result.push_str(&format!("{} {}\n", detail.kind.bullet(), detail.content));
        }

        for hint in &self.hints {
            result.push_str(&format!("? {}\n", hint));
        }

        result
    }

    /// Render as a JSON value.
    ///
    /// ```
    /// use awf_error_reporting::DiagnosticMessage;
    ///
    /// let json = DiagnosticMessage::warning("Ignoring key 'on'").to_json();
    /// assert_eq!(json["kind"], "warning");
    /// assert_eq!(json["title"], "Ignoring key 'on'");
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            serde_json::json!({
                "kind": self.kind.label(),
                "title": self.title,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message() {
        let msg = DiagnosticMessage::error("Something failed");
        assert_eq!(msg.kind, DiagnosticKind::Error);
        assert!(msg.code.is_none());
        assert!(msg.details.is_empty());
    }

    #[test]
    fn test_problem_falls_back_to_catalog() {
        let msg = DiagnosticMessage::warning("Depth").with_code("AWF-3-4");
        assert_eq!(
            msg.problem_text(),
            Some("Include expansion stopped at the maximum depth while output was still changing")
        );

        let mut own = msg.clone();
        own.problem = Some("after 3 passes".into());
        assert_eq!(own.problem_text(), Some("after 3 passes"));

        let unknown = DiagnosticMessage::warning("x").with_code("AWF-9-9");
        assert_eq!(unknown.problem_text(), None);
        assert_eq!(unknown.to_text(), "Warning [AWF-9-9]: x\n");
    }

    #[test]
    fn test_to_text_bullets() {
        let mut msg = DiagnosticMessage::warning("Unexpected keys");
        msg.problem = Some("Included files only support tools and engine".into());
        msg.details.push(DetailItem {
            kind: DetailKind::Error,
            content: "found 'on'".into(),
        });
        msg.details.push(DetailItem {
            kind: DetailKind::Note,
            content: "the key is ignored".into(),
        });
        msg.hints.push("Move 'on' into the main workflow?".into());

        let text = msg.to_text();
        assert_eq!(
            text,
            "Warning: Unexpected keys\n\
             Included files only support tools and engine\n\
             ✖ found 'on'\n\
             • the key is ignored\n\
             ? Move 'on' into the main workflow?\n"
        );
    }

    #[test]
    fn test_to_json_omits_empty_fields() {
        let json = DiagnosticMessage::info("note").to_json();
        assert_eq!(json["kind"], "info");
        assert!(json.get("details").is_none());
        assert!(json.get("code").is_none());
    }
}
