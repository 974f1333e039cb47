//! `@include` directive parsing.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};

static INCLUDE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*@include(\?)?\s+(\S+)\s*$").expect("valid regex literal"));

/// One `@include[?] <path>[#Section]` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    pub optional: bool,
    pub path: String,
    pub section: Option<String>,
}

impl IncludeDirective {
    /// Parse `line` as a directive.
    ///
    /// ```
    /// use awf_include::IncludeDirective;
    ///
    /// let directive = IncludeDirective::parse("@include? shared/tools.md#Setup").unwrap();
    /// assert!(directive.optional);
    /// assert_eq!(directive.path, "shared/tools.md");
    /// assert_eq!(directive.section.as_deref(), Some("Setup"));
    /// assert!(IncludeDirective::parse("see @include x.md").is_none());
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        let caps = INCLUDE_RE.captures(line)?;
        let optional = caps.get(1).is_some();
        let target = caps.get(2)?.as_str();
        let (path, section) = match target.rsplit_once('#') {
            Some((path, section)) if !section.is_empty() => (path, Some(section.to_string())),
            Some((path, _)) => (path, None),
            None => (target, None),
        };
        Some(Self {
            optional,
            path: path.to_string(),
            section,
        })
    }

    /// The file this directive names, relative to `base_dir`.
    pub fn resolve(&self, base_dir: &Path) -> PathBuf {
        let path = Path::new(&self.path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// This directive with its path resolved against `base_dir`.
    pub fn rebased(&self, base_dir: &Path) -> Self {
        Self {
            path: self.resolve(base_dir).display().to_string(),
            ..self.clone()
        }
    }
}

impl fmt::Display for IncludeDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@include{} {}", if self.optional { "?" } else { "" }, self.path)?;
        if let Some(section) = &self.section {
            write!(f, "#{}", section)?;
        }
        Ok(())
    }
}

/// Whether any line of `text` is a directive.
pub fn has_directive(text: &str) -> bool {
    text.lines().any(|line| INCLUDE_RE.is_match(line))
}

/// Rewrite every directive in `text` so its path is resolved against
/// `base_dir`. Other lines are left alone.
pub fn rebase_directives(text: &str, base_dir: &Path) -> String {
    let mut rebased = text
        .lines()
        .map(|line| match IncludeDirective::parse(line) {
            Some(directive) => directive.rebased(base_dir).to_string(),
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    if text.ends_with('\n') {
        rebased.push('\n');
    }
    rebased
}
