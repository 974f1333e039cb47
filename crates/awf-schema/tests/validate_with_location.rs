//! End-to-end location enrichment against files on disk.

use awf_error_reporting::{DiagnosticFormatter, PlainFormatter};
use awf_schema::{
    FrontmatterValidator, SchemaError, SchemaKind, validate_included_file_frontmatter_with_location,
    validate_main_workflow_frontmatter_with_location,
};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn position(err: &SchemaError) -> (usize, usize) {
    let diagnostic = err.violation().unwrap().diagnostic.as_ref().unwrap();
    (diagnostic.line, diagnostic.column)
}

fn check_main(frontmatter: Value, path: &Path) -> SchemaError {
    validate_main_workflow_frontmatter_with_location(&frontmatter, path).unwrap_err()
}

#[test]
fn unknown_top_level_key_renders_full_diagnostic() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "triage.md",
        "---\non: push\npermissions:\n  contents: read\nbogus: true\n---\n# Triage\n",
    );

    let err = check_main(
        json!({"on": "push", "permissions": {"contents": "read"}, "bogus": true}),
        &path,
    );
    let mut diagnostic = err.violation().unwrap().diagnostic.clone().unwrap();
    diagnostic.file = "triage.md".to_string();

    insta::assert_snapshot!(PlainFormatter.format(&diagnostic), @r"
    triage.md:5:6: error: Additional properties are not allowed ('bogus' was unexpected)
    3 | permissions:
    4 |   contents: read
    5 | bogus: true
      |      ^
    6 | ---
    hint: Valid properties at this location: name, description, source, on, permissions, run-name, runs-on, timeout_minutes, concurrency, env, if, steps, post-steps, network, imports, stop-time, strict, roles, cache, safe-outputs, engine, tools
    ");
}

#[test]
fn nested_unknown_key_is_found_under_its_object() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "w.md",
        "---\non: push\ntools:\n  github:\n    allowed: [get_issue]\n    mode: remote\n---\n",
    );
    let err = check_main(
        json!({"on": "push", "tools": {"github": {"allowed": ["get_issue"], "mode": "remote"}}}),
        &path,
    );
    assert_eq!(err.violation().unwrap().pointer, "/tools/github");
    assert_eq!(position(&err), (6, 9));
}

#[test]
fn type_error_points_after_the_key() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "w.md", "---\non: push\ntimeout_minutes: 0\n---\n");
    let err = check_main(json!({"on": "push", "timeout_minutes": 0}), &path);
    assert_eq!(position(&err), (3, 17));
}

#[test]
fn leading_comments_shift_the_frontmatter() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "w.md", "<!-- generated -->\n\n---\non: push\nbogus: 1\n---\n");
    let err = check_main(json!({"on": "push", "bogus": 1}), &path);
    assert_eq!(position(&err), (5, 6));
}

#[test]
fn flow_style_frontmatter_uses_the_ast() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "w.md", "---\n{on: push, timeout_minutes: 0}\n---\n");
    let err = check_main(json!({"on": "push", "timeout_minutes": 0}), &path);
    assert_eq!(position(&err), (2, 29));
}

#[test]
fn unresolvable_cause_falls_back_to_frontmatter_start() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "w.md", "---\non: push\n---\n");
    // The value validated is not what the file says, so nothing matches.
    let err = check_main(json!({"on": "push", "strict": "yes"}), &path);
    assert_eq!(position(&err), (2, 1));
}

#[test]
fn missing_file_keeps_plain_violation() {
    let err = check_main(json!({"bogus": 1}), Path::new("/nonexistent/awf/w.md"));
    let violation = err.violation().unwrap();
    assert!(violation.diagnostic.is_none());
    assert!(violation.message.contains("bogus"));
}

#[test]
fn included_file_hint_suggests_close_key() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "shared.md", "---\ntool:\n  edit: {}\n---\nBody\n");
    let err = validate_included_file_frontmatter_with_location(&json!({"tool": {"edit": {}}}), &path).unwrap_err();
    let violation = err.violation().unwrap();
    assert_eq!(violation.schema, SchemaKind::IncludedFile);
    let diagnostic = violation.diagnostic.as_ref().unwrap();
    assert_eq!((diagnostic.line, diagnostic.column), (2, 5));
    assert_eq!(
        diagnostic.hint.as_deref(),
        Some("Did you mean 'tools'? Valid properties at this location: engine, tools")
    );
}

#[test]
fn engine_violation_hint_lists_engines() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "w.md", "---\non: push\nengine:\n  id: claude\n  turns: 3\n---\n");
    let err = FrontmatterValidator::new()
        .validate_main_workflow(&json!({"on": "push", "engine": {"id": "claude", "turns": 3}}), Some(&path))
        .unwrap_err();
    let diagnostic = err.violation().unwrap().diagnostic.as_ref().unwrap();
    assert_eq!((diagnostic.line, diagnostic.column), (3, 8));
    assert_eq!(diagnostic.hint.as_deref(), Some("Valid engines are: claude, codex, custom"));
}
