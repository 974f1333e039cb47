use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn awf(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_awf"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .output()
        .expect("Failed to execute awf")
}

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

#[test]
fn validate_accepts_a_clean_workflow() {
    let dir = workspace(&[
        ("triage.md", "---\non: push\ntools:\n  github:\n    allowed: [get_issue]\n---\n# Triage\n\n@include? local.md\n"),
    ]);
    let output = awf(&["validate", "triage.md"], dir.path());
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "triage.md: ok");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Optional include file not found"));
}

#[test]
fn validate_reports_file_position() {
    let dir = workspace(&[("triage.md", "---\non: push\npermissions:\n  contents: read\nbogus: true\n---\n")]);
    let output = awf(&["validate", "triage.md"], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("triage.md:5:6: error: Additional properties are not allowed ('bogus' was unexpected)"),
        "stderr: {stderr}"
    );
    assert!(stderr.contains("5 | bogus: true"));
}

#[test]
fn validate_json_diagnostics() {
    let dir = workspace(&[("w.md", "---\non: push\ntimeout_minutes: 0\n---\n")]);
    let output = awf(&["validate", "--json", "w.md"], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let line = stderr.lines().find(|line| line.starts_with('{')).expect("JSON diagnostic on stderr");
    let diagnostic: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(diagnostic["line"], 3);
    assert_eq!(diagnostic["column"], 17);
    assert_eq!(diagnostic["severity"], "error");
}

#[test]
fn validate_reports_unclosed_frontmatter() {
    let dir = workspace(&[("w.md", "---\non: push\n")]);
    let output = awf(&["validate", "w.md"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("w.md:1:1: error: frontmatter not properly closed"));
}

#[test]
fn locate_paths_and_pointers() {
    let dir = workspace(&[("w.md", "---\non: push\ntools:\n  github:\n    allowed: [a, b]\n---\n")]);

    let output = awf(&["locate", "w.md", "tools.github.allowed[1]"], dir.path());
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "w.md:5:18-5:18");

    let output = awf(&["locate", "--pointer", "w.md", "/tools/github"], dir.path());
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "w.md:4:10");

    let output = awf(&["locate", "w.md", "tools.missing"], dir.path());
    assert!(!output.status.success());
}

#[test]
fn expand_body_and_tools() {
    let dir = workspace(&[
        ("main.md", "---\non: push\ntools:\n  bash: [ls]\n---\n# Main\n\n@include shared/extra.md\n"),
        ("shared/extra.md", "---\ntools:\n  bash: [cat]\n---\nExtra steps.\n"),
    ]);

    let output = awf(&["expand", "main.md"], dir.path());
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "# Main\n\nExtra steps.\n");

    let output = awf(&["expand", "--tools", "main.md"], dir.path());
    assert!(output.status.success());
    let tools: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tools, serde_json::json!({"bash": ["ls", "cat"]}));
}

#[test]
fn mcp_lists_github_server_with_placeholder_token() {
    let dir = workspace(&[("w.md", "---\non: push\ntools:\n  github:\n---\n")]);
    let output = awf(&["mcp", "w.md"], dir.path());
    assert!(output.status.success());
    let servers: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(servers[0]["name"], "github");
    assert_eq!(servers[0]["type"], "docker");
    assert_eq!(servers[0]["env"]["GITHUB_PERSONAL_ACCESS_TOKEN"], "${GITHUB_TOKEN_REQUIRED}");

    let output = awf(&["mcp", "--server", "nope", "w.md"], dir.path());
    assert!(!output.status.success());
}
