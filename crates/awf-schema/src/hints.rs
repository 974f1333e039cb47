//! Remediation hints for schema violations.

use crate::engine::EngineRegistry;
use crate::error::ValidationCause;
use crate::location::extract_additional_property_names;
use serde_json::Value;

pub(crate) const DEFAULT_HINT: &str = "Check the YAML frontmatter against the schema requirements";

/// Build the hint shown under a violation.
///
/// Unknown keys get the list of valid keys at that location (plus a
/// "did you mean" when one is close); `engine` violations get the list of
/// known engines.
pub fn build_hint(schema: &Value, cause: &ValidationCause, registry: &dyn EngineRegistry) -> String {
    let unknown = extract_additional_property_names(&cause.message);
    if !unknown.is_empty() {
        let valid = valid_properties(schema, &cause.instance_path);
        if !valid.is_empty() {
            let listing = format!("Valid properties at this location: {}", valid.join(", "));
            let suggestion = unknown.iter().find_map(|name| closest_match(name, &valid));
            return match suggestion {
                Some(suggestion) => format!("Did you mean '{}'? {}", suggestion, listing),
                None => listing,
            };
        }
    }

    if cause.instance_path.first().map(String::as_str) == Some("engine") {
        return format!("Valid engines are: {}", registry.engine_ids().join(", "));
    }

    DEFAULT_HINT.to_string()
}

/// Property names the schema declares for the object at `path`.
pub fn valid_properties(schema: &Value, path: &[String]) -> Vec<String> {
    let mut node = deref(schema, schema);
    for segment in path {
        match child_schema(schema, node, segment) {
            Some(child) => node = child,
            None => return Vec::new(),
        }
    }

    let mut names: Vec<String> = Vec::new();
    for candidate in alternatives(schema, node) {
        if let Some(props) = candidate.get("properties").and_then(Value::as_object) {
            for name in props.keys() {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
    }
    names
}

/// Follow local `$ref`s (`#/definitions/...`).
fn deref<'a>(root: &'a Value, node: &'a Value) -> &'a Value {
    let mut current = node;
    // Bounded so a self-referencing definition cannot loop.
    for _ in 0..8 {
        let Some(target) = current
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|r| r.strip_prefix('#'))
            .and_then(|pointer| root.pointer(pointer))
        else {
            break;
        };
        current = target;
    }
    current
}

/// The node itself plus its `oneOf`/`anyOf`/`allOf` branches, dereferenced.
fn alternatives<'a>(root: &'a Value, node: &'a Value) -> Vec<&'a Value> {
    let mut result = vec![node];
    for keyword in ["oneOf", "anyOf", "allOf"] {
        if let Some(branches) = node.get(keyword).and_then(Value::as_array) {
            result.extend(branches.iter().map(|branch| deref(root, branch)));
        }
    }
    result
}

fn child_schema<'a>(root: &'a Value, node: &'a Value, segment: &str) -> Option<&'a Value> {
    let is_index = !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit());
    alternatives(root, node).into_iter().find_map(|candidate| {
        let child = if is_index {
            candidate.get("items")
        } else {
            candidate
                .get("properties")
                .and_then(|props| props.get(segment))
                .or_else(|| candidate.get("additionalProperties").filter(|ap| ap.is_object()))
        };
        child.map(|c| deref(root, c))
    })
}

/// The closest valid name within edit distance 2, scaled down for short
/// names so `foo` does not suggest `on`.
pub fn closest_match<'a>(name: &str, valid: &'a [String]) -> Option<&'a str> {
    let len = name.chars().count();
    valid
        .iter()
        .map(|candidate| (levenshtein_distance(name, candidate), candidate))
        .filter(|(distance, _)| *distance > 0 && *distance <= 2 && *distance * 3 <= len)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.as_str())
}

/// Simple Levenshtein distance calculation.
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1).min((curr[j - 1] + 1).min(prev[j - 1] + cost));
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DefaultEngineRegistry;
    use crate::schema::SchemaKind;

    fn cause(path: &[&str], message: &str) -> ValidationCause {
        ValidationCause {
            instance_path: path.iter().map(|s| s.to_string()).collect(),
            pointer: path.iter().map(|s| format!("/{}", s)).collect(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("timeout", "timeout_minutes"), 8);
        assert_eq!(levenshtein_distance("permisions", "permissions"), 1);
        assert_eq!(levenshtein_distance("", "abc"), 3);
    }

    #[test]
    fn test_valid_properties_follow_refs() {
        let schema = SchemaKind::MainWorkflow.document().unwrap();
        let github = valid_properties(schema, &["tools".to_string(), "github".to_string()]);
        assert_eq!(github, vec!["allowed", "docker_image_version", "read-only", "toolsets"]);

        let engine = valid_properties(schema, &["engine".to_string()]);
        assert!(engine.contains(&"permissions".to_string()));
    }

    #[test]
    fn test_custom_tool_properties_via_additional_properties() {
        let schema = SchemaKind::MainWorkflow.document().unwrap();
        let custom = valid_properties(schema, &["tools".to_string(), "my-server".to_string()]);
        assert!(custom.contains(&"command".to_string()));
    }

    #[test]
    fn test_hint_did_you_mean() {
        let schema = SchemaKind::IncludedFile.document().unwrap();
        let hint = build_hint(
            schema,
            &cause(&[], "Additional properties are not allowed ('tool' was unexpected)"),
            &DefaultEngineRegistry,
        );
        assert_eq!(hint, "Did you mean 'tools'? Valid properties at this location: engine, tools");
    }

    #[test]
    fn test_closest_match_thresholds() {
        let valid: Vec<String> = ["on", "permissions", "tools"].iter().map(|s| s.to_string()).collect();
        assert_eq!(closest_match("permisions", &valid), Some("permissions"));
        assert_eq!(closest_match("foo", &valid), None);
        assert_eq!(closest_match("tools", &valid), None);
    }

    #[test]
    fn test_hint_engine_ids() {
        let schema = SchemaKind::MainWorkflow.document().unwrap();
        let hint = build_hint(schema, &cause(&["engine"], "not valid"), &DefaultEngineRegistry);
        assert_eq!(hint, "Valid engines are: claude, codex, custom");
    }

    #[test]
    fn test_default_hint() {
        let schema = SchemaKind::MainWorkflow.document().unwrap();
        let hint = build_hint(schema, &cause(&["timeout_minutes"], "0 is less than the minimum of 1"), &DefaultEngineRegistry);
        assert_eq!(hint, DEFAULT_HINT);
    }
}
