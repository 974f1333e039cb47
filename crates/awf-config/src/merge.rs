//! Deep merge of `tools` maps contributed by included files.
//!
//! Merging is order-sensitive: arrays keep first-seen order when unioned and
//! the later map wins when scalars are overwritten. Two definitions of the
//! same MCP server must agree on every key except `allowed` (unioned) and a
//! nested `mcp` section (merged recursively under the same rule).

use crate::error::MergeError;
use serde_json::{Map, Value};
use tracing::debug;

/// Type tags that mark a tool definition as an MCP server.
pub const MCP_TYPES: &[&str] = &["stdio", "http", "docker"];

/// The MCP type of a tool definition, read from `type` or `mcp.type`.
pub fn mcp_type(config: &Map<String, Value>) -> Option<&str> {
    let direct = config.get("type").and_then(Value::as_str);
    let nested = config
        .get("mcp")
        .and_then(Value::as_object)
        .and_then(|mcp| mcp.get("type"))
        .and_then(Value::as_str);
    direct.or(nested).filter(|t| MCP_TYPES.contains(t))
}

pub fn is_mcp_config(config: &Map<String, Value>) -> bool {
    mcp_type(config).is_some()
}

/// Merge `additional` into `base`, returning the merged map.
///
/// ```
/// use awf_config::merge_tools;
/// use serde_json::json;
///
/// let base = json!({"github": {"allowed": ["get_issue"]}});
/// let more = json!({"github": {"allowed": ["get_issue", "add_comment"]}, "edit": {}});
/// let merged = merge_tools(base.as_object().unwrap(), more.as_object().unwrap()).unwrap();
/// assert_eq!(merged["github"]["allowed"], json!(["get_issue", "add_comment"]));
/// assert!(merged.contains_key("edit"));
/// ```
///
/// # Errors
///
/// [`MergeError::Conflict`] when two MCP server definitions disagree.
pub fn merge_tools(base: &Map<String, Value>, additional: &Map<String, Value>) -> Result<Map<String, Value>, MergeError> {
    let mut result = base.clone();
    for (name, incoming) in additional {
        let merged = match (result.get(name), incoming) {
            (None, _) => incoming.clone(),
            (Some(Value::Array(old)), Value::Array(new)) => Value::Array(union(old, new)),
            (Some(Value::Object(old)), Value::Object(new)) => Value::Object(merge_objects(name, old, new)?),
            (Some(_), _) => incoming.clone(),
        };
        result.insert(name.clone(), merged);
    }
    Ok(result)
}

/// Fold newline-separated JSON `tools` fragments into `base`, in order.
///
/// Blank lines are skipped.
pub fn merge_included_tools(base: &Map<String, Value>, fragments: &str) -> Result<Map<String, Value>, MergeError> {
    let mut result = base.clone();
    for fragment in fragments.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let value: Value = serde_json::from_str(fragment).map_err(|err| MergeError::Parse {
            fragment: fragment.to_string(),
            reason: err.to_string(),
        })?;
        let Value::Object(tools) = value else {
            return Err(MergeError::Parse {
                fragment: fragment.to_string(),
                reason: "expected a JSON object".to_string(),
            });
        };
        result = merge_tools(&result, &tools)?;
    }
    debug!(tools = result.len(), "merged included tools");
    Ok(result)
}

fn merge_objects(name: &str, old: &Map<String, Value>, new: &Map<String, Value>) -> Result<Map<String, Value>, MergeError> {
    if is_mcp_config(old) && is_mcp_config(new) {
        return merge_mcp(name, "", old, new);
    }

    if let (Some(Value::Array(old_allowed)), Some(Value::Array(new_allowed))) = (old.get("allowed"), new.get("allowed")) {
        let mut result = old.clone();
        for (key, value) in new {
            result.insert(key.clone(), value.clone());
        }
        result.insert("allowed".to_string(), Value::Array(union(old_allowed, new_allowed)));
        return Ok(result);
    }

    merge_tools(old, new)
}

/// Conflict-checked merge of two MCP definitions of `tool`. `prefix` is the
/// dotted path of the section being merged, for error messages.
fn merge_mcp(tool: &str, prefix: &str, old: &Map<String, Value>, new: &Map<String, Value>) -> Result<Map<String, Value>, MergeError> {
    let mut result = old.clone();
    for (key, incoming) in new {
        let merged = match (key.as_str(), result.get(key), incoming) {
            (_, None, _) => incoming.clone(),
            ("allowed", Some(Value::Array(a)), Value::Array(b)) => Value::Array(union(a, b)),
            ("mcp", Some(Value::Object(a)), Value::Object(b)) => {
                Value::Object(merge_mcp(tool, &format!("{}mcp.", prefix), a, b)?)
            }
            (_, Some(existing), _) if existing == incoming => incoming.clone(),
            _ => {
                return Err(MergeError::Conflict {
                    tool: tool.to_string(),
                    key: format!("{}{}", prefix, key),
                });
            }
        };
        result.insert(key.clone(), merged);
    }
    Ok(result)
}

/// `old` followed by the items of `new` it lacks, without duplicates.
fn union(old: &[Value], new: &[Value]) -> Vec<Value> {
    let mut result: Vec<Value> = Vec::with_capacity(old.len() + new.len());
    for item in old.iter().chain(new) {
        if !result.contains(item) {
            result.push(item.clone());
        }
    }
    result
}
