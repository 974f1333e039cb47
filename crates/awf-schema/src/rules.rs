//! Rules checked after schema validation succeeds.
//!
//! Each rule sees the normalized frontmatter and the engine registry and
//! returns a message on violation. Rules run in order; the first violation
//! wins.

use crate::engine::EngineRegistry;
use crate::error::{Result, SchemaError};
use serde_json::Value;

type Rule = fn(&Value, &dyn EngineRegistry) -> std::result::Result<(), String>;

const ENGINE_RULES: &[Rule] = &[engine_is_known, engine_permissions_supported];

/// Apply every engine rule to `frontmatter`.
pub fn validate_engine_rules(frontmatter: &Value, registry: &dyn EngineRegistry) -> Result<()> {
    for rule in ENGINE_RULES {
        rule(frontmatter, registry).map_err(SchemaError::EngineRule)?;
    }
    Ok(())
}

/// The engine id from `engine: <id>` or `engine: {id: <id>}`.
pub fn engine_id(frontmatter: &Value) -> Option<&str> {
    match frontmatter.get("engine")? {
        Value::String(id) => Some(id),
        Value::Object(map) => map.get("id").and_then(Value::as_str),
        _ => None,
    }
}

fn engine_is_known(frontmatter: &Value, registry: &dyn EngineRegistry) -> std::result::Result<(), String> {
    match engine_id(frontmatter) {
        Some(id) if !registry.is_known(id) => Err(format!(
            "invalid engine: {}. Valid engines are: {}",
            id,
            registry.engine_ids().join(", ")
        )),
        _ => Ok(()),
    }
}

fn engine_permissions_supported(frontmatter: &Value, registry: &dyn EngineRegistry) -> std::result::Result<(), String> {
    let has_permissions = frontmatter
        .get("engine")
        .and_then(|engine| engine.get("permissions"))
        .is_some();
    match engine_id(frontmatter) {
        Some(id) if has_permissions && !registry.supports_permissions(id) => Err(format!(
            "engine.permissions is not supported for the '{}' engine; remove it or use an engine that supports permissions",
            id
        )),
        _ => Ok(()),
    }
}
