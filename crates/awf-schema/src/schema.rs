//! The embedded schema documents.
//!
//! Each schema is parsed and compiled once per process, on first use, and
//! never mutated afterwards.

use crate::error::{Result, SchemaError};
use jsonschema::{Draft, Validator};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::fmt;

/// Which embedded schema to validate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// Frontmatter of a workflow under `.github/workflows`.
    MainWorkflow,
    /// Frontmatter of a file pulled in by `@include`.
    IncludedFile,
    /// A single MCP server definition.
    McpConfig,
}

struct CompiledSchema {
    document: Value,
    validator: Validator,
}

type Compiled = std::result::Result<CompiledSchema, String>;

static MAIN_WORKFLOW: Lazy<Compiled> = Lazy::new(|| compile(include_str!("../schemas/main_workflow_schema.json")));
static INCLUDED_FILE: Lazy<Compiled> = Lazy::new(|| compile(include_str!("../schemas/included_file_schema.json")));
static MCP_CONFIG: Lazy<Compiled> = Lazy::new(|| compile(include_str!("../schemas/mcp_config_schema.json")));

fn compile(text: &str) -> Compiled {
    let document: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    let validator = jsonschema::options()
        .with_draft(Draft::Draft7)
        .build(&document)
        .map_err(|e| e.to_string())?;
    Ok(CompiledSchema {
        document,
        validator,
    })
}

impl SchemaKind {
    pub const ALL: [SchemaKind; 3] = [SchemaKind::MainWorkflow, SchemaKind::IncludedFile, SchemaKind::McpConfig];

    /// File name of the embedded schema asset.
    pub fn name(self) -> &'static str {
        match self {
            SchemaKind::MainWorkflow => "main_workflow_schema.json",
            SchemaKind::IncludedFile => "included_file_schema.json",
            SchemaKind::McpConfig => "mcp_config_schema.json",
        }
    }

    fn compiled(self) -> Result<&'static CompiledSchema> {
        let compiled: &'static Compiled = match self {
            SchemaKind::MainWorkflow => &MAIN_WORKFLOW,
            SchemaKind::IncludedFile => &INCLUDED_FILE,
            SchemaKind::McpConfig => &MCP_CONFIG,
        };
        compiled.as_ref().map_err(|reason| SchemaError::Compile {
            schema: self.name(),
            reason: reason.clone(),
        })
    }

    /// The parsed schema document.
    pub fn document(self) -> Result<&'static Value> {
        self.compiled().map(|c| &c.document)
    }

    pub(crate) fn validator(self) -> Result<&'static Validator> {
        self.compiled().map(|c| &c.validator)
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_schemas_compile() {
        for kind in SchemaKind::ALL {
            assert!(kind.validator().is_ok(), "{} failed to compile", kind);
            assert_eq!(kind.document().unwrap()["$schema"], "http://json-schema.org/draft-07/schema#");
        }
    }

    #[test]
    fn test_included_schema_only_allows_tools_and_engine() {
        let doc = SchemaKind::IncludedFile.document().unwrap();
        let keys: Vec<&str> = doc["properties"].as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["engine", "tools"]);
        assert_eq!(doc["additionalProperties"], false);
    }
}
