//! Error types for tool merging and MCP extraction.

use awf_schema::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    /// Two MCP definitions of the same tool disagree on a key.
    #[error("MCP tool '{tool}' has conflicting values for '{key}'")]
    Conflict { tool: String, key: String },

    /// A tools fragment is not a JSON object.
    #[error("invalid tools fragment '{fragment}': {reason}")]
    Parse { fragment: String, reason: String },
}

#[derive(Debug, Error)]
pub enum McpError {
    #[error("MCP server '{server}' is missing '{field}'")]
    MissingField { server: String, field: &'static str },

    #[error("MCP server '{server}' has unsupported type '{server_type}'")]
    UnsupportedType { server: String, server_type: String },

    #[error("MCP server '{server}' has an invalid 'mcp' section: {reason}")]
    InvalidSection { server: String, reason: String },

    #[error("MCP server '{server}' failed validation: {source}")]
    Validation {
        server: String,
        #[source]
        source: SchemaError,
    },
}
