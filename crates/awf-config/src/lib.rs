//! Tool configuration merging for workflows.
//!
//! Included files contribute `tools` fragments that are folded into the
//! main workflow's `tools` map in directive order. The merge is
//! type-directed:
//!
//! - arrays are unioned, first occurrence wins the position
//! - two MCP server definitions must agree on every key but `allowed`
//! - plain maps with `allowed` on both sides union it and overwrite the rest
//! - other maps merge recursively, and a type change replaces the value
//!
//! [`extract_mcp_configurations`] turns the merged map into the MCP servers
//! an engine has to start.

mod error;
mod mcp;
mod merge;

pub use error::{McpError, MergeError};
pub use mcp::{
    DEFAULT_GITHUB_MCP_VERSION, EnvTokenProvider, GITHUB_MCP_IMAGE, GITHUB_TOKEN_PLACEHOLDER, McpServerConfig,
    McpServerType, TokenProvider, extract_mcp_configurations,
};
pub use merge::{MCP_TYPES, is_mcp_config, mcp_type, merge_included_tools, merge_tools};
