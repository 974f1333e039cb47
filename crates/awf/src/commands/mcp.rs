//! `awf mcp`: MCP server configuration after include merging.

use super::{load_workflow, report_notes};
use anyhow::{Context, Result, bail};
use awf_config::{EnvTokenProvider, extract_mcp_configurations};
use awf_include::merge_tools_from_includes;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug)]
pub struct McpArgs {
    pub file: PathBuf,
    pub server: Option<String>,
}

pub fn execute(args: McpArgs) -> Result<()> {
    let workflow = load_workflow(&args.file)?;
    let (tools, output) = merge_tools_from_includes(&workflow.tools(), &workflow.parsed.markdown, workflow.base_dir())
        .with_context(|| format!("failed to process includes of {}", args.file.display()))?;
    report_notes(&output.notes, false);

    let mut frontmatter = workflow.parsed.frontmatter.clone();
    frontmatter.insert("tools".to_string(), Value::Object(tools));

    let servers = extract_mcp_configurations(&frontmatter, args.server.as_deref(), &EnvTokenProvider)
        .with_context(|| format!("invalid MCP configuration in {}", args.file.display()))?;
    if let Some(name) = &args.server
        && servers.is_empty()
    {
        bail!("no MCP server named '{}' in {}", name, args.file.display());
    }
    println!("{}", serde_json::to_string_pretty(&servers)?);
    Ok(())
}
