//! `awf expand`: include expansion.

use super::{load_workflow, report_notes};
use anyhow::{Context, Result};
use awf_include::{ExpandOptions, expand_includes};
use serde_json::Value;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug)]
pub struct ExpandArgs {
    pub file: PathBuf,
    /// Print merged tools instead of markdown
    pub tools: bool,
    pub max_depth: usize,
    pub json: bool,
}

pub fn execute(args: ExpandArgs) -> Result<()> {
    let workflow = load_workflow(&args.file)?;
    let options = ExpandOptions {
        max_depth: args.max_depth,
        extract_tools: args.tools,
    };

    let output = expand_includes(&workflow.parsed.markdown, workflow.base_dir(), options)
        .with_context(|| format!("failed to expand includes in {}", args.file.display()))?;
    report_notes(&output.notes, args.json);
    if output.depth_exhausted {
        warn!(file = %args.file.display(), "output may be incomplete");
    }

    if args.tools {
        let merged = awf_config::merge_included_tools(&workflow.tools(), &output.content)
            .with_context(|| format!("failed to merge tools for {}", args.file.display()))?;
        println!("{}", serde_json::to_string_pretty(&Value::Object(merged))?);
    } else {
        print!("{}", output.content);
        if !output.content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
