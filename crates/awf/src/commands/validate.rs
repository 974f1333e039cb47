//! `awf validate`: schema validation with source-located diagnostics.

use super::{load_workflow, report_diagnostic, report_notes};
use anyhow::{Context, Result, bail};
use awf_include::merge_tools_from_includes;
use awf_schema::{FrontmatterValidator, SchemaError, SchemaKind};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug)]
pub struct ValidateArgs {
    pub file: PathBuf,
    /// Validate as an included file rather than a main workflow
    pub included: bool,
    pub json: bool,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    let workflow = load_workflow(&args.file)?;
    let kind = if args.included {
        SchemaKind::IncludedFile
    } else {
        SchemaKind::MainWorkflow
    };
    debug!(file = %args.file.display(), schema = %kind, "validating");

    let validator = FrontmatterValidator::new();
    if let Err(err) = validator.validate(&workflow.parsed.frontmatter, kind, Some(&workflow.path)) {
        report_schema_error(&err, args.json);
        bail!("{} failed validation", args.file.display());
    }

    if !args.included {
        let (tools, output) = merge_tools_from_includes(&workflow.tools(), &workflow.parsed.markdown, workflow.base_dir())
            .with_context(|| format!("failed to process includes of {}", args.file.display()))?;
        report_notes(&output.notes, args.json);
        info!(tools = tools.len(), "includes merged");
    }

    if !args.json {
        println!("{}: ok", args.file.display());
    }
    Ok(())
}

fn report_schema_error(err: &SchemaError, json: bool) {
    match err.violation().and_then(|violation| violation.diagnostic.as_ref()) {
        Some(diagnostic) => report_diagnostic(diagnostic, json),
        None => eprintln!("error: {}", err),
    }
}
