//! `awf locate`: resolve a frontmatter path to a file position.

use super::load_workflow;
use anyhow::{Context, Result, bail};
use awf_schema::locate_json_path_in_yaml;
use awf_yaml::YamlLocator;
use std::path::PathBuf;

#[derive(Debug)]
pub struct LocateArgs {
    pub file: PathBuf,
    pub path: String,
    /// `path` is a JSON pointer
    pub pointer: bool,
}

pub fn execute(args: LocateArgs) -> Result<()> {
    let workflow = load_workflow(&args.file)?;
    if !workflow.parsed.has_frontmatter() {
        bail!("{} has no frontmatter", args.file.display());
    }
    let yaml = workflow.parsed.frontmatter_text();
    let file = args.file.display();

    if args.pointer {
        let location = locate_json_path_in_yaml(&yaml, &args.path);
        if !location.found {
            bail!("pointer '{}' not found in {}", args.path, file);
        }
        println!("{}:{}:{}", file, workflow.parsed.file_line(location.line), location.column);
        return Ok(());
    }

    let locator = YamlLocator::new(&yaml).with_context(|| format!("failed to parse frontmatter of {}", file))?;
    let span = locator
        .locate(&args.path)
        .with_context(|| format!("cannot locate '{}' in {}", args.path, file))?;
    println!(
        "{}:{}:{}-{}:{}",
        file,
        workflow.parsed.file_line(span.start_line),
        span.start_column,
        workflow.parsed.file_line(span.end_line),
        span.end_column
    );
    Ok(())
}
