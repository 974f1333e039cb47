//! # awf-frontmatter
//!
//! Splits workflow documents into their YAML frontmatter and markdown body,
//! keeping the line offsets needed to map frontmatter positions back to the
//! file.
//!
//! The frontmatter is parsed with [`awf_yaml`] and handed out as a
//! `serde_json` map, the shape the schema validator and the tool merger
//! work on. Helpers slice a single top-level key's block out of the YAML
//! text and a named section out of the markdown body.

mod error;
mod extract;
mod naming;
mod sections;

pub use error::{FrontmatterError, Result};
pub use extract::{
    FrontmatterResult, extract_frontmatter_from_content, extract_frontmatter_from_file, extract_markdown_body,
};
pub use naming::{default_title_from_filename, extract_workflow_name, is_under_workflows_dir};
pub use sections::{extract_key_block, extract_markdown_section};
