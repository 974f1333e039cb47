//! # awf-schema
//!
//! Validates workflow frontmatter against embedded JSON schemas and maps
//! violations back to the line and column they came from.
//!
//! - [`location`]: the bridge from the schema engine's JSON pointers to
//!   YAML source positions, with a textual fallback for "additional
//!   properties" errors that carry no usable pointer.
//! - [`FrontmatterValidator`]: normalizes input, validates it, attaches a
//!   [`CompilerDiagnostic`](awf_error_reporting::CompilerDiagnostic) when a
//!   file is given, then runs the engine rules.
//! - [`EngineRegistry`]: which engines exist and what they support.
//!
//! ```
//! use awf_schema::{SchemaKind, validate_with_schema};
//! use serde_json::json;
//!
//! assert!(validate_with_schema(&json!({"tools": {"edit": null}}), SchemaKind::IncludedFile).is_ok());
//! assert!(validate_with_schema(&json!({"on": "push"}), SchemaKind::IncludedFile).is_err());
//! ```

pub mod context;
pub mod engine;
mod error;
pub mod hints;
pub mod location;
pub mod rules;
mod schema;
mod validator;

pub use engine::{DefaultEngineRegistry, EngineInfo, EngineRegistry};
pub use error::{Result, SchemaError, SchemaViolation, ValidationCause};
pub use location::{JsonPathLocation, locate_json_path_in_yaml, locate_json_path_in_yaml_with_message};
pub use rules::validate_engine_rules;
pub use schema::SchemaKind;
pub use validator::{
    FrontmatterValidator, clean_validation_message, collect_causes, format_validation_report, normalize,
    validate_included_file_frontmatter, validate_included_file_frontmatter_with_location,
    validate_main_workflow_frontmatter, validate_main_workflow_frontmatter_with_location, validate_mcp_config,
    validate_mcp_config_with_location, validate_with_schema,
};
