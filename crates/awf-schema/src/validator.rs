//! Schema validation with source-located diagnostics.

use crate::context::{context_window, find_frontmatter_bounds};
use crate::engine::{DefaultEngineRegistry, EngineRegistry};
use crate::error::{Result, SchemaError, SchemaViolation, ValidationCause};
use crate::hints::{DEFAULT_HINT, build_hint};
use crate::location::{JsonPathLocation, locate_json_path_in_yaml_with_message, parse_json_pointer, to_locator_path};
use crate::rules::validate_engine_rules;
use crate::schema::SchemaKind;
use awf_error_reporting::CompilerDiagnostic;
use awf_yaml::YamlLocator;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

/// Lines of context shown either side of a diagnostic.
const CONTEXT_RADIUS: usize = 2;

/// Encode `value` to JSON text and decode it back.
///
/// Collapses whatever container types the caller used into plain JSON
/// values. `null` becomes an empty object.
pub fn normalize<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    let text = serde_json::to_string(value)?;
    let value: Value = serde_json::from_str(&text)?;
    Ok(if value.is_null() { Value::Object(Map::new()) } else { value })
}

/// Render causes the way the validation report is printed: a banner line
/// followed by one `- at '<pointer>': <message>` line per cause.
pub fn format_validation_report(schema: SchemaKind, causes: &[ValidationCause]) -> String {
    let mut report = format!("jsonschema validation failed with '{}'", schema.name());
    for cause in causes {
        report.push_str(&format!("\n- at '{}': {}", cause.pointer, cause.message));
    }
    report
}

/// Turn a raw validation report into a user-facing message.
///
/// Drops the banner line and root-pointer prefixes. Falls back to
/// "schema validation failed" when nothing is left.
///
/// ```
/// use awf_schema::clean_validation_message;
///
/// let raw = "jsonschema validation failed with 'main_workflow_schema.json'\n- at '': \"on\" is a required property";
/// assert_eq!(clean_validation_message(raw), "\"on\" is a required property");
/// ```
pub fn clean_validation_message(raw: &str) -> String {
    let cleaned: Vec<String> = raw
        .lines()
        .filter(|line| !line.trim_start().starts_with("jsonschema validation failed"))
        .map(|line| line.replace("- at '': ", ""))
        .filter(|line| !line.trim().is_empty())
        .collect();

    if cleaned.is_empty() {
        "schema validation failed".to_string()
    } else {
        cleaned.join("\n")
    }
}

/// Validate `instance` against `schema` and return every cause.
pub fn collect_causes(schema: SchemaKind, instance: &Value) -> Result<Vec<ValidationCause>> {
    let validator = schema.validator()?;
    Ok(validator
        .iter_errors(instance)
        .map(|error| {
            let pointer = error.instance_path.to_string();
            ValidationCause {
                instance_path: parse_json_pointer(&pointer)
                    .iter()
                    .map(|segment| segment.raw().to_string())
                    .collect(),
                pointer,
                message: error.to_string(),
            }
        })
        .collect())
}

/// Validates frontmatter against the embedded schemas, then applies the
/// engine rules.
#[derive(Debug, Clone, Default)]
pub struct FrontmatterValidator<R = DefaultEngineRegistry> {
    registry: R,
}

impl FrontmatterValidator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: EngineRegistry> FrontmatterValidator<R> {
    pub fn with_registry(registry: R) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Validate `value` against `schema`.
    ///
    /// When `file` is given, a violation carries a [`CompilerDiagnostic`]
    /// pointing into that file. Engine rules run only after the schema
    /// passes, and only for workflow and included-file frontmatter.
    pub fn validate<T: Serialize + ?Sized>(&self, value: &T, schema: SchemaKind, file: Option<&Path>) -> Result<()> {
        let instance = normalize(value)?;
        self.validate_value(&instance, schema, file)
    }

    pub fn validate_value(&self, instance: &Value, schema: SchemaKind, file: Option<&Path>) -> Result<()> {
        let causes = collect_causes(schema, instance)?;
        if !causes.is_empty() {
            return Err(self.violation(schema, causes, file));
        }
        if schema != SchemaKind::McpConfig {
            validate_engine_rules(instance, &self.registry)?;
        }
        Ok(())
    }

    pub fn validate_main_workflow<T: Serialize + ?Sized>(&self, value: &T, file: Option<&Path>) -> Result<()> {
        self.validate(value, SchemaKind::MainWorkflow, file)
    }

    pub fn validate_included_file<T: Serialize + ?Sized>(&self, value: &T, file: Option<&Path>) -> Result<()> {
        self.validate(value, SchemaKind::IncludedFile, file)
    }

    pub fn validate_mcp_config<T: Serialize + ?Sized>(&self, value: &T, file: Option<&Path>) -> Result<()> {
        self.validate(value, SchemaKind::McpConfig, file)
    }

    fn violation(&self, schema: SchemaKind, causes: Vec<ValidationCause>, file: Option<&Path>) -> SchemaError {
        let message = clean_validation_message(&format_validation_report(schema, &causes));
        let pointer = causes.first().map(|cause| cause.pointer.clone()).unwrap_or_default();
        debug!(schema = %schema, pointer = %pointer, causes = causes.len(), "schema validation failed");

        let (location, diagnostic) = match file {
            Some(path) => self.locate(schema, &causes, &message, path),
            None => (None, None),
        };

        SchemaError::Violation(Box::new(SchemaViolation {
            schema,
            pointer,
            message,
            causes,
            location,
            diagnostic,
        }))
    }

    /// Place the first cause inside `path`'s frontmatter.
    fn locate(
        &self,
        schema: SchemaKind,
        causes: &[ValidationCause],
        message: &str,
        path: &Path,
    ) -> (Option<JsonPathLocation>, Option<CompilerDiagnostic>) {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "cannot read file to locate violation");
                return (None, None);
            }
        };
        let lines: Vec<&str> = content.lines().collect();
        let bounds = find_frontmatter_bounds(&lines);
        let frontmatter_start = bounds.map_or(2, |b| b.start_line());
        let frontmatter = bounds.map(|b| b.content(&lines)).unwrap_or_default();

        let location = causes.first().map(|cause| resolve_cause(&frontmatter, cause));
        let (line, column) = match location {
            Some(loc) if loc.found => (loc.line + frontmatter_start - 1, loc.column),
            _ => (frontmatter_start, 1),
        };

        let (first, last) = bounds.map_or((1, lines.len()), |b| (b.open + 1, b.close + 1));
        let (context_start, context) = context_window(&lines, line, CONTEXT_RADIUS, first, last);

        let hint = match (causes.first(), schema.document()) {
            (Some(cause), Ok(document)) => build_hint(document, cause, &self.registry),
            _ => DEFAULT_HINT.to_string(),
        };

        let diagnostic = CompilerDiagnostic::error(path.display().to_string(), line, column, message)
            .with_context(context_start, context)
            .with_hint(hint);
        (location, Some(diagnostic))
    }
}

/// Bridge lookup, with an AST lookup for flow-style values the line scan
/// cannot see into.
fn resolve_cause(frontmatter: &str, cause: &ValidationCause) -> JsonPathLocation {
    let location = locate_json_path_in_yaml_with_message(frontmatter, &cause.pointer, &cause.message);
    if location.found || cause.pointer.is_empty() {
        return location;
    }
    let path = to_locator_path(&parse_json_pointer(&cause.pointer));
    YamlLocator::new(frontmatter)
        .ok()
        .and_then(|locator| locator.locate(&path).ok())
        .map_or(location, |span| JsonPathLocation::at(span.start_line, span.start_column))
}

/// Validate against `schema` only, without engine rules or location.
pub fn validate_with_schema<T: Serialize + ?Sized>(value: &T, schema: SchemaKind) -> Result<()> {
    let instance = normalize(value)?;
    let causes = collect_causes(schema, &instance)?;
    if causes.is_empty() {
        Ok(())
    } else {
        Err(FrontmatterValidator::new().violation(schema, causes, None))
    }
}

pub fn validate_main_workflow_frontmatter<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    FrontmatterValidator::new().validate_main_workflow(value, None)
}

pub fn validate_main_workflow_frontmatter_with_location<T: Serialize + ?Sized>(value: &T, file: &Path) -> Result<()> {
    FrontmatterValidator::new().validate_main_workflow(value, Some(file))
}

pub fn validate_included_file_frontmatter<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    FrontmatterValidator::new().validate_included_file(value, None)
}

pub fn validate_included_file_frontmatter_with_location<T: Serialize + ?Sized>(value: &T, file: &Path) -> Result<()> {
    FrontmatterValidator::new().validate_included_file(value, Some(file))
}

pub fn validate_mcp_config<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    FrontmatterValidator::new().validate_mcp_config(value, None)
}

pub fn validate_mcp_config_with_location<T: Serialize + ?Sized>(value: &T, file: &Path) -> Result<()> {
    FrontmatterValidator::new().validate_mcp_config(value, Some(file))
}
