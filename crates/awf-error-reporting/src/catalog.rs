//! Error code catalog and lookup.
//!
//! Maps error codes (like "AWF-2-1") to their subsystem, title and default
//! message. The catalog is embedded at compile time.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata for an error code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    /// Subsystem name (e.g., "yaml", "schema", "include")
    pub subsystem: String,

    /// Short title for the error
    pub title: String,

    /// Default problem statement, used when a message carries none
    pub message_template: String,
}

/// Global error catalog, parsed lazily from the embedded JSON.
///
/// A malformed catalog yields an empty map; `test_catalog_loads` guards it.
pub static ERROR_CATALOG: Lazy<HashMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    let json_data = include_str!("../error_catalog.json");
    serde_json::from_str(json_data).unwrap_or_default()
});

/// Look up error code information.
///
/// # Example
///
/// ```
/// use awf_error_reporting::catalog::get_error_info;
///
/// let info = get_error_info("AWF-1-2").unwrap();
/// assert_eq!(info.title, "Unclosed Frontmatter");
/// ```
pub fn get_error_info(code: &str) -> Option<&'static ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}
