//! Error reporting and diagnostic messages for agentic workflows.
//!
//! Two shapes of diagnostic live here:
//!
//! - [`DiagnosticMessage`]: a structured note (title, problem, bulleted
//!   details, hints) used on side channels such as the include expander's
//!   warnings.
//! - [`CompilerDiagnostic`]: a `file:line:column` diagnostic with source
//!   context, rendered by a [`DiagnosticFormatter`].
//!
//! Error codes (`AWF-<subsystem>-<number>`) are listed in the embedded
//! [`catalog`]; a coded message without its own problem statement renders
//! the catalog's default one.

pub mod builder;
pub mod catalog;
pub mod compiler;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info};
pub use compiler::{CompilerDiagnostic, DiagnosticFormatter, PlainFormatter};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage};
