//! # awf-include
//!
//! Expands `@include` directives in workflow markdown.
//!
//! ```text
//! @include shared/setup.md            required, whole body
//! @include? shared/local.md           optional, skipped with a note when missing
//! @include shared/guide.md#Usage      only the `Usage` section
//! ```
//!
//! In body mode directives are replaced by the included markdown. In tools
//! mode each directive becomes one JSON line holding the included file's
//! `tools`, which [`merge_tools_from_includes`] folds into the workflow's
//! own `tools` with [`awf_config::merge_included_tools`].
//!
//! Included files under `.github/workflows` must pass the included-file
//! schema; elsewhere problems only produce warnings in
//! [`ExpandOutput::notes`].

mod directive;
mod error;
mod expand;

pub use directive::{IncludeDirective, has_directive, rebase_directives};
pub use error::{IncludeError, Result};
pub use expand::{
    ALLOWED_INCLUDE_KEYS, DEFAULT_MAX_DEPTH, ExpandOptions, ExpandOutput, expand_includes, expand_includes_in_body,
    extract_included_tools, merge_tools_from_includes,
};
