//! The pluggable formatter boundary.

use crate::error::Result;
use crate::options::{FlagSpec, OptionSet};

/// Contract a concrete TOML formatter implements to be driven by
/// [`run`](crate::run).
///
/// The harness owns argument parsing, input validation, override resolution
/// and reporting; the implementor owns the actual text transformation.
pub trait TomlFormatter {
    /// Name of the application, used for usage/version output. Must match
    /// the package name.
    fn prog(&self) -> &str;

    /// Version reported by `-V/--version`; implementors normally pass
    /// `env!("CARGO_PKG_VERSION")`.
    fn version(&self) -> &str;

    /// File name appended when an input token is a directory
    /// (e.g. `pyproject.toml`).
    fn filename(&self) -> &str;

    /// Additional flags configuring the formatter. Each one becomes a CLI
    /// argument and an overridable field in the per-document section.
    fn format_flags(&self) -> Vec<FlagSpec> {
        Vec::new()
    }

    /// Path of table names locating the override section inside the
    /// documents being formatted (e.g. `["tool", "sometool"]`).
    fn override_section(&self) -> &[&str];

    /// Format `text` with the effective options for this input.
    ///
    /// Must be a pure function of its inputs; the harness relies on that for
    /// its diffing and idempotence guarantees.
    fn format(&self, text: &str, opt: &OptionSet) -> Result<String>;
}
