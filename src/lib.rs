//! Shared CLI harness for TOML file formatters.
//!
//! A concrete formatter implements [`TomlFormatter`] and hands it to [`run`];
//! the harness does the rest: clap-based argument parsing, input validation
//! (files, directories, `-` for stdin), per-document option overrides read
//! from a section inside the TOML document itself, and reporting via stdout
//! echo, in-place rewrite or colorized unified diff. The exit code is 0 when
//! nothing would change and 1 otherwise.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod options;
pub mod report;
pub mod run;

// Re-export commonly used types
pub use cli::{build_cli, validate_input};
pub use config::{resolve, ResolvedConfig};
pub use error::{PathError, Result};
pub use formatter::TomlFormatter;
pub use options::{
    Convert, FlagKind, FlagSpec, Input, OptionSet, OptionValue, DEFAULT_COLUMN_WIDTH,
    DEFAULT_INDENT,
};
pub use run::{run, run_from};
