//! Error types and result aliases for the harness.
//!
//! I/O and parse failures propagate as `anyhow` errors; input path
//! validation has its own typed error so the four failure kinds stay
//! distinguishable in CLI output.

use thiserror::Error;

pub type Result<T> = anyhow::Result<T>;

/// Why a positional input token was rejected.
///
/// Surfaced through clap as a value-parser failure, so the user sees the
/// message in the parser's standard error format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path does not exist")]
    NotFound,
    #[error("path is not a file")]
    NotAFile,
    #[error("cannot read path")]
    Unreadable,
    #[error("cannot write path")]
    Unwritable,
}
