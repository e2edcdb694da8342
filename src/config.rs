//! Per-input configuration resolution.
//!
//! A document may carry its own overrides for the registered flags inside a
//! section the formatter names (e.g. `[tool.sometool]`). Resolution walks
//! that section path through the parsed document and applies matching keys to
//! a clone of the command-line options. A missing section, a non-table
//! section, or a non-table intermediate segment all mean "no override" — a
//! deliberate tolerance for partially structured documents, not an error.

use std::fs;
use std::io::Read;

use anyhow::Context;

use crate::error::Result;
use crate::formatter::TomlFormatter;
use crate::options::{FlagSpec, Input, OptionSet, OptionValue};

/// Everything needed to format and report one input; immutable once built.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Where the text came from (and, for files, where it is written back).
    pub source: Input,
    /// The original document text.
    pub text: String,
    pub stdout: bool,
    pub check: bool,
    pub no_print_diff: bool,
    /// Effective options for this input: the command-line options with any
    /// in-document overrides applied to a private clone.
    pub opt: OptionSet,
}

/// Compute the effective options for one parsed document.
///
/// `base` is never mutated; the result is always an independent clone.
/// Only fields in `registry` can be overridden — the run-mode fields are not
/// in it and therefore always come from the command line.
///
/// A declared conversion failing on an override value is a real error; an
/// override whose TOML type has no [`OptionValue`] representation is skipped.
pub fn resolve(
    base: &OptionSet,
    doc: &toml::Value,
    section: &[&str],
    registry: &[FlagSpec],
) -> Result<OptionSet> {
    let mut opt = base.clone();

    let mut cursor = Some(doc);
    for part in section {
        cursor = cursor
            .and_then(toml::Value::as_table)
            .and_then(|table| table.get(*part));
    }
    let Some(table) = cursor.and_then(toml::Value::as_table) else {
        return Ok(opt);
    };

    for spec in registry {
        let Some(raw) = table.get(spec.name) else {
            continue;
        };
        let value = match spec.convert {
            Some(convert) => convert(raw)
                .map_err(|msg| anyhow::anyhow!("invalid override for '{}': {msg}", spec.name))?,
            None => match OptionValue::from_toml(raw) {
                Some(value) => value,
                None => continue,
            },
        };
        opt.set(spec.name, value);
    }
    Ok(opt)
}

/// Load and resolve every input of the run, before anything is formatted.
///
/// Reading or parsing failure aborts the whole run; no input is formatted
/// when any input is unreadable or not valid TOML.
pub(crate) fn load_configs<F: TomlFormatter + ?Sized>(
    info: &F,
    base: &OptionSet,
    registry: &[FlagSpec],
    stdin: &mut dyn Read,
) -> Result<Vec<ResolvedConfig>> {
    let mut configs = Vec::with_capacity(base.inputs.len());
    for input in &base.inputs {
        let text = match input {
            Input::Stdin => {
                let mut buf = String::new();
                stdin
                    .read_to_string(&mut buf)
                    .context("failed to read stdin")?;
                buf
            }
            Input::Path(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        };
        let doc: toml::Value =
            toml::from_str(&text).with_context(|| format!("invalid TOML in {input}"))?;
        let opt = resolve(base, &doc, info.override_section(), registry)?;
        configs.push(ResolvedConfig {
            source: input.clone(),
            text,
            stdout: base.stdout,
            check: base.check,
            no_print_diff: base.no_print_diff,
            opt,
        });
    }
    Ok(configs)
}
