//! Result reporting: stdout echo, in-place rewrite, colorized diffs.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use similar::{DiffTag, TextDiff};

use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::options::Input;

/// Lines of context around each diff hunk.
const DIFF_CONTEXT: usize = 3;

/// Report the outcome for one input, returning whether its text changed.
///
/// Stdin input and `--stdout` echo the formatted text verbatim (no trailing
/// newline added, no diff, no file write); stdin prints even under `--check`.
/// File inputs are rewritten in place when changed (unless `--check`), then a
/// colorized unified diff or a `no change for <name>` line goes to stdout
/// unless `-n/--no-print-diff` is set.
pub fn report(config: &ResolvedConfig, formatted: &str) -> Result<bool> {
    let changed = config.text != formatted;
    let path = match &config.source {
        Input::Stdin => {
            echo(formatted)?;
            return Ok(changed);
        }
        Input::Path(path) => path,
    };
    if config.stdout {
        echo(formatted)?;
        return Ok(changed);
    }

    if changed && !config.check {
        fs::write(path, formatted)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    if config.no_print_diff {
        return Ok(changed);
    }

    let name = display_name(path);
    if changed {
        print!("{}", render_diff(&config.text, formatted, &name));
    } else {
        println!("no change for {name}");
    }
    Ok(changed)
}

fn echo(formatted: &str) -> Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(formatted.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Path relative to the current directory when possible, absolute otherwise.
pub(crate) fn display_name(path: &Path) -> String {
    env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(&cwd).map(Path::to_path_buf).ok())
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

/// Render a unified diff with `+` lines green and `-` lines red (the
/// `---`/`+++` file headers included), resetting after every line.
///
/// Diffing happens on terminator-stripped lines, so texts differing only in
/// a trailing newline render as empty (and nothing is printed for them).
pub(crate) fn render_diff(before: &str, after: &str, name: &str) -> String {
    let old: Vec<&str> = before.lines().collect();
    let new: Vec<&str> = after.lines().collect();
    let diff = TextDiff::from_slices(&old, &new);
    let groups = diff.grouped_ops(DIFF_CONTEXT);
    if groups.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", format!("--- {name}").red());
    let _ = writeln!(out, "{}", format!("+++ {name}").green());
    for group in &groups {
        let old_range = group[0].old_range().start..group[group.len() - 1].old_range().end;
        let new_range = group[0].new_range().start..group[group.len() - 1].new_range().end;
        let _ = writeln!(
            out,
            "@@ -{} +{} @@",
            format_range(old_range.start, old_range.end),
            format_range(new_range.start, new_range.end),
        );
        for op in group {
            match op.tag() {
                DiffTag::Equal => {
                    for line in &old[op.old_range()] {
                        let _ = writeln!(out, " {line}");
                    }
                }
                DiffTag::Delete => push_removals(&mut out, &old[op.old_range()]),
                DiffTag::Insert => push_additions(&mut out, &new[op.new_range()]),
                DiffTag::Replace => {
                    push_removals(&mut out, &old[op.old_range()]);
                    push_additions(&mut out, &new[op.new_range()]);
                }
            }
        }
    }
    out
}

fn push_removals(out: &mut String, lines: &[&str]) {
    for line in lines {
        let _ = writeln!(out, "{}", format!("-{line}").red());
    }
}

fn push_additions(out: &mut String, lines: &[&str]) {
    for line in lines {
        let _ = writeln!(out, "{}", format!("+{line}").green());
    }
}

/// Format one side of a hunk header the standard unified-diff way:
/// 1-based start, `,length` omitted for single-line ranges, and an
/// unadjusted start for empty ones (e.g. `-0,0`).
fn format_range(start: usize, end: usize) -> String {
    let length = end - start;
    match length {
        1 => format!("{}", start + 1),
        0 => format!("{start},0"),
        _ => format!("{},{length}", start + 1),
    }
}
