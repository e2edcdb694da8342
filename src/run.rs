//! End-to-end driver for a formatter.

use std::ffi::OsString;
use std::io::{self, Read};

use crate::cli::{build_cli, options_from_matches};
use crate::config::load_configs;
use crate::error::Result;
use crate::formatter::TomlFormatter;
use crate::report::report;

/// Run `info` against the process arguments, reading `-` inputs from the
/// real stdin.
///
/// Returns the process exit code: 0 when every input was already formatted,
/// 1 when at least one changed (or would change, under `--check`), 2 for
/// argument errors. Read, parse and formatter failures propagate as errors.
pub fn run<F: TomlFormatter + ?Sized>(info: &F) -> Result<i32> {
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    run_from(info, args, &mut io::stdin().lock())
}

/// [`run`] with an explicit argument list (without the program name) and
/// stdin source, so callers and tests can drive the whole flow in-process.
pub fn run_from<F, I, T>(info: &F, args: I, stdin: &mut dyn Read) -> Result<i32>
where
    F: TomlFormatter + ?Sized,
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let (cmd, registry) = build_cli(info);
    let mut argv = vec![OsString::from(info.prog())];
    argv.extend(args.into_iter().map(Into::into));
    let matches = match cmd.try_get_matches_from(argv) {
        Ok(matches) => matches,
        Err(err) => {
            // clap renders --help/--version on stdout and errors on stderr
            err.print()?;
            return Ok(if err.use_stderr() { 2 } else { 0 });
        }
    };
    let base = options_from_matches(&matches, &registry);

    // resolve every input before formatting any of them
    let configs = load_configs(info, &base, &registry, stdin)?;

    let mut changed_any = false;
    for config in &configs {
        let formatted = info.format(&config.text, &config.opt)?;
        if report(config, &formatted)? {
            changed_any = true;
        }
    }
    Ok(i32::from(changed_any))
}
