//! Command-line surface for the harness.
//!
//! Builds the clap command from the shared flags plus whatever the concrete
//! formatter registers, and validates positional input tokens. Path
//! validation runs inside clap's value parser so a bad input fails the same
//! way a bad flag does: usage plus message on stderr, nothing processed.

use std::env;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::error::PathError;
use crate::formatter::TomlFormatter;
use crate::options::{
    FlagKind, FlagSpec, Input, OptionSet, OptionValue, DEFAULT_COLUMN_WIDTH, DEFAULT_INDENT,
};

/// Flags every formatter shares; these are overridable per document like any
/// formatter-registered field.
#[allow(clippy::cast_possible_wrap)]
fn shared_flags() -> Vec<FlagSpec> {
    vec![
        FlagSpec::value(
            "column_width",
            OptionValue::Int(DEFAULT_COLUMN_WIDTH as i64),
            "max column width in the TOML file",
        ),
        FlagSpec::value(
            "indent",
            OptionValue::Int(DEFAULT_INDENT as i64),
            "number of spaces to use for indentation",
        ),
    ]
}

/// Build the clap Command and the flag registry for one run.
///
/// The registry (shared flags followed by the formatter's) is exactly the set
/// of fields the Config Resolver may override.
pub fn build_cli<F: TomlFormatter + ?Sized>(info: &F) -> (Command, Vec<FlagSpec>) {
    let mut registry = shared_flags();
    registry.extend(info.format_flags());

    let mut cmd = Command::new(info.prog().to_owned())
        .version(format!("({})", info.version()))
        .next_help_heading("run mode")
        .arg(
            Arg::new("stdout")
                .short('s')
                .long("stdout")
                .help("print the formatted TOML to the stdout, implied if reading from stdin")
                .action(ArgAction::SetTrue)
                .conflicts_with("check"),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("check and fail if any input would be formatted, printing any diffs")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-print-diff")
                .short('n')
                .long("no-print-diff")
                .help("do not print diffs or no-change messages")
                .action(ArgAction::SetTrue),
        )
        .next_help_heading("formatting behavior");

    for spec in &registry {
        cmd = cmd.arg(flag_arg(spec));
    }

    let filename = info.filename().to_owned();
    cmd = cmd.next_help_heading(None::<&str>).arg(
        Arg::new("inputs")
            .help("TOML file(s) to format, use '-' to read from stdin")
            .value_name("FILE")
            .num_args(1..)
            .required(true)
            .value_parser(move |token: &str| validate_input(&filename, token)),
    );

    (cmd, registry)
}

/// Translate one registered flag into a clap Arg.
fn flag_arg(spec: &FlagSpec) -> Arg {
    let mut arg = Arg::new(spec.name).help(spec.help);
    match &spec.kind {
        FlagKind::Switch => {
            arg = arg.long(spec.name.replace('_', "-")).action(ArgAction::SetTrue);
        }
        FlagKind::Value { .. } => {
            arg = arg
                .long(spec.name.replace('_', "-"))
                .value_name("value")
                .value_parser(raw_value_parser(spec));
        }
        FlagKind::Positional => {
            arg = arg.required(true).value_parser(raw_value_parser(spec));
        }
    }
    if let Some(short) = spec.short {
        arg = arg.short(short);
    }
    arg
}

/// Value parser for a flag taking a value.
///
/// A declared conversion sees the argument wrapped as a TOML string, so the
/// command line and the override section share one conversion path. Without
/// one, the raw string is parsed to match the default's type.
fn raw_value_parser(
    spec: &FlagSpec,
) -> impl Fn(&str) -> Result<OptionValue, String> + Clone + Send + Sync + 'static {
    let convert = spec.convert;
    let default = match &spec.kind {
        FlagKind::Value { default } => Some(default.clone()),
        _ => None,
    };
    move |raw: &str| {
        if let Some(convert) = convert {
            return convert(&toml::Value::String(raw.to_owned()));
        }
        match default {
            Some(OptionValue::Int(_)) => raw
                .parse::<i64>()
                .map(OptionValue::Int)
                .map_err(|err| err.to_string()),
            Some(OptionValue::Bool(_)) => raw
                .parse::<bool>()
                .map(OptionValue::Bool)
                .map_err(|err| err.to_string()),
            Some(OptionValue::List(_)) => Ok(OptionValue::List(
                raw.split(',').map(str::to_owned).collect(),
            )),
            _ => Ok(OptionValue::Str(raw.to_owned())),
        }
    }
}

/// Convert parsed matches into the run's base [`OptionSet`].
pub(crate) fn options_from_matches(matches: &ArgMatches, registry: &[FlagSpec]) -> OptionSet {
    let inputs = matches
        .get_many::<Input>("inputs")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let mut opt = OptionSet::new(
        inputs,
        matches.get_flag("stdout"),
        matches.get_flag("check"),
        matches.get_flag("no-print-diff"),
    );
    for spec in registry {
        match &spec.kind {
            FlagKind::Switch => {
                opt.set(spec.name, OptionValue::Bool(matches.get_flag(spec.name)));
            }
            FlagKind::Value { default } => {
                let value = matches
                    .get_one::<OptionValue>(spec.name)
                    .cloned()
                    .unwrap_or_else(|| default.clone());
                opt.set(spec.name, value);
            }
            FlagKind::Positional => {
                if let Some(value) = matches.get_one::<OptionValue>(spec.name) {
                    opt.set(spec.name, value.clone());
                }
            }
        }
    }
    opt
}

/// Validate one positional input token.
///
/// `-` is the stdin sentinel and skips the filesystem entirely. Anything else
/// resolves to an absolute path, with `filename` appended when the token is a
/// directory, and must be an existing regular file the process can both read
/// and write. Read/write access is probed by opening the file; nothing is
/// modified.
pub fn validate_input(filename: &str, token: &str) -> Result<Input, PathError> {
    if token == "-" {
        return Ok(Input::Stdin);
    }
    let mut path = PathBuf::from(token);
    if path.is_relative() {
        if let Ok(cwd) = env::current_dir() {
            path = cwd.join(path);
        }
    }
    if path.is_dir() {
        path.push(filename);
    }
    if !path.exists() {
        return Err(PathError::NotFound);
    }
    if !path.is_file() {
        return Err(PathError::NotAFile);
    }
    if File::open(&path).is_err() {
        return Err(PathError::Unreadable);
    }
    if OpenOptions::new().write(true).open(&path).is_err() {
        return Err(PathError::Unwritable);
    }
    Ok(Input::Path(path))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::Result;

    struct Plain;

    impl TomlFormatter for Plain {
        fn prog(&self) -> &str {
            "plain-fmt"
        }

        fn version(&self) -> &str {
            "1.2.3"
        }

        fn filename(&self) -> &str {
            "plain.toml"
        }

        fn format_flags(&self) -> Vec<FlagSpec> {
            vec![
                FlagSpec::switch("keep_order", "keep table order"),
                FlagSpec::value(
                    "max_depth",
                    OptionValue::Int(4),
                    "max nesting depth to rewrite",
                )
                .short('m'),
            ]
        }

        fn override_section(&self) -> &[&str] {
            &["tool", "plain-fmt"]
        }

        fn format(&self, text: &str, _opt: &OptionSet) -> Result<String> {
            Ok(text.to_owned())
        }
    }

    fn parse(args: &[&str]) -> OptionSet {
        let (cmd, registry) = build_cli(&Plain);
        let matches = cmd.try_get_matches_from(args.iter().copied()).unwrap();
        options_from_matches(&matches, &registry)
    }

    #[test]
    fn test_defaults() {
        let opt = parse(&["plain-fmt", "-"]);
        assert_eq!(opt.inputs, vec![Input::Stdin]);
        assert!(!opt.stdout);
        assert!(!opt.check);
        assert!(!opt.no_print_diff);
        assert_eq!(opt.column_width(), 120);
        assert_eq!(opt.indent(), 2);
        assert_eq!(opt.get_bool("keep_order"), Some(false));
        assert_eq!(opt.get_int("max_depth"), Some(4));
    }

    #[test]
    fn test_formatter_flags_parse() {
        let opt = parse(&[
            "plain-fmt",
            "--keep-order",
            "-m",
            "7",
            "--column-width",
            "80",
            "-",
        ]);
        assert_eq!(opt.get_bool("keep_order"), Some(true));
        assert_eq!(opt.get_int("max_depth"), Some(7));
        assert_eq!(opt.column_width(), 80);
    }

    #[test]
    fn test_stdout_conflicts_with_check() {
        let (cmd, _) = build_cli(&Plain);
        let err = cmd
            .try_get_matches_from(["plain-fmt", "-s", "--check", "-"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_inputs_required() {
        let (cmd, _) = build_cli(&Plain);
        assert!(cmd.try_get_matches_from(["plain-fmt"]).is_err());
    }

    #[test]
    fn test_bad_int_value_is_a_parse_error() {
        let (cmd, _) = build_cli(&Plain);
        assert!(cmd
            .try_get_matches_from(["plain-fmt", "--column-width", "wide", "-"])
            .is_err());
    }

    #[test]
    fn test_validate_stdin_sentinel() {
        assert_eq!(validate_input("plain.toml", "-"), Ok(Input::Stdin));
    }

    #[test]
    fn test_validate_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert_eq!(
            validate_input("plain.toml", missing.to_str().unwrap()),
            Err(PathError::NotFound)
        );
    }

    #[test]
    fn test_validate_directory_appends_filename() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.toml");
        std::fs::File::create(&file)
            .unwrap()
            .write_all(b"a = 1\n")
            .unwrap();

        let direct = validate_input("plain.toml", file.to_str().unwrap()).unwrap();
        let via_dir = validate_input("plain.toml", dir.path().to_str().unwrap()).unwrap();
        assert_eq!(direct, via_dir);
        assert_eq!(direct, Input::Path(file));
    }

    #[test]
    fn test_validate_directory_without_default_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            validate_input("plain.toml", dir.path().to_str().unwrap()),
            Err(PathError::NotFound)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_unwritable_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.toml");
        std::fs::write(&file, "a = 1\n").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o444)).unwrap();

        // root ignores mode bits; the probe cannot fail there
        if OpenOptions::new().write(true).open(&file).is_ok() {
            return;
        }
        assert_eq!(
            validate_input("plain.toml", file.to_str().unwrap()),
            Err(PathError::Unwritable)
        );
    }
}
