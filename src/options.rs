//! Option storage for the harness.
//!
//! The fixed run-mode fields (`inputs`, `stdout`, `check`, `no_print_diff`)
//! live as plain struct members on [`OptionSet`]. Everything a formatter can
//! tune — the shared `column_width`/`indent` knobs plus whatever flags the
//! concrete formatter registers — lives in a typed value map keyed by field
//! name. Override resolution only ever touches the map, so run-mode fields
//! cannot be shadowed from inside a document.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// One input to format: a validated file path, or standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// The `-` token: read stdin, always write stdout.
    Stdin,
    /// An absolute path to an existing, readable, writable regular file.
    Path(PathBuf),
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Stdin => f.write_str("stdin"),
            Input::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A dynamically declared option value.
///
/// Covers the TOML types the shared and formatter-specific flags use; values
/// of other TOML types never reach an `OptionValue` (see
/// [`OptionValue::from_toml`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl OptionValue {
    /// Coerce a parsed TOML value, `None` if it has no representation here.
    #[must_use]
    pub fn from_toml(value: &toml::Value) -> Option<Self> {
        match value {
            toml::Value::Boolean(b) => Some(OptionValue::Bool(*b)),
            toml::Value::Integer(i) => Some(OptionValue::Int(*i)),
            toml::Value::String(s) => Some(OptionValue::Str(s.clone())),
            toml::Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect::<Option<Vec<_>>>()
                .map(OptionValue::List),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            OptionValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Conversion applied to a raw value before it lands in the option map.
///
/// The same function runs for both sources of a field: the CLI wraps the
/// argument string in `toml::Value::String` before calling it, and override
/// resolution passes the parsed document value directly.
pub type Convert = fn(&toml::Value) -> Result<OptionValue, String>;

/// How a registered flag appears on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagKind {
    /// Boolean switch, false unless present.
    Switch,
    /// Option taking one value, with a default used when absent.
    Value { default: OptionValue },
    /// Required positional argument (consumed before the trailing inputs).
    Positional,
}

/// Statically declared descriptor for one overridable field.
///
/// Built once per run: the harness contributes `column_width` and `indent`,
/// the formatter contributes the rest via
/// [`TomlFormatter::format_flags`](crate::TomlFormatter::format_flags).
/// The Config Resolver iterates exactly this list, nothing else.
#[derive(Debug, Clone)]
pub struct FlagSpec {
    /// Field name, also the override key inside the TOML document. The CLI
    /// long flag is this name with `_` replaced by `-`.
    pub name: &'static str,
    pub short: Option<char>,
    pub help: &'static str,
    pub kind: FlagKind,
    pub convert: Option<Convert>,
}

impl FlagSpec {
    #[must_use]
    pub fn switch(name: &'static str, help: &'static str) -> Self {
        FlagSpec {
            name,
            short: None,
            help,
            kind: FlagKind::Switch,
            convert: None,
        }
    }

    #[must_use]
    pub fn value(name: &'static str, default: OptionValue, help: &'static str) -> Self {
        FlagSpec {
            name,
            short: None,
            help,
            kind: FlagKind::Value { default },
            convert: None,
        }
    }

    #[must_use]
    pub fn positional(name: &'static str, help: &'static str) -> Self {
        FlagSpec {
            name,
            short: None,
            help,
            kind: FlagKind::Positional,
            convert: None,
        }
    }

    #[must_use]
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Attach a conversion function, used by CLI parsing and override
    /// coercion alike.
    #[must_use]
    pub fn convert(mut self, convert: Convert) -> Self {
        self.convert = Some(convert);
        self
    }
}

/// Default for `--column-width`.
pub const DEFAULT_COLUMN_WIDTH: usize = 120;
/// Default for `--indent`.
pub const DEFAULT_INDENT: usize = 2;

/// The parsed options for one run (or, after resolution, for one input).
///
/// `Clone` produces a fully independent copy; per-input overrides are applied
/// to clones so they never leak across inputs of the same invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSet {
    pub inputs: Vec<Input>,
    pub stdout: bool,
    pub check: bool,
    pub no_print_diff: bool,
    values: BTreeMap<&'static str, OptionValue>,
}

impl OptionSet {
    pub(crate) fn new(
        inputs: Vec<Input>,
        stdout: bool,
        check: bool,
        no_print_diff: bool,
    ) -> Self {
        OptionSet {
            inputs,
            stdout,
            check,
            no_print_diff,
            values: BTreeMap::new(),
        }
    }

    pub(crate) fn set(&mut self, name: &'static str, value: OptionValue) {
        self.values.insert(name, value);
    }

    /// Look up a registered field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(OptionValue::as_bool)
    }

    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(OptionValue::as_int)
    }

    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(OptionValue::as_str)
    }

    #[must_use]
    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(OptionValue::as_list)
    }

    /// The `--column-width` value (possibly overridden per input).
    #[must_use]
    pub fn column_width(&self) -> usize {
        self.get_int("column_width")
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    /// The `--indent` value (possibly overridden per input).
    #[must_use]
    pub fn indent(&self) -> usize {
        self.get_int("indent")
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(DEFAULT_INDENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_scalars() {
        assert_eq!(
            OptionValue::from_toml(&toml::Value::Boolean(true)),
            Some(OptionValue::Bool(true))
        );
        assert_eq!(
            OptionValue::from_toml(&toml::Value::Integer(7)),
            Some(OptionValue::Int(7))
        );
        assert_eq!(
            OptionValue::from_toml(&toml::Value::String("x".into())),
            Some(OptionValue::Str("x".into()))
        );
    }

    #[test]
    fn test_from_toml_string_array() {
        let value = toml::Value::Array(vec![
            toml::Value::String("a".into()),
            toml::Value::String("b".into()),
        ]);
        assert_eq!(
            OptionValue::from_toml(&value),
            Some(OptionValue::List(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn test_from_toml_unrepresentable() {
        let table = toml::Value::Table(toml::map::Map::new());
        assert_eq!(OptionValue::from_toml(&table), None);
        // mixed arrays have no List representation
        let mixed = toml::Value::Array(vec![
            toml::Value::String("a".into()),
            toml::Value::Integer(1),
        ]);
        assert_eq!(OptionValue::from_toml(&mixed), None);
        assert_eq!(OptionValue::from_toml(&toml::Value::Float(1.5)), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut base = OptionSet::new(vec![Input::Stdin], false, false, false);
        base.set("column_width", OptionValue::Int(120));

        let mut copy = base.clone();
        copy.set("column_width", OptionValue::Int(80));

        assert_eq!(base.column_width(), 120);
        assert_eq!(copy.column_width(), 80);
    }

    #[test]
    fn test_typed_accessors() {
        let mut opt = OptionSet::new(Vec::new(), false, false, false);
        opt.set("flag", OptionValue::Bool(true));
        opt.set("count", OptionValue::Int(3));
        opt.set("label", OptionValue::Str("hi".into()));
        opt.set("parts", OptionValue::List(vec!["a".into()]));

        assert_eq!(opt.get_bool("flag"), Some(true));
        assert_eq!(opt.get_int("count"), Some(3));
        assert_eq!(opt.get_str("label"), Some("hi"));
        assert_eq!(opt.get_list("parts"), Some(&["a".to_owned()][..]));
        // wrong type reads as None
        assert_eq!(opt.get_int("label"), None);
        assert_eq!(opt.get_str("missing"), None);
    }

    #[test]
    fn test_knob_defaults_when_unset() {
        let opt = OptionSet::new(Vec::new(), false, false, false);
        assert_eq!(opt.column_width(), DEFAULT_COLUMN_WIDTH);
        assert_eq!(opt.indent(), DEFAULT_INDENT);
    }
}
