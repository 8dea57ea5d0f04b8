//! Binding raw parsed values into runtime values.

use crate::cli::parser::{RawArgs, RawValue};
use crate::cli::schema::CommandSchema;
use crate::cli::spec::{ArgSpec, ValueKind};
use crate::cli::streams::{InputStream, OutputTarget};
use crate::error::{Error, Result};
use crate::pipeline::ResolvedOutput;

/// A bound field value.
#[derive(Debug)]
pub enum Value {
    /// Optional field not given.
    Absent,
    /// Switch.
    Bool(bool),
    /// Text or enum choice.
    Str(String),
    /// Integer.
    Int(i64),
    /// Number.
    Float(f64),
    /// Values of a variadic field.
    List(Vec<String>),
    /// Opened input stream.
    Input(InputStream),
    /// Opened output destination, before resolution.
    Output(OutputTarget),
    /// Output destination after resolution.
    Resolved(ResolvedOutput),
}

impl Value {
    /// Name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Bool(_) => "a switch",
            Self::Str(_) => "a string",
            Self::Int(_) => "an integer",
            Self::Float(_) => "a number",
            Self::List(_) => "a list",
            Self::Input(_) => "an input stream",
            Self::Output(_) => "an output stream",
            Self::Resolved(_) => "a resolved output",
        }
    }
}

/// Bind an input path, `-` meaning standard input.
pub fn bind_input(raw: &str) -> std::result::Result<Value, String> {
    InputStream::open(raw)
        .map(Value::Input)
        .map_err(|e| format!("cannot open '{raw}': {e}"))
}

/// Bind an output path, `-` meaning standard output.
pub fn bind_output(raw: &str) -> std::result::Result<Value, String> {
    OutputTarget::open(raw)
        .map(Value::Output)
        .map_err(|e| format!("cannot open '{raw}' for writing: {e}"))
}

/// Field values of one invocation, in declaration order.
///
/// Every declared field is present. Resolution may replace values but never
/// adds or removes fields.
#[derive(Debug)]
pub struct BoundArgs {
    command: &'static str,
    fields: Vec<(&'static str, Value)>,
}

impl BoundArgs {
    /// Empty record for `command`.
    pub fn new(command: &'static str) -> Self {
        Self {
            command,
            fields: Vec::new(),
        }
    }

    /// Add a field. Used by binding only.
    fn push(&mut self, name: &'static str, value: Value) {
        self.fields.push((name, value));
    }

    /// Command name.
    pub fn command(&self) -> &'static str {
        self.command
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// Value of a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Value> {
        let command = self.command;
        self.fields
            .iter_mut()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
            .ok_or_else(|| Error::Internal {
                message: format!("command '{command}' has no field '{name}'"),
            })
    }

    fn mismatch(name: &str, expected: &'static str) -> Error {
        Error::ArgumentType {
            field: name.to_string(),
            expected,
        }
    }

    /// Text or enum field.
    pub fn str(&self, name: &str) -> Result<&str> {
        match self.get(name) {
            Some(Value::Str(value)) => Ok(value),
            _ => Err(Self::mismatch(name, "a string")),
        }
    }

    /// Optional text or enum field.
    pub fn opt_str(&self, name: &str) -> Result<Option<&str>> {
        match self.get(name) {
            Some(Value::Str(value)) => Ok(Some(value)),
            Some(Value::Absent) => Ok(None),
            _ => Err(Self::mismatch(name, "an optional string")),
        }
    }

    /// Integer field.
    pub fn int(&self, name: &str) -> Result<i64> {
        match self.get(name) {
            Some(Value::Int(value)) => Ok(*value),
            _ => Err(Self::mismatch(name, "an integer")),
        }
    }

    /// Optional integer field.
    pub fn opt_int(&self, name: &str) -> Result<Option<i64>> {
        match self.get(name) {
            Some(Value::Int(value)) => Ok(Some(*value)),
            Some(Value::Absent) => Ok(None),
            _ => Err(Self::mismatch(name, "an optional integer")),
        }
    }

    /// Number field.
    pub fn float(&self, name: &str) -> Result<f64> {
        match self.get(name) {
            Some(Value::Float(value)) => Ok(*value),
            _ => Err(Self::mismatch(name, "a number")),
        }
    }

    /// Switch field.
    pub fn flag(&self, name: &str) -> Result<bool> {
        match self.get(name) {
            Some(Value::Bool(value)) => Ok(*value),
            _ => Err(Self::mismatch(name, "a switch")),
        }
    }

    /// Variadic field, empty when absent.
    pub fn list(&self, name: &str) -> Result<&[String]> {
        match self.get(name) {
            Some(Value::List(values)) => Ok(values),
            Some(Value::Absent) => Ok(&[]),
            _ => Err(Self::mismatch(name, "a list")),
        }
    }

    /// Replace a field value, returning the previous one.
    pub fn replace(&mut self, name: &str, value: Value) -> Result<Value> {
        Ok(std::mem::replace(self.get_mut(name)?, value))
    }

    /// Move a field value out, leaving it absent.
    pub fn take(&mut self, name: &str) -> Result<Value> {
        self.replace(name, Value::Absent)
    }

    /// Move an input stream out.
    pub fn take_input(&mut self, name: &str) -> Result<InputStream> {
        match self.take(name)? {
            Value::Input(input) => Ok(input),
            other => {
                self.replace(name, other)?;
                Err(Self::mismatch(name, "an input stream"))
            }
        }
    }

    /// Move a resolved output out.
    pub fn take_output(&mut self, name: &str) -> Result<ResolvedOutput> {
        match self.take(name)? {
            Value::Resolved(output) => Ok(output),
            other => {
                self.replace(name, other)?;
                Err(Self::mismatch(name, "a resolved output"))
            }
        }
    }
}

/// Bind every field of `schema` from `raw`, in declaration order.
///
/// Stream fields are opened here. When a later field fails, streams bound
/// before it are closed as the partial record is dropped.
pub fn bind(schema: &CommandSchema, raw: &RawArgs) -> Result<BoundArgs> {
    let mut args = BoundArgs::new(schema.name());

    for spec in schema.args() {
        let value = bind_field(spec, raw.get(spec.name()))?;

        if let Some(validate) = spec.validate_fn()
            && !matches!(value, Value::Absent)
        {
            validate(&value).map_err(|reason| Error::argument(spec.display_name(), reason))?;
        }

        args.push(spec.name(), value);
    }

    Ok(args)
}

fn bind_field(spec: &ArgSpec, raw: &RawValue) -> Result<Value> {
    let value = match raw {
        RawValue::Absent if spec.kind() == ValueKind::Bool => Value::Bool(false),
        RawValue::Absent => match spec.default_value() {
            Some(default) => bind_single(spec, default)?,
            None if spec.is_required() => {
                return Err(Error::argument(spec.display_name(), "a value is required"));
            }
            None => Value::Absent,
        },
        RawValue::Flag(set) => Value::Bool(*set),
        RawValue::Single(value) => bind_single(spec, value)?,
        RawValue::Many(values) => Value::List(values.clone()),
    };
    Ok(value)
}

fn bind_single(spec: &ArgSpec, raw: &str) -> Result<Value> {
    if let Some(bind) = spec.bind_fn() {
        return bind(raw).map_err(|reason| Error::argument(spec.display_name(), reason));
    }

    let invalid = |reason: String| Error::argument(spec.display_name(), reason);
    let not_a = || invalid(format!("expected {}, got '{raw}'", spec.kind().describe()));

    match spec.kind() {
        ValueKind::String | ValueKind::Enum(_) => Ok(Value::Str(raw.to_string())),
        ValueKind::Int => raw
            .trim()
            .parse()
            .map(Value::Int)
            .map_err(|_| not_a()),
        ValueKind::Float => raw
            .trim()
            .parse()
            .map(Value::Float)
            .map_err(|_| not_a()),
        ValueKind::Bool => match raw {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(not_a()),
        },
        ValueKind::StreamIn => bind_input(raw).map_err(invalid),
        ValueKind::StreamOut => bind_output(raw).map_err(invalid),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::spec::ArgSpec;
    use crate::cli::validators::validate_processes;
    use tempfile::TempDir;

    fn schema() -> CommandSchema {
        CommandSchema::new("test")
            .arg(ArgSpec::positional("column", ValueKind::String))
            .arg(ArgSpec::input())
            .arg(
                ArgSpec::flag("lang", ValueKind::Enum(&["en", "fr"]))
                    .short('l')
                    .default("en"),
            )
            .arg(
                ArgSpec::flag("processes", ValueKind::Int)
                    .short('p')
                    .default("1")
                    .validate_with(validate_processes),
            )
            .arg(ArgSpec::flag("batch_size", ValueKind::Int).short('B').optional())
            .typical()
    }

    fn raw(pairs: &[(&'static str, RawValue)]) -> RawArgs {
        let mut raw = RawArgs::default();
        for (name, value) in pairs {
            raw.insert(name, value.clone());
        }
        raw
    }

    #[test]
    fn test_defaults_are_bound() {
        let args = bind(&schema(), &raw(&[("column", RawValue::Single("text".into()))])).unwrap();

        assert_eq!(args.str("column").unwrap(), "text");
        assert_eq!(args.str("lang").unwrap(), "en");
        assert_eq!(args.int("processes").unwrap(), 1);
        assert_eq!(args.opt_int("batch_size").unwrap(), None);
        assert_eq!(args.opt_int("total").unwrap(), None);
        assert!(!args.flag("resume").unwrap());
        assert!(matches!(args.get("input"), Some(Value::Input(input)) if input.is_stdin()));
        assert!(matches!(
            args.get("output"),
            Some(Value::Output(OutputTarget::Stdout))
        ));
    }

    #[test]
    fn test_every_declared_field_is_present_in_order() {
        let args = bind(&schema(), &raw(&[("column", RawValue::Single("text".into()))])).unwrap();
        let names: Vec<_> = args.names().collect();
        assert_eq!(
            names,
            [
                "column",
                "input",
                "lang",
                "processes",
                "batch_size",
                "total",
                "resume",
                "output"
            ]
        );
    }

    #[test]
    fn test_paths_bind_to_files() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, "text\n").unwrap();

        let args = bind(
            &schema(),
            &raw(&[
                ("column", RawValue::Single("text".into())),
                ("input", RawValue::Single(input.to_string_lossy().into_owned())),
                ("output", RawValue::Single(output.to_string_lossy().into_owned())),
            ]),
        )
        .unwrap();

        assert!(matches!(args.get("input"), Some(Value::Input(InputStream::File { .. }))));
        assert!(matches!(args.get("output"), Some(Value::Output(OutputTarget::File { .. }))));
        assert!(output.exists());
    }

    #[test]
    fn test_missing_input_file_names_the_field() {
        let err = bind(
            &schema(),
            &raw(&[
                ("column", RawValue::Single("text".into())),
                ("input", RawValue::Single("/nonexistent/in.csv".into())),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ArgumentValidation { field, .. } if field == "<input>"));
    }

    #[test]
    fn test_validator_rejects_zero_processes() {
        for bad in ["0", "-2"] {
            let err = bind(
                &schema(),
                &raw(&[
                    ("column", RawValue::Single("text".into())),
                    ("processes", RawValue::Single(bad.into())),
                ]),
            )
            .unwrap_err();
            assert_eq!(
                err.to_string(),
                "invalid value for -p/--processes: should be positive or -1"
            );
        }

        for good in ["-1", "1", "8"] {
            let args = bind(
                &schema(),
                &raw(&[
                    ("column", RawValue::Single("text".into())),
                    ("processes", RawValue::Single(good.into())),
                ]),
            )
            .unwrap();
            assert_eq!(args.int("processes").unwrap(), good.parse::<i64>().unwrap());
        }
    }

    #[test]
    fn test_bad_integer_is_rejected() {
        let err = bind(
            &schema(),
            &raw(&[
                ("column", RawValue::Single("text".into())),
                ("batch_size", RawValue::Single("many".into())),
            ]),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for -B/--batch-size: expected an integer, got 'many'"
        );
    }

    #[test]
    fn test_numbers_and_optional_strings_bind() {
        let schema = CommandSchema::new("scored")
            .arg(ArgSpec::flag("threshold", ValueKind::Float).default("0.5"))
            .arg(ArgSpec::flag("label", ValueKind::String).optional());

        let args = bind(&schema, &RawArgs::default()).unwrap();
        assert!((args.float("threshold").unwrap() - 0.5).abs() < f64::EPSILON);
        assert_eq!(args.opt_str("label").unwrap(), None);

        let args = bind(
            &schema,
            &raw(&[
                ("threshold", RawValue::Single("-1.25".into())),
                ("label", RawValue::Single("PER".into())),
            ]),
        )
        .unwrap();
        assert!((args.float("threshold").unwrap() + 1.25).abs() < f64::EPSILON);
        assert_eq!(args.opt_str("label").unwrap(), Some("PER"));

        let err = bind(&schema, &raw(&[("threshold", RawValue::Single("high".into()))]))
            .unwrap_err();
        assert!(err.to_string().ends_with("expected a number, got 'high'"));
    }

    #[test]
    fn test_missing_required_positional() {
        let err = bind(&schema(), &RawArgs::default()).unwrap_err();
        assert!(matches!(err, Error::ArgumentValidation { field, .. } if field == "<column>"));
    }

    #[test]
    fn test_accessors_check_kinds() {
        let mut args =
            bind(&schema(), &raw(&[("column", RawValue::Single("text".into()))])).unwrap();

        assert!(matches!(args.int("column"), Err(Error::ArgumentType { .. })));
        assert!(matches!(args.take_output("output"), Err(Error::ArgumentType { .. })));
        // A failed take leaves the value in place.
        assert!(matches!(args.get("output"), Some(Value::Output(_))));
        assert!(args.take_input("input").is_ok());
        assert!(matches!(args.get("input"), Some(Value::Absent)));
    }

    #[test]
    fn test_replace_never_adds_fields() {
        let mut args =
            bind(&schema(), &raw(&[("column", RawValue::Single("text".into()))])).unwrap();

        let previous = args.replace("processes", Value::Int(4)).unwrap();
        assert!(matches!(previous, Value::Int(1)));
        assert_eq!(args.int("processes").unwrap(), 4);

        assert!(args.replace("unknown", Value::Int(1)).is_err());
        assert!(args.get("unknown").is_none());
    }

    #[test]
    fn test_variadic_values_bind_to_list() {
        let schema = CommandSchema::new("multi")
            .arg(ArgSpec::positional("columns", ValueKind::String).variadic());

        let args = bind(
            &schema,
            &raw(&[("columns", RawValue::Many(vec!["a".into(), "b".into()]))]),
        )
        .unwrap();
        assert_eq!(args.list("columns").unwrap(), ["a", "b"]);

        let args = bind(&schema, &RawArgs::default()).unwrap();
        assert!(args.list("columns").unwrap().is_empty());
    }
}
