//! Declarative argument specifications.

use crate::cli::bind::{Value, bind_input, bind_output};
use crate::cli::validators::validate_non_negative;
use crate::constants::STDIO_SENTINEL;

/// How many values a field takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly one value, required unless a default is declared.
    Single,
    /// Zero or one value.
    Optional,
    /// Any number of values. Only the last positional may be variadic.
    Variadic,
}

/// Kind of value a field holds once bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Free text.
    String,
    /// Signed integer, negative values accepted.
    Int,
    /// Floating point number.
    Float,
    /// Presence switch.
    Bool,
    /// One of a closed set, enforced by the parser.
    Enum(&'static [&'static str]),
    /// Path bound to a readable stream.
    StreamIn,
    /// Path bound to a writable stream.
    StreamOut,
}

impl ValueKind {
    /// Name used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Int => "an integer",
            Self::Float => "a number",
            Self::Bool => "a switch",
            Self::Enum(_) => "a choice",
            Self::StreamIn => "an input stream",
            Self::StreamOut => "an output stream",
        }
    }
}

/// Turns a raw string into a bound value. Errors are plain reasons.
pub type BindFn = fn(&str) -> std::result::Result<Value, String>;

/// Checks a bound value. Errors are plain reasons.
pub type ValidateFn = fn(&Value) -> std::result::Result<(), String>;

/// Declaration of one command field.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    name: &'static str,
    short: Option<char>,
    help: Option<&'static str>,
    default: Option<&'static str>,
    positional: bool,
    arity: Arity,
    kind: ValueKind,
    bind: Option<BindFn>,
    validate: Option<ValidateFn>,
}

impl ArgSpec {
    fn new(name: &'static str, kind: ValueKind, positional: bool) -> Self {
        Self {
            name,
            short: None,
            help: None,
            default: None,
            positional,
            arity: Arity::Single,
            kind,
            bind: None,
            validate: None,
        }
    }

    /// Positional field.
    pub fn positional(name: &'static str, kind: ValueKind) -> Self {
        Self::new(name, kind, true)
    }

    /// Flag taking a value, `--name-in-kebab-case`.
    pub fn flag(name: &'static str, kind: ValueKind) -> Self {
        Self::new(name, kind, false)
    }

    /// Boolean switch.
    pub fn switch(name: &'static str) -> Self {
        Self::new(name, ValueKind::Bool, false).optional()
    }

    /// Short flag letter.
    #[must_use]
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Help text.
    #[must_use]
    pub fn help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    /// Raw default value, bound like a value given on the command line.
    #[must_use]
    pub fn default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    /// Allow the field to be absent.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.arity = Arity::Optional;
        self
    }

    /// Accept any number of values.
    #[must_use]
    pub fn variadic(mut self) -> Self {
        self.arity = Arity::Variadic;
        self
    }

    /// Custom binding of the raw value.
    #[must_use]
    pub fn bind_with(mut self, bind: BindFn) -> Self {
        self.bind = Some(bind);
        self
    }

    /// Validation of the bound value.
    #[must_use]
    pub fn validate_with(mut self, validate: ValidateFn) -> Self {
        self.validate = Some(validate);
        self
    }

    /// Trailing input path, standard input by default.
    pub fn input() -> Self {
        Self::positional("input", ValueKind::StreamIn)
            .optional()
            .default(STDIO_SENTINEL)
            .help("Path to CSV file input. Will default to stdin if not given.")
            .bind_with(bind_input)
    }

    /// `-o/--output` path, standard output by default.
    pub fn output() -> Self {
        Self::flag("output", ValueKind::StreamOut)
            .short('o')
            .default(STDIO_SENTINEL)
            .help(
                "Write output to path instead of printing to stdout. \
                 Passing \"-\" as a path is understood as stdout.",
            )
            .bind_with(bind_output)
    }

    /// `--total` row count hint for the progress bar.
    pub fn total() -> Self {
        Self::flag("total", ValueKind::Int)
            .optional()
            .help("Total number of input rows, used to display a progress bar.")
            .validate_with(validate_non_negative)
    }

    /// `--resume` switch.
    pub fn resume() -> Self {
        Self::switch("resume")
            .help("Resume an interrupted run, skipping rows already present in the output file.")
    }

    /// Field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Long flag or positional name shown to users.
    pub fn long_name(&self) -> String {
        self.name.replace('_', "-")
    }

    /// Name used in error messages, e.g. `-p/--processes` or `<column>`.
    pub fn display_name(&self) -> String {
        match (self.positional, self.short) {
            (true, _) => format!("<{}>", self.long_name()),
            (false, Some(short)) => format!("-{short}/--{}", self.long_name()),
            (false, None) => format!("--{}", self.long_name()),
        }
    }

    /// Short flag letter.
    pub fn short_flag(&self) -> Option<char> {
        self.short
    }

    /// Help text.
    pub fn help_text(&self) -> Option<&'static str> {
        self.help
    }

    /// Raw default value.
    pub fn default_value(&self) -> Option<&'static str> {
        self.default
    }

    /// Whether the field is positional.
    pub fn is_positional(&self) -> bool {
        self.positional
    }

    /// Arity.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Value kind.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Whether the field must be given on the command line.
    pub fn is_required(&self) -> bool {
        self.arity == Arity::Single && self.default.is_none() && self.kind != ValueKind::Bool
    }

    /// Custom binding function.
    pub fn bind_fn(&self) -> Option<BindFn> {
        self.bind
    }

    /// Validation function.
    pub fn validate_fn(&self) -> Option<ValidateFn> {
        self.validate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        let processes = ArgSpec::flag("processes", ValueKind::Int).short('p');
        assert_eq!(processes.display_name(), "-p/--processes");

        let batch = ArgSpec::flag("batch_size", ValueKind::Int);
        assert_eq!(batch.long_name(), "batch-size");
        assert_eq!(batch.display_name(), "--batch-size");

        let column = ArgSpec::positional("column", ValueKind::String);
        assert_eq!(column.display_name(), "<column>");
    }

    #[test]
    fn test_required_fields() {
        assert!(ArgSpec::positional("column", ValueKind::String).is_required());
        assert!(!ArgSpec::input().is_required());
        assert!(!ArgSpec::total().is_required());
        assert!(!ArgSpec::resume().is_required());
        assert!(!ArgSpec::output().is_required());
    }

    #[test]
    fn test_presets() {
        let input = ArgSpec::input();
        assert!(input.is_positional());
        assert_eq!(input.default_value(), Some("-"));
        assert!(input.bind_fn().is_some());

        let output = ArgSpec::output();
        assert_eq!(output.short_flag(), Some('o'));
        assert_eq!(output.kind(), ValueKind::StreamOut);

        assert_eq!(ArgSpec::resume().kind(), ValueKind::Bool);
        assert!(ArgSpec::total().validate_fn().is_some());
    }
}
