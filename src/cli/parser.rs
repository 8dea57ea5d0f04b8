//! Command line parser derived from command schemas.

use crate::cli::schema::{CommandSchema, SubCommand};
use crate::cli::spec::{ArgSpec, Arity, ValueKind};
use crate::constants::APP_NAME;
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::HashMap;
use std::path::PathBuf;

/// Names of the global flags, unavailable to command schemas.
pub const GLOBAL_NAMES: &[&str] = &["verbose", "quiet", "no_progress", "config", "help", "version"];

/// Short flags of the global flags, unavailable to command schemas.
pub const GLOBAL_SHORTS: &[char] = &['v', 'q', 'h', 'V'];

/// A value as produced by the parser, before binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Not given and no parser default.
    Absent,
    /// Switch state.
    Flag(bool),
    /// One value.
    Single(String),
    /// Values of a variadic field.
    Many(Vec<String>),
}

static ABSENT: RawValue = RawValue::Absent;

/// Raw values keyed by field name.
#[derive(Debug, Default, Clone)]
pub struct RawArgs {
    values: HashMap<&'static str, RawValue>,
}

impl RawArgs {
    /// Set the raw value of `name`.
    pub fn insert(&mut self, name: &'static str, value: RawValue) {
        self.values.insert(name, value);
    }

    /// Raw value of `name`, absent when not given.
    pub fn get(&self, name: &str) -> &RawValue {
        self.values.get(name).unwrap_or(&ABSENT)
    }

    /// Collect the values of every field of `schema` from `matches`.
    pub fn from_matches(schema: &CommandSchema, matches: &ArgMatches) -> Self {
        let mut raw = Self::default();

        for spec in schema.args() {
            let name = spec.name();
            let value = match (spec.kind(), spec.arity()) {
                (ValueKind::Bool, _) => RawValue::Flag(matches.get_flag(name)),
                (_, Arity::Variadic) => matches
                    .get_many::<String>(name)
                    .map_or(RawValue::Absent, |values| {
                        RawValue::Many(values.cloned().collect())
                    }),
                _ => matches
                    .get_one::<String>(name)
                    .map_or(RawValue::Absent, |value| RawValue::Single(value.clone())),
            };
            raw.insert(name, value);
        }

        raw
    }
}

/// Flags shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Verbosity level.
    pub verbose: u8,
    /// Only log warnings and errors.
    pub quiet: bool,
    /// Never draw a progress bar.
    pub no_progress: bool,
    /// Explicit configuration file.
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Read the global flags from the top-level matches.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            verbose: matches.get_count("verbose"),
            quiet: matches.get_flag("quiet"),
            no_progress: matches.get_flag("no_progress"),
            config: matches.get_one::<PathBuf>("config").cloned(),
        }
    }
}

/// Build the top-level parser with one subcommand per registered command.
pub fn build_cli(commands: &[SubCommand]) -> Command {
    Command::new(APP_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Enrich CSV files with named entities, tokens and sentence embeddings.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase verbosity (-v debug, -vv trace)."),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .global(true)
                .conflicts_with("verbose")
                .help("Only log warnings and errors."),
        )
        .arg(
            Arg::new("no_progress")
                .long("no-progress")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Disable progress bars."),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .env("XZAR_CONFIG")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true)
                .help("Configuration file to use instead of the default location."),
        )
        .subcommands(commands.iter().map(|command| command_for(&command.schema)))
}

/// Clap subcommand for one schema.
pub fn command_for(schema: &CommandSchema) -> Command {
    let mut command = Command::new(schema.name());
    if let Some(about) = schema.about_text() {
        command = command.about(about);
    }
    if let Some(long_about) = schema.long_about_text() {
        command = command.long_about(long_about);
    }
    command.args(schema.args().iter().map(arg_for))
}

fn arg_for(spec: &ArgSpec) -> Arg {
    let mut arg = Arg::new(spec.name());

    if spec.is_positional() {
        arg = arg.value_name(spec.long_name());
    } else {
        arg = arg.long(spec.long_name());
        if let Some(short) = spec.short_flag() {
            arg = arg.short(short);
        }
    }

    if let Some(help) = spec.help_text() {
        arg = arg.help(help);
    }

    match spec.kind() {
        ValueKind::Bool => return arg.action(ArgAction::SetTrue),
        ValueKind::Enum(choices) => {
            arg = arg.value_parser(PossibleValuesParser::new(choices.iter().copied()));
        }
        ValueKind::Int | ValueKind::Float => {
            arg = arg.allow_negative_numbers(true);
        }
        ValueKind::String | ValueKind::StreamIn | ValueKind::StreamOut => {}
    }

    if let Some(default) = spec.default_value() {
        arg = arg.default_value(default);
    }

    match spec.arity() {
        Arity::Single => arg.required(spec.is_required()),
        Arity::Optional => arg.required(false),
        Arity::Variadic => arg.num_args(1..).action(ArgAction::Append),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::bind::BoundArgs;
    use crate::commands::RunContext;
    use crate::error::Result;

    fn noop(_: BoundArgs, _: &RunContext) -> Result<()> {
        Ok(())
    }

    fn commands() -> Vec<SubCommand> {
        vec![SubCommand::new(
            CommandSchema::new("ner")
                .arg(ArgSpec::positional("column", ValueKind::String))
                .arg(ArgSpec::input())
                .arg(
                    ArgSpec::flag("lang", ValueKind::Enum(&["de", "en", "fr"]))
                        .short('l')
                        .default("en"),
                )
                .arg(
                    ArgSpec::flag("processes", ValueKind::Int)
                        .short('p')
                        .default("1"),
                )
                .arg(ArgSpec::flag("batch_size", ValueKind::Int).short('B').optional())
                .typical(),
            noop,
        )]
    }

    fn parse(args: &[&str]) -> std::result::Result<ArgMatches, clap::Error> {
        build_cli(&commands()).try_get_matches_from(args)
    }

    fn raw_for(matches: &ArgMatches) -> RawArgs {
        let commands = commands();
        let (_, sub) = matches.subcommand().unwrap();
        RawArgs::from_matches(&commands[0].schema, sub)
    }

    #[test]
    fn test_parser_is_consistent() {
        build_cli(&commands()).debug_assert();
    }

    #[test]
    fn test_positionals_and_defaults() {
        let matches = parse(&["xzar", "ner", "text", "in.csv"]).unwrap();
        let raw = raw_for(&matches);

        assert_eq!(raw.get("column"), &RawValue::Single("text".into()));
        assert_eq!(raw.get("input"), &RawValue::Single("in.csv".into()));
        assert_eq!(raw.get("lang"), &RawValue::Single("en".into()));
        assert_eq!(raw.get("output"), &RawValue::Single("-".into()));
        assert_eq!(raw.get("batch_size"), &RawValue::Absent);
        assert_eq!(raw.get("resume"), &RawValue::Flag(false));
    }

    #[test]
    fn test_kebab_case_long_flags() {
        let matches = parse(&["xzar", "ner", "text", "--batch-size", "8", "--resume", "-o", "out.csv"]).unwrap();
        let raw = raw_for(&matches);

        assert_eq!(raw.get("batch_size"), &RawValue::Single("8".into()));
        assert_eq!(raw.get("resume"), &RawValue::Flag(true));
        assert_eq!(raw.get("output"), &RawValue::Single("out.csv".into()));
    }

    #[test]
    fn test_enum_rejected_by_parser() {
        let err = parse(&["xzar", "ner", "text", "-l", "es"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_negative_numbers_are_values() {
        let matches = parse(&["xzar", "ner", "text", "-p", "-1"]).unwrap();
        assert_eq!(raw_for(&matches).get("processes"), &RawValue::Single("-1".into()));
    }

    #[test]
    fn test_missing_required_positional() {
        let err = parse(&["xzar", "ner"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let matches = parse(&["xzar", "ner", "text", "-vv", "--no-progress"]).unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let globals = GlobalArgs::from_matches(sub);
        assert_eq!(globals.verbose, 2);
        assert!(globals.no_progress);
    }
}
