//! Command schemas and the registered command type.

use crate::cli::bind::BoundArgs;
use crate::cli::parser::{GLOBAL_NAMES, GLOBAL_SHORTS};
use crate::cli::spec::{ArgSpec, Arity, ValueKind};
use crate::commands::RunContext;
use crate::error::{Error, Result};
use crate::pipeline::ResumeStrategy;
use std::collections::HashSet;

/// Command body receiving fully bound and resolved arguments.
pub type RunFn = fn(BoundArgs, &RunContext) -> Result<()>;

/// Command-specific resolution step.
pub type ResolveFn = fn(&mut BoundArgs) -> Result<()>;

/// Ordered field declarations of one subcommand.
#[derive(Debug, Clone)]
pub struct CommandSchema {
    name: &'static str,
    about: Option<&'static str>,
    long_about: Option<&'static str>,
    args: Vec<ArgSpec>,
    resume_strategy: ResumeStrategy,
    typical: bool,
}

impl CommandSchema {
    /// Schema without fields.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            about: None,
            long_about: None,
            args: Vec::new(),
            resume_strategy: ResumeStrategy::RowCount,
            typical: false,
        }
    }

    /// One-line description.
    #[must_use]
    pub fn about(mut self, about: &'static str) -> Self {
        self.about = Some(about);
        self
    }

    /// Description shown by `--help`.
    #[must_use]
    pub fn long_about(mut self, long_about: &'static str) -> Self {
        self.long_about = Some(long_about);
        self
    }

    /// Declare a field.
    #[must_use]
    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.args.push(spec);
        self
    }

    /// Adopt the shared convention: `--total`, `--resume` and `-o/--output`.
    ///
    /// The output is bound last so that other fields fail before a file is
    /// created.
    #[must_use]
    pub fn typical(mut self) -> Self {
        self.args.push(ArgSpec::total());
        self.args.push(ArgSpec::resume());
        self.args.push(ArgSpec::output());
        self.typical = true;
        self
    }

    /// How a resumed run finds the rows already done.
    #[must_use]
    pub fn resume_strategy(mut self, strategy: ResumeStrategy) -> Self {
        self.resume_strategy = strategy;
        self
    }

    /// Command name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// One-line description.
    pub fn about_text(&self) -> Option<&'static str> {
        self.about
    }

    /// Long description.
    pub fn long_about_text(&self) -> Option<&'static str> {
        self.long_about
    }

    /// Field declarations in order.
    pub fn args(&self) -> &[ArgSpec] {
        &self.args
    }

    /// Declaration of `name`.
    pub fn spec(&self, name: &str) -> Option<&ArgSpec> {
        self.args.iter().find(|spec| spec.name() == name)
    }

    /// Resume strategy.
    pub fn strategy(&self) -> ResumeStrategy {
        self.resume_strategy
    }

    /// Whether the input/output/total/resume convention applies.
    pub fn uses_enrich_convention(&self) -> bool {
        self.typical
    }

    /// Check the declarations for consistency.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Error::InvalidSchema {
            command: self.name.to_string(),
            reason,
        };

        let mut names = HashSet::new();
        let mut shorts = HashSet::new();
        let mut seen_optional_positional = false;
        let positionals: Vec<&ArgSpec> = self.args.iter().filter(|s| s.is_positional()).collect();

        for spec in &self.args {
            if !names.insert(spec.name()) || GLOBAL_NAMES.contains(&spec.name()) {
                return Err(invalid(format!("duplicate field '{}'", spec.name())));
            }

            if let Some(short) = spec.short_flag() {
                if spec.is_positional() {
                    return Err(invalid(format!(
                        "positional '{}' cannot have a short flag",
                        spec.name()
                    )));
                }
                if !shorts.insert(short) || GLOBAL_SHORTS.contains(&short) {
                    return Err(invalid(format!("duplicate short flag '-{short}'")));
                }
            }

            if let (ValueKind::Enum(choices), Some(default)) = (spec.kind(), spec.default_value())
                && !choices.contains(&default)
            {
                return Err(invalid(format!(
                    "default '{default}' of '{}' is not one of {choices:?}",
                    spec.name()
                )));
            }

            if spec.arity() == Arity::Variadic {
                if !spec.is_positional()
                    || positionals.last().map(|last| last.name()) != Some(spec.name())
                {
                    return Err(invalid(format!(
                        "variadic field '{}' must be the last positional",
                        spec.name()
                    )));
                }
                if !matches!(spec.kind(), ValueKind::String | ValueKind::Enum(_)) {
                    return Err(invalid(format!(
                        "variadic field '{}' must hold strings",
                        spec.name()
                    )));
                }
            }

            if spec.is_positional() {
                if spec.kind() == ValueKind::Bool {
                    return Err(invalid(format!(
                        "positional '{}' cannot be a switch",
                        spec.name()
                    )));
                }
                if spec.is_required() && seen_optional_positional {
                    return Err(invalid(format!(
                        "required positional '{}' follows an optional one",
                        spec.name()
                    )));
                }
                seen_optional_positional |= !spec.is_required();
            }
        }

        if self.typical && self.spec("input").is_none_or(|s| s.kind() != ValueKind::StreamIn) {
            return Err(invalid("the output convention needs an 'input' stream field".to_string()));
        }

        Ok(())
    }
}

/// A registered subcommand.
#[derive(Debug, Clone)]
pub struct SubCommand {
    /// Field declarations.
    pub schema: CommandSchema,
    /// Command body.
    pub run: RunFn,
    /// Optional command-specific resolution, run after the built-in one.
    pub resolve: Option<ResolveFn>,
}

impl SubCommand {
    /// Command without specific resolution.
    pub fn new(schema: CommandSchema, run: RunFn) -> Self {
        Self {
            schema,
            run,
            resolve: None,
        }
    }

    /// Attach a command-specific resolution step.
    #[must_use]
    pub fn with_resolver(mut self, resolve: ResolveFn) -> Self {
        self.resolve = Some(resolve);
        self
    }

    /// Command name.
    pub fn name(&self) -> &'static str {
        self.schema.name()
    }
}
