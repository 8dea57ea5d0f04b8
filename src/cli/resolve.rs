//! Cross-field resolution run after binding and before the command body.

use crate::cli::bind::{BoundArgs, Value};
use crate::cli::schema::SubCommand;
use crate::cli::streams::OutputTarget;
use crate::error::{Error, Result};
use crate::locking::FileLock;
use crate::pipeline::{OutputSink, ResolvedOutput, ResumeStrategy, Resumer};
use tracing::debug;

/// Run the built-in resolution, then the command's own, stopping at the
/// first failure.
pub fn resolve(command: &SubCommand, args: &mut BoundArgs) -> Result<()> {
    if command.schema.uses_enrich_convention() {
        resolve_output(args, command.schema.strategy())?;
    }

    if let Some(resolve) = command.resolve {
        resolve(args)?;
    }

    Ok(())
}

/// Replace the bound output target by a ready destination.
///
/// A plain run truncates the output file. A resumed run hands it to a
/// [`Resumer`], which needs a named file.
fn resolve_output(args: &mut BoundArgs, strategy: ResumeStrategy) -> Result<()> {
    let resume = args.flag("resume")?;

    let target = match args.take("output")? {
        Value::Output(target) => target,
        other => {
            args.replace("output", other)?;
            return Err(Error::ArgumentType {
                field: "output".to_string(),
                expected: "an output stream",
            });
        }
    };

    let resolved = match target {
        OutputTarget::Stdout if resume => {
            return Err(Error::Resolving {
                message: "cannot resume without a named output path (use -o/--output)"
                    .to_string(),
            });
        }
        OutputTarget::Stdout => ResolvedOutput::plain(OutputSink::stdout(), None),
        OutputTarget::File { path, file } => {
            let lock = FileLock::acquire(&path)?;

            if resume {
                debug!("Resuming into {}", path.display());
                ResolvedOutput::resuming(Resumer::open(&path, file, strategy)?, Some(lock))
            } else {
                file.set_len(0)?;
                ResolvedOutput::plain(OutputSink::file(file, &path), Some(lock))
            }
        }
    };

    args.replace("output", Value::Resolved(resolved))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::bind::bind;
    use crate::cli::parser::{RawArgs, RawValue};
    use crate::cli::schema::CommandSchema;
    use crate::cli::spec::{ArgSpec, ValueKind};
    use crate::commands::RunContext;
    use tempfile::TempDir;

    fn noop(_: BoundArgs, _: &RunContext) -> Result<()> {
        Ok(())
    }

    fn double_batch(args: &mut BoundArgs) -> Result<()> {
        let batch = args.int("batch")?;
        if batch > 100 {
            return Err(Error::Resolving {
                message: "batch too large".to_string(),
            });
        }
        args.replace("batch", Value::Int(batch * 2))?;
        Ok(())
    }

    fn command() -> SubCommand {
        SubCommand::new(
            CommandSchema::new("test")
                .arg(ArgSpec::input())
                .arg(ArgSpec::flag("batch", ValueKind::Int).default("1"))
                .typical(),
            noop,
        )
        .with_resolver(double_batch)
    }

    fn bound(output: Option<&str>, resume: bool, batch: &str) -> BoundArgs {
        let mut raw = RawArgs::default();
        raw.insert("resume", RawValue::Flag(resume));
        raw.insert("batch", RawValue::Single(batch.to_string()));
        if let Some(output) = output {
            raw.insert("output", RawValue::Single(output.to_string()));
        }
        bind(&command().schema, &raw).unwrap()
    }

    #[test]
    fn test_resume_requires_named_output() {
        let mut args = bound(None, true, "1");
        let err = resolve(&command(), &mut args).unwrap_err();
        assert!(matches!(err, Error::Resolving { message } if message.contains("cannot resume")));
    }

    #[test]
    fn test_plain_stdout_output() {
        let mut args = bound(None, false, "1");
        resolve(&command(), &mut args).unwrap();

        let output = args.take_output("output").unwrap();
        assert!(!output.is_resume());
        assert_eq!(args.int("batch").unwrap(), 2);
    }

    #[test]
    fn test_plain_file_output_is_truncated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "old,content\n").unwrap();

        let mut args = bound(Some(path.to_str().unwrap()), false, "1");
        resolve(&command(), &mut args).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        assert!(FileLock::is_locked(&path));
    }

    #[test]
    fn test_resume_keeps_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "a\n1\n").unwrap();

        let mut args = bound(Some(path.to_str().unwrap()), true, "1");
        resolve(&command(), &mut args).unwrap();

        assert!(args.take_output("output").unwrap().is_resume());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\n1\n");
    }

    #[test]
    fn test_locked_output_is_refused() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let _held = FileLock::acquire(&path).unwrap();

        let mut args = bound(Some(path.to_str().unwrap()), false, "1");
        let err = resolve(&command(), &mut args).unwrap_err();
        assert!(matches!(err, Error::FileLocked { .. }));
    }

    #[test]
    fn test_command_resolution_runs_after_builtin() {
        let mut args = bound(None, false, "500");
        let err = resolve(&command(), &mut args).unwrap_err();
        assert!(matches!(err, Error::Resolving { message } if message == "batch too large"));
        assert!(matches!(args.get("output"), Some(Value::Resolved(_))));
    }

    #[test]
    fn test_absent_command_resolution_is_noop() {
        let mut command = command();
        command.resolve = None;

        let mut args = bound(None, false, "1");
        resolve(&command, &mut args).unwrap();
        assert_eq!(args.int("batch").unwrap(), 1);
    }
}
