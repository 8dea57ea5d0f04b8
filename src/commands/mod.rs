//! Command bodies and the command registry.

mod config;
mod embed;
mod ner;
mod tokenize;

use crate::cli::{BoundArgs, SubCommand};
use crate::config::Config;
use crate::error::Result;
use crate::inference::Lang;
use crate::interrupt::Interrupt;
use crate::output::{ProgressListener, create_listener};
use crate::pipeline::{Enricher, EnricherBuilder};
use std::path::PathBuf;

/// Everything a command body needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Effective configuration.
    pub config: Config,
    /// Where the configuration was looked up.
    pub config_path: PathBuf,
    /// Whether to draw progress bars.
    pub progress: bool,
    /// Flag raised by Ctrl+C.
    pub interrupt: Interrupt,
}

impl RunContext {
    /// Context with default configuration and no progress display.
    pub fn new(config: Config, config_path: PathBuf) -> Self {
        Self {
            config,
            config_path,
            progress: false,
            interrupt: Interrupt::new(),
        }
    }

    /// Progress listener titled `title`.
    pub fn listener(&self, title: &str) -> Box<dyn ProgressListener> {
        create_listener(title, None, self.progress)
    }
}

/// Every command, in help order.
pub fn registry() -> Vec<SubCommand> {
    vec![
        ner::command(),
        tokenize::command(),
        embed::command(),
        config::command(),
    ]
}

/// Start an enricher from the `input`, `output` and `total` fields.
fn enricher(args: &mut BoundArgs, ctx: &RunContext, title: &str) -> Result<EnricherBuilder> {
    let total = args
        .opt_int("total")?
        .and_then(|total| u64::try_from(total).ok());
    let input = args.take_input("input")?;
    let output = args.take_output("output")?;

    Ok(Enricher::builder(input, output)
        .total(total)
        .stream_config(&ctx.config.stream)
        .listener(ctx.listener(title))
        .interrupt(ctx.interrupt.clone()))
}

fn lang(args: &BoundArgs) -> Result<Lang> {
    args.str("lang")?.parse()
}

/// Optional positive integer field, `default` when absent.
fn batch_size(args: &BoundArgs, default: usize) -> Result<usize> {
    Ok(args
        .opt_int("batch_size")?
        .and_then(|size| usize::try_from(size).ok())
        .unwrap_or(default))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_schemas_are_valid() {
        let names: Vec<_> = registry().iter().map(SubCommand::name).collect();
        assert_eq!(names, ["ner", "tokenize", "embed", "config"]);

        for command in registry() {
            command.schema.validate().unwrap();
        }
    }

    #[test]
    fn test_cli_debug_assert() {
        crate::cli::build_cli(&registry()).debug_assert();
    }
}
