//! `config`: manage the configuration file.

use crate::cli::{ArgSpec, BoundArgs, CommandSchema, SubCommand, ValueKind};
use crate::commands::RunContext;
use crate::config::{Config, save_config};
use crate::error::{Error, Result};
use std::io::{self, Write};

const ACTIONS: &[&str] = &["init", "show", "path"];

pub(super) fn command() -> SubCommand {
    let schema = CommandSchema::new("config")
        .about("Manage the configuration file.")
        .arg(
            ArgSpec::positional("action", ValueKind::Enum(ACTIONS)).help(
                "init: write a default configuration file, \
                 show: print the effective configuration, \
                 path: print the configuration file path.",
            ),
        );

    SubCommand::new(schema, run)
}

fn run(args: BoundArgs, ctx: &RunContext) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(args.str("action")?, ctx, &mut out)?;
    out.flush().map_err(Error::from_write)
}

fn execute(action: &str, ctx: &RunContext, out: &mut impl Write) -> Result<()> {
    let path = &ctx.config_path;

    let written = match action {
        "init" => {
            if path.exists() {
                writeln!(out, "Configuration file already exists: {}", path.display())
            } else {
                save_config(&Config::default(), path)?;
                writeln!(out, "Created configuration file: {}", path.display())
            }
        }
        "show" => {
            let contents = toml::to_string_pretty(&ctx.config)
                .map_err(|e| Error::ConfigSerialize { source: e })?;
            write!(out, "{contents}")
        }
        "path" => writeln!(out, "{}", path.display()),
        other => {
            return Err(Error::Internal {
                message: format!("unhandled config action '{other}'"),
            });
        }
    };
    written.map_err(Error::from_write)
}
