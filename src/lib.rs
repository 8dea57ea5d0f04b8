//! Xzar - enrich CSV streams with named entities, tokens and sentence
//! embeddings.
//!
//! Commands are declared as schemas ([`cli::CommandSchema`]) from which the
//! parser is derived. Their bodies stream rows through an
//! [`pipeline::Enricher`], which can resume an interrupted run from the rows
//! already present in the output file.

#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod inference;
pub mod interrupt;
pub mod locking;
pub mod output;
pub mod pipeline;

use cli::{GlobalArgs, RawArgs};
use commands::RunContext;
use interrupt::Interrupt;
use std::io::IsTerminal;
use tracing::debug;

pub use error::{Error, Result};

/// Main entry point for the xzar CLI.
pub fn run() -> Result<()> {
    let commands = commands::registry();
    for command in &commands {
        command.schema.validate()?;
    }

    let mut cli = cli::build_cli(&commands);
    let matches = cli.clone().get_matches();
    let globals = GlobalArgs::from_matches(&matches);

    init_logging(globals.verbose, globals.quiet);

    let Some((name, sub_matches)) = matches.subcommand() else {
        cli.print_help().map_err(Error::from_write)?;
        return Ok(());
    };
    let command = commands
        .iter()
        .find(|command| command.name() == name)
        .ok_or_else(|| Error::UnknownCommand {
            name: name.to_string(),
        })?;

    let interrupt = Interrupt::new();
    interrupt::install_handler(&interrupt);

    let config_path = config::resolve_config_path(globals.config.as_deref())?;
    let config = config::load_config_file(&config_path)?;
    config::validate_config(&config)?;
    debug!("Using configuration {}", config_path.display());

    let ctx = RunContext {
        progress: !globals.quiet && !globals.no_progress && std::io::stderr().is_terminal(),
        interrupt,
        ..RunContext::new(config, config_path)
    };

    let raw = RawArgs::from_matches(&command.schema, sub_matches);
    let mut args = cli::bind(&command.schema, &raw)?;
    cli::resolve(command, &mut args)?;

    (command.run)(args, &ctx)
}

/// Initialize logging to stderr, stdout being reserved for CSV output.
fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
