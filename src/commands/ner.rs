//! `ner`: one output row per named entity found in a text column.

use crate::cli::validators::{validate_positive, validate_processes};
use crate::cli::{ArgSpec, BoundArgs, CommandSchema, SubCommand, Value, ValueKind};
use crate::commands::{RunContext, batch_size, enricher, lang};
use crate::constants::{PROCESSES_AUTO, columns};
use crate::error::Result;
use crate::inference::{Lang, ModelSize, load_entity_backend};
use crate::pipeline::{ColumnRef, OrderedPool, ResumeStrategy, Row, Selection};
use std::num::NonZeroUsize;
use std::thread;
use tracing::{debug, info};

const TITLE: &str = "Extracting";

pub(super) fn command() -> SubCommand {
    let schema = CommandSchema::new("ner")
        .about("Extract named entities from a text column.")
        .long_about(
            "Extract named entities from a text column.\n\n\
             Writes one row per entity with its text and label, keeping the other \
             input columns. Rows stay in input order whatever the number of processes.",
        )
        .arg(
            ArgSpec::positional("column", ValueKind::String)
                .help("column of CSV file containing text from which to extract entities"),
        )
        .arg(ArgSpec::input())
        .arg(
            ArgSpec::flag("lang", ValueKind::Enum(Lang::CHOICES))
                .short('l')
                .default("en")
                .help("lang for the spacy model to use."),
        )
        .arg(
            ArgSpec::flag("model_size", ValueKind::Enum(ModelSize::CHOICES))
                .short('M')
                .default("sm")
                .help("size of Spacy model to use."),
        )
        .arg(
            ArgSpec::flag("processes", ValueKind::Int)
                .short('p')
                .default("1")
                .help(
                    "number of processes to use. Set to -1 to select a number of \
                     processes based on the currently available CPUs.",
                )
                .validate_with(validate_processes),
        )
        .arg(
            ArgSpec::flag("batch_size", ValueKind::Int)
                .short('B')
                .optional()
                .help("number of documents to process at once.")
                .validate_with(validate_positive),
        )
        .typical()
        .resume_strategy(ResumeStrategy::LastIndex {
            column: columns::INPUT_ROW,
        });

    SubCommand::new(schema, run).with_resolver(resolve)
}

/// Replace `-p -1` by the number of available CPUs.
fn resolve(args: &mut BoundArgs) -> Result<()> {
    if args.int("processes")? == PROCESSES_AUTO {
        let cpus = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        debug!("Using {cpus} processes");
        args.replace("processes", Value::Int(i64::try_from(cpus).unwrap_or(1)))?;
    }
    Ok(())
}

fn run(mut args: BoundArgs, ctx: &RunContext) -> Result<()> {
    let column = args.str("column")?.to_string();
    let lang = lang(&args)?;
    let size: ModelSize = args.str("model_size")?.parse()?;
    let processes = usize::try_from(args.int("processes")?).unwrap_or(1);
    let batch_size = batch_size(&args, ctx.config.defaults.ner_batch_size)?;

    let backend = load_entity_backend(lang, size)?;

    let mut enricher = enricher(&mut args, ctx, TITLE)?
        .require(column.as_str())
        .select(Selection::except([column.as_str()]))
        .add_columns([columns::ENTITY, columns::ENTITY_TYPE])
        .build()?;
    let position = enricher.column_index(&ColumnRef::from(column))?;

    info!("Extracting entities with {processes} process(es), {batch_size} documents per batch");

    OrderedPool::new(processes, batch_size).run(
        &mut enricher,
        |enricher| enricher.next_row(),
        |row: Row| {
            let entities = backend.extract_entities(row.cell(position))?;
            Ok((row, entities))
        },
        |enricher, (row, entities)| {
            let cells = entities
                .into_iter()
                .map(|entity| vec![entity.text, entity.label])
                .collect();
            enricher.write_expanded(&row, cells)
        },
    )?;

    enricher.finish()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::{RawArgs, RawValue, bind};

    fn bound(processes: &str) -> Result<BoundArgs> {
        let mut raw = RawArgs::default();
        raw.insert("column", RawValue::Single("text".to_string()));
        raw.insert("processes", RawValue::Single(processes.to_string()));
        bind(&command().schema, &raw)
    }

    #[test]
    fn test_schema_defaults() {
        let args = bound("1").unwrap();
        assert_eq!(args.str("lang").unwrap(), "en");
        assert_eq!(args.str("model_size").unwrap(), "sm");
        assert_eq!(args.opt_int("batch_size").unwrap(), None);
    }

    #[test]
    fn test_zero_processes_rejected() {
        let err = bound("0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for -p/--processes: should be positive or -1"
        );
        assert!(bound("-2").is_err());
        assert!(bound("4").is_ok());
    }

    #[test]
    fn test_auto_processes_resolved_to_cpu_count() {
        let mut args = bound("-1").unwrap();
        resolve(&mut args).unwrap();
        assert!(args.int("processes").unwrap() >= 1);

        let mut args = bound("3").unwrap();
        resolve(&mut args).unwrap();
        assert_eq!(args.int("processes").unwrap(), 3);
    }
}
