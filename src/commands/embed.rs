//! `embed`: append the sentence embedding of a text column.

use crate::cli::validators::validate_positive;
use crate::cli::{ArgSpec, BoundArgs, CommandSchema, SubCommand, ValueKind};
use crate::commands::{RunContext, batch_size, enricher, lang};
use crate::constants::columns;
use crate::error::Result;
use crate::inference::{Lang, load_embedding_backend};
use crate::pipeline::ColumnRef;
use tracing::debug;

const TITLE: &str = "Embedding";

pub(super) fn command() -> SubCommand {
    let schema = CommandSchema::new("embed")
        .about("Compute sentence embeddings of a text column.")
        .long_about(
            "Compute sentence embeddings of a text column.\n\n\
             Appends one column per dimension, named dim_0, dim_1 and so on.",
        )
        .arg(
            ArgSpec::positional("column", ValueKind::String)
                .help("column of CSV file containing text from which to create embeddings"),
        )
        .arg(ArgSpec::input())
        .arg(
            ArgSpec::flag("lang", ValueKind::Enum(Lang::CHOICES))
                .short('l')
                .default("en")
                .help("lang for the sentence-transformers model to use."),
        )
        .arg(
            ArgSpec::flag("batch_size", ValueKind::Int)
                .short('B')
                .optional()
                .help("number of rows embedded at once.")
                .validate_with(validate_positive),
        )
        .typical();

    SubCommand::new(schema, run)
}

fn run(mut args: BoundArgs, ctx: &RunContext) -> Result<()> {
    let column = args.str("column")?.to_string();
    let chunk_size = batch_size(&args, ctx.config.defaults.embed_batch_size)?;
    let backend = load_embedding_backend(lang(&args)?)?;
    let dimension = backend.embed_dimension();

    let mut enricher = enricher(&mut args, ctx, TITLE)?
        .require(column.as_str())
        .add_columns((0..dimension).map(|i| format!("{}{i}", columns::DIMENSION_PREFIX)))
        .build()?;
    let position = enricher.column_index(&ColumnRef::from(column))?;

    debug!("Embedding chunks of {chunk_size} rows into {dimension} dimensions");

    loop {
        let chunk = enricher.next_chunk(chunk_size)?;
        if chunk.is_empty() {
            break;
        }

        let texts: Vec<&str> = chunk.iter().map(|row| row.cell(position)).collect();
        let vectors = backend.embed_batch(&texts)?;
        let cells = vectors
            .into_iter()
            .map(|vector| vector.iter().map(f32::to_string).collect())
            .collect();
        enricher.write_chunk(&chunk, cells)?;
    }

    enricher.finish()?;
    Ok(())
}
