//! `tokenize`: append the tokens of a text column.

use crate::cli::{ArgSpec, BoundArgs, CommandSchema, SubCommand, ValueKind};
use crate::commands::{RunContext, enricher, lang};
use crate::constants::columns;
use crate::error::Result;
use crate::inference::{Lang, WordTokenizer};
use crate::pipeline::ColumnRef;

const TITLE: &str = "Tokenizing";

pub(super) fn command() -> SubCommand {
    let schema = CommandSchema::new("tokenize")
        .about("Tokenize a text column.")
        .arg(
            ArgSpec::positional("column", ValueKind::String)
                .help("column of CSV file containing text to tokenize"),
        )
        .arg(ArgSpec::input())
        .arg(
            ArgSpec::flag("lang", ValueKind::Enum(Lang::CHOICES))
                .short('l')
                .default("en")
                .help("lang of the text."),
        )
        .arg(
            ArgSpec::flag("separator", ValueKind::String)
                .short('s')
                .default("|")
                .help("string used to join tokens."),
        )
        .typical();

    SubCommand::new(schema, run)
}

fn run(mut args: BoundArgs, ctx: &RunContext) -> Result<()> {
    let column = args.str("column")?.to_string();
    let separator = args.str("separator")?.to_string();
    let tokenizer = WordTokenizer::new(lang(&args)?)?;

    let mut enricher = enricher(&mut args, ctx, TITLE)?
        .require(column.as_str())
        .add_columns([columns::TOKENS])
        .build()?;
    let position = enricher.column_index(&ColumnRef::from(column))?;

    while let Some(row) = enricher.next_row()? {
        let tokens = tokenizer.tokenize(row.cell(position));
        enricher.write_row(&row, vec![tokens.join(separator.as_str())])?;
    }

    enricher.finish()?;
    Ok(())
}
