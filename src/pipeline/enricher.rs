//! The enrich pattern: read rows, append computed columns, write them out.

use crate::cli::InputStream;
use crate::config::StreamConfig;
use crate::error::{Error, Result};
use crate::interrupt::Interrupt;
use crate::locking::FileLock;
use crate::output::{NoopListener, ProgressEvent, ProgressListener};
use crate::pipeline::{
    ColumnRef, OutputMode, ResolvedOutput, Resumer, Row, RowReader, RowWriter, Selection,
};
use std::collections::HashSet;
use tracing::info;

/// Counters reported when an enricher finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    /// Input rows skipped because the output already held them.
    pub skipped: usize,
    /// Input rows transformed during this run.
    pub processed: usize,
    /// Output rows written during this run.
    pub written: usize,
}

/// Configures an [`Enricher`].
pub struct EnricherBuilder {
    input: InputStream,
    output: ResolvedOutput,
    selection: Selection,
    required: Vec<ColumnRef>,
    added: Vec<String>,
    total: Option<u64>,
    stream: StreamConfig,
    listener: Box<dyn ProgressListener>,
    interrupt: Interrupt,
}

impl EnricherBuilder {
    /// Input columns kept in the output. Defaults to all of them.
    #[must_use]
    pub fn select(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Input column the transform reads, whether or not it is kept.
    ///
    /// A missing column fails [`EnricherBuilder::build`] before the header is
    /// written.
    #[must_use]
    pub fn require(mut self, column: impl Into<ColumnRef>) -> Self {
        self.required.push(column.into());
        self
    }

    /// Columns appended after the selected input columns.
    #[must_use]
    pub fn add_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.added.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Expected number of input rows.
    #[must_use]
    pub fn total(mut self, total: Option<u64>) -> Self {
        self.total = total;
        self
    }

    /// CSV reading and writing options.
    #[must_use]
    pub fn stream_config(mut self, stream: &StreamConfig) -> Self {
        self.stream = stream.clone();
        self
    }

    /// Observer of row events.
    #[must_use]
    pub fn listener(mut self, listener: Box<dyn ProgressListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Flag checked before every row.
    #[must_use]
    pub fn interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Read the input header and prepare the output.
    ///
    /// Fails before anything is written when a selected or required column is
    /// missing, when an added column collides with a kept one, or when the
    /// existing output of a resumed run has another header.
    pub fn build(self) -> Result<Enricher> {
        let reader = RowReader::new(self.input, &self.stream)?;
        let positions = self.selection.resolve(reader.headers())?;
        for column in &self.required {
            column.position(reader.headers())?;
        }

        let (mode, lock) = self.output.into_parts();
        let index_column = match &mode {
            OutputMode::Resume(resumer) => resumer.strategy().index_column(),
            OutputMode::Plain(_) => None,
        };

        let mut header: Vec<String> = positions
            .iter()
            .map(|&position| reader.headers()[position].clone())
            .collect();
        let mut seen: HashSet<String> = header.iter().cloned().collect();
        for column in self.added.iter().map(String::as_str).chain(index_column) {
            if !seen.insert(column.to_string()) {
                return Err(Error::ColumnCollision {
                    column: column.to_string(),
                });
            }
            header.push(column.to_string());
        }

        let mut enricher = Enricher {
            reader,
            positions,
            added_len: self.added.len(),
            index_column,
            header,
            pending: None,
            writer: None,
            strip_null_bytes: self.stream.strip_null_bytes,
            rows_to_skip: 0,
            accounted_rows: 0,
            summary: EnrichSummary::default(),
            listener: self.listener,
            interrupt: self.interrupt,
            _lock: lock,
        };

        match mode {
            OutputMode::Plain(sink) => {
                let mut writer = RowWriter::new(sink, enricher.strip_null_bytes);
                writer.write_record(&enricher.header)?;
                enricher.writer = Some(writer);
            }
            OutputMode::Resume(resumer) => {
                if let Some(found) = &resumer.state().header
                    && *found != enricher.header
                {
                    return Err(Error::ResumeHeaderMismatch {
                        path: resumer.path().to_path_buf(),
                        expected: enricher.header,
                        found: found.clone(),
                    });
                }
                enricher.rows_to_skip = resumer.already_done_count();
                enricher.accounted_rows = resumer.state().accounted_rows;
                enricher.pending = Some(resumer);
            }
        }

        if let Some(total) = self.total {
            enricher.listener.on_event(ProgressEvent::TotalKnown(total));
        }

        Ok(enricher)
    }
}

/// Streams input rows to the output with appended columns.
///
/// Rows already present in a resumed output are skipped lazily by the first
/// call to [`Enricher::next_row`] or [`Enricher::next_chunk`].
pub struct Enricher {
    reader: RowReader,
    positions: Vec<usize>,
    added_len: usize,
    index_column: Option<&'static str>,
    header: Vec<String>,
    pending: Option<Resumer>,
    writer: Option<RowWriter>,
    strip_null_bytes: bool,
    rows_to_skip: usize,
    accounted_rows: usize,
    summary: EnrichSummary,
    listener: Box<dyn ProgressListener>,
    interrupt: Interrupt,
    // Released only after the writer is flushed and dropped.
    _lock: Option<FileLock>,
}

impl Enricher {
    /// Start configuring an enricher from `input` to `output`.
    pub fn builder(input: InputStream, output: ResolvedOutput) -> EnricherBuilder {
        EnricherBuilder {
            input,
            output,
            selection: Selection::all(),
            required: Vec::new(),
            added: Vec::new(),
            total: None,
            stream: StreamConfig::default(),
            listener: Box::new(NoopListener),
            interrupt: Interrupt::new(),
        }
    }

    /// Output header.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Position of an input column.
    pub fn column_index(&self, column: &ColumnRef) -> Result<usize> {
        column.position(self.reader.headers())
    }

    /// Number of input rows skipped by resuming.
    pub fn rows_to_skip(&self) -> usize {
        self.rows_to_skip
    }

    /// Next input row to transform, `None` at end of input.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        self.interrupt.check()?;

        while self.reader.rows_read() < self.rows_to_skip {
            self.interrupt.check()?;
            if self.reader.read_row()?.is_none() {
                return Err(self.mismatch());
            }
            self.summary.skipped += 1;
            self.listener.on_event(ProgressEvent::RowSkipped);
        }

        let row = self.reader.read_row()?;
        if row.is_none() && self.reader.rows_read() < self.accounted_rows {
            return Err(self.mismatch());
        }
        Ok(row)
    }

    /// Up to `size` rows, empty at end of input.
    pub fn next_chunk(&mut self, size: usize) -> Result<Vec<Row>> {
        let mut chunk = Vec::with_capacity(size);
        while chunk.len() < size {
            match self.next_row()? {
                Some(row) => chunk.push(row),
                None => break,
            }
        }
        Ok(chunk)
    }

    /// Write the output row of `row` with its appended `cells`.
    pub fn write_row(&mut self, row: &Row, cells: Vec<String>) -> Result<()> {
        let record = self.compose(row, cells)?;
        self.write(&[record], 1)
    }

    /// Write any number of output rows for a single input row.
    pub fn write_expanded(&mut self, row: &Row, results: Vec<Vec<String>>) -> Result<()> {
        let records = results
            .into_iter()
            .map(|cells| self.compose(row, cells))
            .collect::<Result<Vec<_>>>()?;
        self.write(&records, 1)
    }

    /// Write a chunk of rows with one result per row, in order.
    pub fn write_chunk(&mut self, rows: &[Row], results: Vec<Vec<String>>) -> Result<()> {
        if results.len() != rows.len() {
            return Err(Error::ChunkMismatch {
                expected: rows.len(),
                actual: results.len(),
            });
        }

        let records = rows
            .iter()
            .zip(results)
            .map(|(row, cells)| self.compose(row, cells))
            .collect::<Result<Vec<_>>>()?;
        self.write(&records, rows.len())
    }

    /// Flush the output and report what was done.
    pub fn finish(mut self) -> Result<EnrichSummary> {
        self.writer()?.flush()?;
        self.listener.finish();

        info!(
            "Processed {} rows ({} skipped, {} output rows written)",
            self.summary.processed, self.summary.skipped, self.summary.written
        );
        Ok(self.summary)
    }

    fn compose(&self, row: &Row, cells: Vec<String>) -> Result<Vec<String>> {
        if cells.len() != self.added_len {
            return Err(Error::AppendedCellCount {
                expected: self.added_len,
                actual: cells.len(),
            });
        }

        let mut record = Vec::with_capacity(self.header.len());
        record.extend(self.positions.iter().map(|&p| row.cell(p).to_string()));
        record.extend(cells);
        if self.index_column.is_some() {
            record.push(row.index().to_string());
        }
        Ok(record)
    }

    fn write(&mut self, records: &[Vec<String>], input_rows: usize) -> Result<()> {
        self.interrupt.check()?;
        self.writer()?.write_records(records)?;

        self.summary.processed += input_rows;
        self.summary.written += records.len();
        for _ in 0..input_rows {
            self.listener.on_event(ProgressEvent::RowProcessed);
        }
        Ok(())
    }

    fn writer(&mut self) -> Result<&mut RowWriter> {
        if let Some(resumer) = self.pending.take() {
            let (sink, needs_header) = resumer.into_sink()?;
            let mut writer = RowWriter::new(sink, self.strip_null_bytes);
            if needs_header {
                writer.write_record(&self.header)?;
            }
            self.writer = Some(writer);
        }

        self.writer.as_mut().ok_or_else(|| Error::Internal {
            message: "output writer is not initialized".to_string(),
        })
    }

    fn mismatch(&self) -> Error {
        Error::ResumeMismatch {
            written: self.accounted_rows,
            input: self.reader.rows_read(),
        }
    }
}
