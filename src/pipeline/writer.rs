//! CSV row writer.

use crate::error::{Error, Result};
use crate::pipeline::OutputSink;
use std::io::Write;

/// Encodes records and hands each batch to the sink in a single write.
#[derive(Debug)]
pub struct RowWriter {
    sink: OutputSink,
    buffer: Vec<u8>,
    strip_null_bytes: bool,
}

impl RowWriter {
    /// Wrap `sink`.
    pub fn new(sink: OutputSink, strip_null_bytes: bool) -> Self {
        Self {
            sink,
            buffer: Vec::new(),
            strip_null_bytes,
        }
    }

    /// Write one record.
    pub fn write_record<S: AsRef<str>>(&mut self, record: &[S]) -> Result<()> {
        self.write_records::<&[S], S>(std::slice::from_ref(&record))
    }

    /// Write several records with one call to the sink.
    pub fn write_records<R, S>(&mut self, records: &[R]) -> Result<()>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        if records.is_empty() {
            return Ok(());
        }

        self.buffer.clear();
        let mut encoder = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .flexible(false)
            .from_writer(&mut self.buffer);
        for record in records {
            encode(&mut encoder, record.as_ref(), self.strip_null_bytes)?;
        }
        encoder.flush()?;
        drop(encoder);

        let result = self.sink.write_all(&self.buffer);
        self.buffer.clear();
        result.map_err(Error::from_write)
    }

    /// Flush buffered rows to the destination.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush().map_err(Error::from_write)
    }
}

fn encode<W: Write, S: AsRef<str>>(
    encoder: &mut csv::Writer<W>,
    record: &[S],
    strip_null_bytes: bool,
) -> Result<()> {
    if strip_null_bytes {
        encoder.write_record(record.iter().map(|cell| cell.as_ref().replace('\0', "")))?;
    } else {
        encoder.write_record(record.iter().map(|cell| cell.as_ref().as_bytes()))?;
    }
    Ok(())
}
