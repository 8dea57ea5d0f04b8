//! Resuming into a partially written output file.
//!
//! Resumability is derived purely from the rows already present in the output:
//! no sidecar state is kept. A trailing row cut short by an abrupt termination
//! is discarded and overwritten.

use crate::error::{Error, Result};
use crate::pipeline::OutputSink;
use csv::ByteRecord;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How already processed input rows are derived from the existing output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResumeStrategy {
    /// Every input row produced exactly one output row.
    #[default]
    RowCount,
    /// Input rows produce any number of output rows, each carrying the input
    /// row index in `column`.
    LastIndex {
        /// Name of the index column.
        column: &'static str,
    },
}

impl ResumeStrategy {
    /// Index column the output must carry, if any.
    pub fn index_column(&self) -> Option<&'static str> {
        match self {
            Self::RowCount => None,
            Self::LastIndex { column } => Some(column),
        }
    }
}

/// What a scan of the existing output found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeState {
    /// Header of the existing output, `None` when there is nothing to resume.
    pub header: Option<Vec<String>>,
    /// Complete data rows found.
    pub written_rows: usize,
    /// Input rows the existing output accounts for.
    pub accounted_rows: usize,
    /// Input rows to skip before processing again.
    pub rows_to_skip: usize,
    /// Length of the output prefix that is kept.
    pub valid_bytes: u64,
    /// Trailing bytes that will be overwritten.
    pub discarded_bytes: u64,
}

impl ResumeState {
    fn fresh(len: u64) -> Self {
        Self {
            header: None,
            written_rows: 0,
            accounted_rows: 0,
            rows_to_skip: 0,
            valid_bytes: 0,
            discarded_bytes: len,
        }
    }
}

/// Owner of an output file opened with `--resume`.
#[derive(Debug)]
pub struct Resumer {
    path: PathBuf,
    file: File,
    strategy: ResumeStrategy,
    state: ResumeState,
}

impl Resumer {
    /// Scan the existing content of `file` without modifying it.
    pub fn open(path: &Path, file: File, strategy: ResumeStrategy) -> Result<Self> {
        let state = scan(&file, path, strategy)?;

        if state.header.is_some() {
            info!(
                "Resuming {}: {} rows already written, skipping {} input rows",
                path.display(),
                state.written_rows,
                state.rows_to_skip
            );
        } else {
            debug!("Nothing to resume in {}", path.display());
        }

        Ok(Self {
            path: path.to_path_buf(),
            file,
            strategy,
            state,
        })
    }

    /// Whether prior output was found.
    pub fn is_resuming(&self) -> bool {
        self.state.header.is_some()
    }

    /// Number of input rows to skip.
    pub fn already_done_count(&self) -> usize {
        self.state.rows_to_skip
    }

    /// Scan result.
    pub fn state(&self) -> &ResumeState {
        &self.state
    }

    /// Strategy used for the scan.
    pub fn strategy(&self) -> ResumeStrategy {
        self.strategy
    }

    /// Output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop discarded bytes and return a sink appending after the kept prefix.
    ///
    /// The flag tells whether a header must be written first.
    pub fn into_sink(mut self) -> Result<(OutputSink, bool)> {
        if self.state.discarded_bytes > 0 && self.is_resuming() {
            debug!(
                "Discarding {} trailing bytes of {}",
                self.state.discarded_bytes,
                self.path.display()
            );
        }

        self.file.set_len(self.state.valid_bytes)?;
        self.file.seek(SeekFrom::End(0))?;

        let needs_header = !self.is_resuming();
        Ok((OutputSink::file(self.file, &self.path), needs_header))
    }
}

fn scan(file: &File, path: &Path, strategy: ResumeStrategy) -> Result<ResumeState> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(ResumeState::fresh(0));
    }

    let mut handle = file;
    handle.seek(SeekFrom::Start(0))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(handle);
    let mut record = ByteRecord::new();

    let mut header: Option<Vec<String>> = None;
    let mut index_position = None;
    let mut written_rows = 0;
    let mut valid_bytes = 0;
    // (input row index, byte offset where its group of rows starts)
    let mut last_group: Option<(usize, u64)> = None;

    loop {
        let start = reader.position().byte();
        if !reader.read_byte_record(&mut record)? {
            break;
        }
        let end = reader.position().byte();

        if end >= len && !is_terminated(file, start, len)? {
            break;
        }

        if header.is_none() {
            let cells = decode(&record, path)?;
            if let Some(column) = strategy.index_column() {
                index_position = Some(cells.iter().position(|c| c == column).ok_or_else(|| {
                    Error::ResumeCorrupt {
                        path: path.to_path_buf(),
                        reason: format!("index column '{column}' not found in existing header"),
                    }
                })?);
            }
            header = Some(cells);
            valid_bytes = end;
            continue;
        }

        written_rows += 1;
        valid_bytes = end;

        if let Some(position) = index_position {
            let index = parse_index(&record, position, path)?;
            match last_group {
                Some((last, _)) if index == last => {}
                Some((last, _)) if index < last => {
                    return Err(Error::ResumeCorrupt {
                        path: path.to_path_buf(),
                        reason: format!("input row index {index} appears after {last}"),
                    });
                }
                _ => last_group = Some((index, start)),
            }
        }
    }

    if header.is_none() {
        return Ok(ResumeState::fresh(len));
    }

    let (accounted_rows, rows_to_skip, valid_bytes) = match (strategy, last_group) {
        (ResumeStrategy::RowCount, _) => (written_rows, written_rows, valid_bytes),
        // The last group may be incomplete: drop it and recompute that row.
        (ResumeStrategy::LastIndex { .. }, Some((last, group_start))) => {
            (last + 1, last, group_start)
        }
        (ResumeStrategy::LastIndex { .. }, None) => (0, 0, valid_bytes),
    };

    Ok(ResumeState {
        header,
        written_rows,
        accounted_rows,
        rows_to_skip,
        valid_bytes,
        discarded_bytes: len - valid_bytes,
    })
}

/// Whether the bytes from `start` to the end of file form a terminated record.
fn is_terminated(file: &File, start: u64, len: u64) -> Result<bool> {
    let mut handle = file;
    handle.seek(SeekFrom::Start(start))?;

    let mut tail = Vec::new();
    handle.take(len - start).read_to_end(&mut tail)?;

    let quotes = tail.iter().filter(|&&b| b == b'"').count();
    Ok(tail.last() == Some(&b'\n') && quotes % 2 == 0)
}

fn decode(record: &ByteRecord, path: &Path) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| {
            String::from_utf8(field.to_vec()).map_err(|_| Error::ResumeCorrupt {
                path: path.to_path_buf(),
                reason: "header is not valid UTF-8".to_string(),
            })
        })
        .collect()
}

fn parse_index(record: &ByteRecord, position: usize, path: &Path) -> Result<usize> {
    record
        .get(position)
        .and_then(|field| std::str::from_utf8(field).ok())
        .and_then(|field| field.parse().ok())
        .ok_or_else(|| Error::ResumeCorrupt {
            path: path.to_path_buf(),
            reason: "row with a missing or invalid input row index".to_string(),
        })
}
