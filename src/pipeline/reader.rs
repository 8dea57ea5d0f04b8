//! Header-bearing CSV row reader.

use crate::cli::InputStream;
use crate::config::StreamConfig;
use crate::error::{Error, Result};
use csv::StringRecord;
use std::sync::Arc;

/// One data row of the input stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    index: usize,
    headers: Arc<[String]>,
    cells: Vec<String>,
}

impl Row {
    /// Create a row. `index` is the 0-based position among data rows.
    pub fn new(index: usize, headers: Arc<[String]>, cells: Vec<String>) -> Self {
        Self {
            index,
            headers,
            cells,
        }
    }

    /// 0-based position of this row in the input.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Header shared by every row of the stream.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Cell at `position`, empty when absent.
    pub fn cell(&self, position: usize) -> &str {
        self.cells.get(position).map_or("", String::as_str)
    }

    /// Cell of the first column called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|position| self.cell(position))
    }
}

/// Reads a header row then data rows from an input stream.
pub struct RowReader {
    inner: csv::Reader<InputStream>,
    headers: Arc<[String]>,
    record: StringRecord,
    next_index: usize,
    options: StreamConfig,
}

impl RowReader {
    /// Read the header of `input`.
    pub fn new(input: InputStream, options: &StreamConfig) -> Result<Self> {
        let mut inner = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(input);

        let headers: Vec<String> = inner
            .headers()?
            .iter()
            .map(|h| clean(h, options.strip_null_bytes))
            .collect();

        if headers.is_empty() {
            return Err(Error::MissingHeader);
        }

        Ok(Self {
            inner,
            headers: headers.into(),
            record: StringRecord::new(),
            next_index: 0,
            options: options.clone(),
        })
    }

    /// Input header.
    pub fn headers(&self) -> &Arc<[String]> {
        &self.headers
    }

    /// Number of data rows read so far.
    pub fn rows_read(&self) -> usize {
        self.next_index
    }

    /// Read the next data row, `None` at end of input.
    pub fn read_row(&mut self) -> Result<Option<Row>> {
        if !self.inner.read_record(&mut self.record)? {
            return Ok(None);
        }

        let index = self.next_index;
        let mut cells = Vec::with_capacity(self.record.len());

        for (position, field) in self.record.iter().enumerate() {
            if field.len() > self.options.max_field_size {
                return Err(Error::FieldTooLarge {
                    row: index,
                    column: self.headers.get(position).cloned().unwrap_or_default(),
                    size: field.len(),
                    limit: self.options.max_field_size,
                });
            }
            cells.push(clean(field, self.options.strip_null_bytes));
        }

        self.next_index += 1;
        Ok(Some(Row::new(index, Arc::clone(&self.headers), cells)))
    }
}

fn clean(value: &str, strip_null_bytes: bool) -> String {
    if strip_null_bytes && value.contains('\0') {
        value.replace('\0', "")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn reader(data: &str) -> Result<RowReader> {
        RowReader::new(InputStream::from_bytes(data), &StreamConfig::default())
    }

    #[test]
    fn test_reads_header_and_rows() {
        let mut reader = reader("id,text\n1,hello\n2,\"a, b\"\n").unwrap();
        assert_eq!(&reader.headers()[..], ["id", "text"]);

        let first = reader.read_row().unwrap().unwrap();
        assert_eq!(first.index(), 0);
        assert_eq!(first.get("text"), Some("hello"));

        let second = reader.read_row().unwrap().unwrap();
        assert_eq!(second.index(), 1);
        assert_eq!(second.cell(1), "a, b");

        assert!(reader.read_row().unwrap().is_none());
        assert_eq!(reader.rows_read(), 2);
    }

    #[test]
    fn test_blank_cell_is_empty_string() {
        let mut reader = reader("a,b\n,x\n").unwrap();
        let row = reader.read_row().unwrap().unwrap();
        assert_eq!(row.cell(0), "");
        assert_eq!(row.cell(5), "");
    }

    #[test]
    fn test_empty_input_has_no_header() {
        assert!(matches!(reader(""), Err(Error::MissingHeader)));
    }

    #[test]
    fn test_long_cells_are_not_truncated() {
        let text = "x".repeat(200_000);
        let mut reader = reader(&format!("text\n{text}\n")).unwrap();
        let row = reader.read_row().unwrap().unwrap();
        assert_eq!(row.cell(0).len(), 200_000);
    }

    #[test]
    fn test_field_size_limit_is_enforced() {
        let options = StreamConfig {
            max_field_size: 4,
            strip_null_bytes: true,
        };
        let mut reader =
            RowReader::new(InputStream::from_bytes("text\nabcdef\n"), &options).unwrap();
        let err = reader.read_row().unwrap_err();
        assert!(matches!(err, Error::FieldTooLarge { size: 6, limit: 4, .. }));
    }

    #[test]
    fn test_null_bytes_are_stripped() {
        let mut reader = reader("text\nab\0c\n").unwrap();
        let row = reader.read_row().unwrap().unwrap();
        assert_eq!(row.cell(0), "abc");
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let mut reader = reader("a,b\n1\n").unwrap();
        assert!(matches!(reader.read_row(), Err(Error::Csv(_))));
    }
}
