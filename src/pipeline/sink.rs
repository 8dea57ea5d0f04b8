//! Output sink with broken-pipe handling.

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Buffered destination for encoded rows.
///
/// When the consumer closes its end of a pipe, the sink switches to a discard
/// target so that later writes (including the flush on drop) go nowhere.
#[derive(Debug)]
pub struct OutputSink {
    target: SinkTarget,
}

#[derive(Debug)]
enum SinkTarget {
    Stdout(BufWriter<Stdout>),
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
    Discard,
}

impl OutputSink {
    /// Sink writing to standard output.
    pub fn stdout() -> Self {
        Self {
            target: SinkTarget::Stdout(BufWriter::new(io::stdout())),
        }
    }

    /// Sink appending at the current position of `file`.
    pub fn file(file: File, path: &Path) -> Self {
        Self {
            target: SinkTarget::File {
                path: path.to_path_buf(),
                writer: BufWriter::new(file),
            },
        }
    }

    /// Sink dropping everything.
    pub fn discard() -> Self {
        Self {
            target: SinkTarget::Discard,
        }
    }

    /// Whether writes are being discarded.
    pub fn is_discarding(&self) -> bool {
        matches!(self.target, SinkTarget::Discard)
    }

    /// Path of the output file, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.target {
            SinkTarget::File { path, .. } => Some(path),
            _ => None,
        }
    }

    fn on_error(&mut self, error: io::Error) -> io::Error {
        if error.kind() == io::ErrorKind::BrokenPipe {
            debug!("Output pipe closed, discarding further writes");
            // into_parts drops the buffer without flushing it again
            match std::mem::replace(&mut self.target, SinkTarget::Discard) {
                SinkTarget::Stdout(writer) => drop(writer.into_parts()),
                SinkTarget::File { writer, .. } => drop(writer.into_parts()),
                SinkTarget::Discard => {}
            }
        }
        error
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = match &mut self.target {
            SinkTarget::Stdout(writer) => writer.write(buf),
            SinkTarget::File { writer, .. } => writer.write(buf),
            SinkTarget::Discard => Ok(buf.len()),
        };
        result.map_err(|e| self.on_error(e))
    }

    fn flush(&mut self) -> io::Result<()> {
        let result = match &mut self.target {
            SinkTarget::Stdout(writer) => writer.flush(),
            SinkTarget::File { writer, .. } => writer.flush(),
            SinkTarget::Discard => Ok(()),
        };
        result.map_err(|e| self.on_error(e))
    }
}
