//! Stream values produced by binding path arguments.
//!
//! The `-` sentinel stands for the process standard streams.

use crate::constants::STDIO_SENTINEL;
use std::fs::{File, OpenOptions};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

/// Readable source bound from an input path.
#[derive(Debug)]
pub enum InputStream {
    /// Process standard input.
    Stdin(io::Stdin),
    /// Opened file.
    File {
        /// Path given on the command line.
        path: PathBuf,
        /// Handle opened for reading.
        file: File,
    },
    /// In-memory data.
    Memory(Cursor<Vec<u8>>),
}

impl InputStream {
    /// Open `path`, mapping the sentinel to standard input.
    pub fn open(path: &str) -> io::Result<Self> {
        if path == STDIO_SENTINEL {
            return Ok(Self::Stdin(io::stdin()));
        }

        let file = File::open(path)?;
        Ok(Self::File {
            path: PathBuf::from(path),
            file,
        })
    }

    /// Wrap in-memory bytes.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Memory(Cursor::new(data.into()))
    }

    /// Whether this is the process standard input.
    pub fn is_stdin(&self) -> bool {
        matches!(self, Self::Stdin(_))
    }

    /// Path of the opened file, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl Read for InputStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Stdin(stdin) => stdin.read(buf),
            Self::File { file, .. } => file.read(buf),
            Self::Memory(cursor) => cursor.read(buf),
        }
    }
}

/// Writable destination bound from an output path.
///
/// Files are opened for reading and writing without truncation: resolution
/// decides whether to truncate them or to resume into them.
#[derive(Debug)]
pub enum OutputTarget {
    /// Process standard output.
    Stdout,
    /// Opened file.
    File {
        /// Path given on the command line.
        path: PathBuf,
        /// Handle opened for reading and writing.
        file: File,
    },
}

impl OutputTarget {
    /// Open `path`, mapping the sentinel to standard output.
    pub fn open(path: &str) -> io::Result<Self> {
        if path == STDIO_SENTINEL {
            return Ok(Self::Stdout);
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        Ok(Self::File {
            path: PathBuf::from(path),
            file,
        })
    }

    /// Whether this is the process standard output.
    pub fn is_stdout(&self) -> bool {
        matches!(self, Self::Stdout)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_input_sentinel_is_stdin() {
        assert!(InputStream::open("-").unwrap().is_stdin());
    }

    #[test]
    fn test_input_path_opens_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "text\nhello\n").unwrap();

        let mut input = InputStream::open(file.path().to_str().unwrap()).unwrap();
        assert_eq!(input.path(), Some(file.path()));

        let mut contents = String::new();
        input.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "text\nhello\n");
    }

    #[test]
    fn test_input_missing_file_fails() {
        assert!(InputStream::open("/nonexistent/input.csv").is_err());
    }

    #[test]
    fn test_output_sentinel_is_stdout() {
        assert!(OutputTarget::open("-").unwrap().is_stdout());
    }

    #[test]
    fn test_output_open_keeps_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "a\n1\n").unwrap();

        let target = OutputTarget::open(path.to_str().unwrap()).unwrap();
        assert!(!target.is_stdout());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\n1\n");
    }

    #[test]
    fn test_output_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.csv");

        let target = OutputTarget::open(path.to_str().unwrap()).unwrap();
        assert!(matches!(target, OutputTarget::File { .. }));
        assert!(path.exists());
    }
}
