//! Output destination after argument resolution.

use crate::locking::FileLock;
use crate::pipeline::{OutputSink, Resumer};

/// How rows reach the output.
#[derive(Debug)]
pub enum OutputMode {
    /// Write from the start of an empty destination.
    Plain(OutputSink),
    /// Append after the rows already present in the output file.
    Resume(Resumer),
}

/// Output destination ready for an enricher, with the lock guarding it.
#[derive(Debug)]
pub struct ResolvedOutput {
    mode: OutputMode,
    lock: Option<FileLock>,
}

impl ResolvedOutput {
    /// Plain output.
    pub fn plain(sink: OutputSink, lock: Option<FileLock>) -> Self {
        Self {
            mode: OutputMode::Plain(sink),
            lock,
        }
    }

    /// Output resumed by `resumer`.
    pub fn resuming(resumer: Resumer, lock: Option<FileLock>) -> Self {
        Self {
            mode: OutputMode::Resume(resumer),
            lock,
        }
    }

    /// Whether `--resume` was requested.
    pub fn is_resume(&self) -> bool {
        matches!(self.mode, OutputMode::Resume(_))
    }

    /// Split into the mode and the lock, which must outlive every write.
    pub fn into_parts(self) -> (OutputMode, Option<FileLock>) {
        (self.mode, self.lock)
    }
}
