//! Error types for xzar.

use std::path::PathBuf;

/// Result type alias for xzar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for xzar.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV input.
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A command line value was rejected while binding or validating it.
    #[error("invalid value for {field}: {reason}")]
    ArgumentValidation {
        /// Flag or positional name as shown to the user.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Bound arguments contradict each other.
    #[error("{message}")]
    Resolving {
        /// Description of the contradiction.
        message: String,
    },

    /// A command schema was declared inconsistently.
    #[error("invalid schema for command '{command}': {reason}")]
    InvalidSchema {
        /// Command name.
        command: String,
        /// Description of the declaration error.
        reason: String,
    },

    /// A command body asked for an argument that is absent or of another kind.
    #[error("argument '{field}' is not bound as {expected}")]
    ArgumentType {
        /// Field name.
        field: String,
        /// Expected value kind.
        expected: &'static str,
    },

    /// Subcommand not found in the registry.
    #[error("unknown command '{name}'")]
    UnknownCommand {
        /// Command name.
        name: String,
    },

    /// Input stream has no header row.
    #[error("input has no header row")]
    MissingHeader,

    /// Requested column does not exist in the input header.
    #[error("column '{column}' not found in input header")]
    ColumnNotFound {
        /// Column name or index.
        column: String,
    },

    /// An appended column would shadow a selected input column.
    #[error("output column '{column}' collides with an input column (or another added column)")]
    ColumnCollision {
        /// Colliding column name.
        column: String,
    },

    /// A cell exceeds the configured maximum field size.
    #[error("field '{column}' of row {row} is {size} bytes, above the {limit} bytes limit")]
    FieldTooLarge {
        /// 0-based data row index.
        row: usize,
        /// Column name.
        column: String,
        /// Size of the cell in bytes.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// A transform returned the wrong number of appended cells.
    #[error("transform produced {actual} appended cells, expected {expected}")]
    AppendedCellCount {
        /// Number of declared appended columns.
        expected: usize,
        /// Number of cells produced.
        actual: usize,
    },

    /// A batch transform returned the wrong number of results for a chunk.
    #[error("batch transform returned {actual} results for a chunk of {expected} rows")]
    ChunkMismatch {
        /// Rows in the chunk.
        expected: usize,
        /// Results returned.
        actual: usize,
    },

    /// Existing output claims more rows than the input holds.
    #[error(
        "existing output accounts for {written} input rows but the input only has {input}; refusing to resume"
    )]
    ResumeMismatch {
        /// Input rows accounted for by the existing output.
        written: usize,
        /// Input rows actually available.
        input: usize,
    },

    /// Existing output was written with another header.
    #[error("cannot resume '{path}': existing header {found:?} differs from expected {expected:?}")]
    ResumeHeaderMismatch {
        /// Output path.
        path: PathBuf,
        /// Header this run would write.
        expected: Vec<String>,
        /// Header found in the existing output.
        found: Vec<String>,
    },

    /// Existing output cannot be interpreted for resuming.
    #[error("cannot resume '{path}': {reason}")]
    ResumeCorrupt {
        /// Output path.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// The run was interrupted by a signal.
    #[error("interrupted")]
    Interrupted,

    /// The downstream consumer closed its end of the output pipe.
    #[error("broken pipe")]
    BrokenPipe,

    /// A model backend failed.
    #[error("backend failure: {reason}")]
    Backend {
        /// Description of the failure.
        reason: String,
    },

    /// The worker pool stopped unexpectedly.
    #[error("worker pool failure: {reason}")]
    WorkerPool {
        /// Description of the failure.
        reason: String,
    },

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Output is being written by another process.
    #[error("output is locked by another process: {path}")]
    FileLocked {
        /// Path to the lock file.
        path: PathBuf,
    },

    /// Failed to create lock file.
    #[error("failed to create lock file '{path}'")]
    LockCreate {
        /// Path to the lock file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to remove a stale lock file.
    #[error("failed to remove stale lock file '{path}'")]
    LockRemove {
        /// Path to the lock file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Whether this error ends the run because of a signal or a closed pipe.
    ///
    /// Such runs exit with status 1 without printing a diagnostic.
    pub fn is_interruption(&self) -> bool {
        matches!(self, Self::Interrupted | Self::BrokenPipe)
    }

    /// Classify an error raised while writing output.
    pub fn from_write(error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::BrokenPipe {
            Self::BrokenPipe
        } else {
            Self::Io(error)
        }
    }

    /// Build an [`Error::ArgumentValidation`].
    pub fn argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ArgumentValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
