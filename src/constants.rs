//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "xzar";

/// Path sentinel standing for standard input or standard output.
pub const STDIO_SENTINEL: &str = "-";

/// Lock file extension appended to output paths.
pub const LOCK_FILE_EXTENSION: &str = ".xzar.lock";

/// Default maximum size of a single CSV cell, in bytes.
///
/// Large enough to hold whole documents in a text column.
pub const DEFAULT_MAX_FIELD_SIZE: usize = usize::MAX >> 1;

/// Smallest accepted maximum field size (the conservative limit of common CSV
/// readers, which long text columns routinely exceed).
pub const MIN_MAX_FIELD_SIZE: usize = 131_072;

/// Default number of documents handed to a worker at once by `ner`.
pub const DEFAULT_NER_BATCH_SIZE: usize = 64;

/// Default number of rows per embedding chunk.
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 32;

/// Sentinel value of `-p/--processes` meaning "one worker per available CPU".
pub const PROCESSES_AUTO: i64 = -1;

/// Upper bound of ordered pool workers per available CPU.
pub const MAX_WORKERS_PER_CPU: usize = 4;

/// Number of in-flight batches allowed per worker in the ordered pool.
pub const POOL_BATCHES_PER_WORKER: usize = 2;

/// Output column names.
pub mod columns {
    /// Entity surface text written by `ner`.
    pub const ENTITY: &str = "entity";
    /// Entity label written by `ner`.
    pub const ENTITY_TYPE: &str = "entity_type";
    /// Input row index written by `ner` when resuming is requested.
    pub const INPUT_ROW: &str = "input_row";
    /// Joined tokens written by `tokenize`.
    pub const TOKENS: &str = "tokens";
    /// Prefix of embedding dimension columns written by `embed`.
    pub const DIMENSION_PREFIX: &str = "dim_";
}

/// Progress bar styling.
pub mod progress {
    /// Bar template once the total is known.
    pub const BAR_TEMPLATE: &str =
        "{msg} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} rows ({eta})";
    /// Spinner template while the total is unknown.
    pub const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg} [{elapsed_precise}] {pos} rows";
    /// Characters used to draw the bar.
    pub const PROGRESS_CHARS: &str = "█▓▒░ ";
    /// Message shown while already written rows are replayed.
    pub const RESUMING_MESSAGE: &str = "Resuming";
}
