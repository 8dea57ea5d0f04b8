//! Configuration type definitions.

use crate::constants::{DEFAULT_EMBED_BATCH_SIZE, DEFAULT_MAX_FIELD_SIZE, DEFAULT_NER_BATCH_SIZE};
use serde::{Deserialize, Serialize};

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tabular stream settings.
    #[serde(default)]
    pub stream: StreamConfig,

    /// Default command settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Settings handed to the row stream reader and writer.
///
/// Set once at startup and passed explicitly, never mutated during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Maximum size of a single cell in bytes.
    pub max_field_size: usize,

    /// Remove NUL bytes from cells on read and write.
    pub strip_null_bytes: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_field_size: DEFAULT_MAX_FIELD_SIZE,
            strip_null_bytes: true,
        }
    }
}

/// Defaults for command flags that were not given on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Documents per worker job for `ner`.
    pub ner_batch_size: usize,

    /// Rows per chunk for `embed`.
    pub embed_batch_size: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            ner_batch_size: DEFAULT_NER_BATCH_SIZE,
            embed_batch_size: DEFAULT_EMBED_BATCH_SIZE,
        }
    }
}
