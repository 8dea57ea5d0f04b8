//! Configuration validation.

use crate::config::Config;
use crate::constants::MIN_MAX_FIELD_SIZE;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_stream(config)?;
    validate_defaults(config)?;
    Ok(())
}

/// Validate stream settings.
fn validate_stream(config: &Config) -> Result<()> {
    if config.stream.max_field_size < MIN_MAX_FIELD_SIZE {
        return Err(Error::ConfigValidation {
            message: format!(
                "stream.max_field_size must be at least {MIN_MAX_FIELD_SIZE}, got {}",
                config.stream.max_field_size
            ),
        });
    }

    Ok(())
}

/// Validate default settings.
fn validate_defaults(config: &Config) -> Result<()> {
    let defaults = &config.defaults;

    if defaults.ner_batch_size == 0 {
        return Err(Error::ConfigValidation {
            message: "defaults.ner_batch_size must be at least 1".to_string(),
        });
    }

    if defaults.embed_batch_size == 0 {
        return Err(Error::ConfigValidation {
            message: "defaults.embed_batch_size must be at least 1".to_string(),
        });
    }

    Ok(())
}
