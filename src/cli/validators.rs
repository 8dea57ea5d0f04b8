//! Validators attached to argument specifications.
//!
//! Each validator receives the bound value and returns the reason it was
//! rejected. Absent optional values are never validated.

use crate::cli::bind::Value;
use crate::constants::PROCESSES_AUTO;

/// Number of worker processes: positive, or -1 for one per available CPU.
pub fn validate_processes(value: &Value) -> Result<(), String> {
    match value {
        Value::Int(p) if *p > 0 || *p == PROCESSES_AUTO => Ok(()),
        Value::Int(_) => Err("should be positive or -1".to_string()),
        other => Err(format!("expected an integer, got {}", other.kind_name())),
    }
}

/// Strictly positive integer.
pub fn validate_positive(value: &Value) -> Result<(), String> {
    match value {
        Value::Int(n) if *n > 0 => Ok(()),
        Value::Int(n) => Err(format!("should be positive, got {n}")),
        other => Err(format!("expected an integer, got {}", other.kind_name())),
    }
}

/// Integer greater than or equal to zero.
pub fn validate_non_negative(value: &Value) -> Result<(), String> {
    match value {
        Value::Int(n) if *n >= 0 => Ok(()),
        Value::Int(n) => Err(format!("should not be negative, got {n}")),
        other => Err(format!("expected an integer, got {}", other.kind_name())),
    }
}
