//! Error types for controller configuration.
//!
//! The step path itself is total: every input is a real number and every
//! branch completes. Errors only arise when parsing or strictly validating a
//! configuration.

use thiserror::Error;

/// Result type for controller configuration operations.
pub type PidResult<T> = Result<T, PidError>;

#[derive(Error, Debug)]
pub enum PidError {
    /// Configuration map failed to parse (bad syntax or unrecognized key).
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Strict validation rejected a configuration value.
    #[error(transparent)]
    Core(#[from] rl_core::CoreError),
}
