//! Error types for the configuration boundary.
//!
//! The session core itself is infallible: invalid intents are no-ops. Only
//! settings coming from outside (files, environment, the settings editor)
//! can be rejected.

use thiserror::Error;

/// Errors raised while loading, parsing or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A settings field could not be read as a non-negative whole number.
    #[error("invalid value {value:?} for {field}: expected a non-negative whole number")]
    InvalidNumber { field: &'static str, value: String },

    /// A numeric setting exceeds the supported maximum.
    #[error("{field} is {value}, which exceeds the maximum of {max}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },

    /// An exercise entry is empty or whitespace.
    #[error("exercise #{index} has a blank name")]
    BlankExercise { index: usize },

    /// The tick period of a custom resolution must be at least one millisecond.
    #[error("custom clock resolution needs a period of at least 1 ms")]
    ZeroTickPeriod,

    /// The layered configuration sources could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}
