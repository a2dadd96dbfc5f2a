//! Error types for the ambient comfort agent

use thiserror::Error;

/// Core error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// A raw sensor sample carried an out-of-range field
    #[error("invalid {field}: {value}")]
    InvalidInput {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Feedback or action selection requested before any observation
    #[error("no environment observation received yet")]
    NoObservation,

    /// A recovered snapshot does not match the current state/action universe
    #[error("snapshot shape mismatch: expected {expected:?}, found {found:?}")]
    CorruptSnapshot {
        /// Shape implied by the current universe
        expected: (usize, usize),
        /// Shape found in the snapshot
        found: (usize, usize),
    },

    /// Snapshot or log I/O failure
    #[error("persistence error: {0}")]
    Persistence(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
