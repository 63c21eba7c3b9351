//! Error types for the no-show risk engine.
//!
//! All fallible operations across the workspace return `EngineResult<T>`.
//! Variants map one-to-one onto the structured error kinds the tool layer
//! serializes for callers; none of them carry stack traces or panics.

use thiserror::Error;

/// The unified error type for the risk engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The appointment store is unreachable. The whole invocation fails —
    /// a partial forecast would report misleading tier counts.
    #[error("appointment data unavailable: {reason}")]
    DataUnavailable { reason: String },

    /// A referenced record does not exist in the store.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    /// A caller-supplied parameter could not be parsed or is out of range.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The remote scoring service failed or timed out for the entire batch.
    ///
    /// Recovered locally by the engine — affected appointments are routed
    /// through the fallback estimator, never surfaced to the caller as-is.
    #[error("inference service unavailable: {reason}")]
    InferenceUnavailable { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The prediction log could not persist a record.
    #[error("prediction log write failed: {reason}")]
    LogWriteFailed { reason: String },
}

impl EngineError {
    /// Convenience constructor for `NotFound`.
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type EngineResult<T> = Result<T, EngineError>;
