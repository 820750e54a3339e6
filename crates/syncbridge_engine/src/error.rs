//! Error types reported by the sync engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that the engine reports through its interface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine operation failed.
    #[error("engine operation failed: {message}")]
    Operation {
        /// Error message from the engine.
        message: String,
    },

    /// The engine dropped a completion notifier without settling it.
    #[error("completion signal abandoned by the engine")]
    Abandoned,

    /// A native code is outside the known set for its kind.
    #[error("unknown {kind} code: {value}")]
    UnknownCode {
        /// Which enumeration the code belongs to.
        kind: &'static str,
        /// The raw code.
        value: u8,
    },
}

impl EngineError {
    /// Creates an operation error.
    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation {
            message: message.into(),
        }
    }
}
