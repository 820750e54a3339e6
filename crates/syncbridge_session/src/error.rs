//! Error types for the session layer.

use std::time::Duration;
use syncbridge_codec::CodecError;
use syncbridge_engine::EngineError;
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur in the session layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The engine reported a value outside the known set.
    ///
    /// This means the engine and this layer disagree on the vocabulary and
    /// is never mapped to a default.
    #[error("unrecognized {kind} value from engine: {value}")]
    UnrecognizedEnumValue {
        /// Which enumeration the value belongs to.
        kind: &'static str,
        /// The raw value.
        value: u8,
    },

    /// The callback already has a live registration.
    #[error("{kind} callback is already registered")]
    DuplicateRegistration {
        /// Which notification kind.
        kind: &'static str,
    },

    /// The engine has no server URL for the session yet.
    #[error("session URL is not available")]
    UrlUnavailable,

    /// The stored partition value could not be decoded.
    #[error("failed to decode partition value: {0}")]
    ConfigDecode(#[from] CodecError),

    /// A completion wait ran out of time.
    #[error("{message}")]
    Timeout {
        /// Message rendered with the configured duration.
        message: String,
        /// The configured duration.
        timeout: Duration,
    },

    /// The engine failed the operation.
    #[error("engine error: {0}")]
    Engine(EngineError),
}

impl SessionError {
    /// Returns true for a timed-out completion wait.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SessionError::Timeout { .. })
    }

    /// Returns true for contract violations that should fail fast.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SessionError::UnrecognizedEnumValue { .. } | SessionError::DuplicateRegistration { .. }
        )
    }
}

impl From<EngineError> for SessionError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::UnknownCode { kind, value } => {
                SessionError::UnrecognizedEnumValue { kind, value }
            }
            other => SessionError::Engine(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_codes_become_unrecognized_values() {
        let err: SessionError = EngineError::UnknownCode {
            kind: "session state",
            value: 42,
        }
        .into();
        assert_eq!(
            err,
            SessionError::UnrecognizedEnumValue {
                kind: "session state",
                value: 42
            }
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn engine_failures_pass_through() {
        let err: SessionError = EngineError::operation("permission denied").into();
        assert_eq!(
            err,
            SessionError::Engine(EngineError::operation("permission denied"))
        );
        assert!(!err.is_fatal());
        assert!(!err.is_timeout());
    }

    #[test]
    fn error_display() {
        let err = SessionError::Timeout {
            message: "Downloading changes did not complete in 50 ms.".into(),
            timeout: Duration::from_millis(50),
        };
        assert_eq!(err.to_string(), "Downloading changes did not complete in 50 ms.");
        assert!(err.is_timeout());

        let err = SessionError::DuplicateRegistration { kind: "progress" };
        assert_eq!(err.to_string(), "progress callback is already registered");
    }
}
