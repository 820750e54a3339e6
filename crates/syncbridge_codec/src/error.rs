//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding a stored partition value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The stored text is not valid JSON.
    #[error("invalid JSON: {message}")]
    InvalidJson {
        /// Parser message.
        message: String,
    },

    /// The JSON value has a shape that is not a valid partition value.
    #[error("unsupported partition value type: {type_name}")]
    UnsupportedType {
        /// Name of the offending JSON shape.
        type_name: String,
    },

    /// A `$oid` wrapper did not hold 24 hex digits.
    #[error("invalid object id: {value:?}")]
    InvalidObjectId {
        /// The rejected text.
        value: String,
    },

    /// A `$uuid` wrapper did not hold a valid UUID.
    #[error("invalid uuid: {value:?}")]
    InvalidUuid {
        /// The rejected text.
        value: String,
    },

    /// A number could not be represented as a 64-bit integer.
    #[error("invalid number: {value}")]
    InvalidNumber {
        /// The rejected text.
        value: String,
    },
}

impl CodecError {
    /// Create an invalid JSON error.
    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::InvalidJson {
            message: message.into(),
        }
    }

    /// Create an unsupported type error.
    pub fn unsupported_type(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
        }
    }

    /// Create an invalid number error.
    pub fn invalid_number(value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            value: value.into(),
        }
    }
}
