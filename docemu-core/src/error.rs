//! Error types and result types for emulator operations.
//!
//! Expected data-layer outcomes (a missing item, a duplicate create) are never errors:
//! they are reported through the [`StatusCode`](crate::response::StatusCode) of a response.
//! The variants of [`EmulatorError`] represent usage errors that the caller can only
//! recover from by fixing the call.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all hard failures that can be raised by a container, client or feed iterator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmulatorError {
    /// Malformed construction input, such as a blank container name.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The operation exists on the container surface but is not emulated.
    #[error("Operation not supported by this emulator: {0}")]
    Unsupported(String),
    /// `read_next` was called on a feed iterator that has no more results.
    #[error("Feed iterator has no more results")]
    FeedExhausted,
    /// Serialization/deserialization error when converting items to or from JSON or BSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EmulatorError {
    /// Shorthand for an [`EmulatorError::Unsupported`] naming the rejected operation.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        EmulatorError::Unsupported(operation.into())
    }

    /// Shorthand for an [`EmulatorError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        EmulatorError::InvalidArgument(message.into())
    }
}

/// A specialized `Result` type for emulator operations.
pub type EmulatorResult<T> = Result<T, EmulatorError>;

impl From<BsonError> for EmulatorError {
    fn from(err: BsonError) -> Self {
        EmulatorError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for EmulatorError {
    fn from(err: SerdeJsonError) -> Self {
        EmulatorError::Serialization(err.to_string())
    }
}

/// Fails with [`EmulatorError::InvalidArgument`] when `value` is empty or whitespace only.
pub fn ensure_not_blank(name: &str, value: &str) -> EmulatorResult<()> {
    if value.trim().is_empty() {
        return Err(EmulatorError::invalid_argument(format!(
            "'{name}' cannot be empty or whitespace"
        )));
    }

    Ok(())
}
