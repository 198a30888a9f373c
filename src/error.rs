//! Error types for the outline library.
//!
//! This module defines all error types that can occur while reading,
//! editing and writing a document outline.

use crate::object::ObjectRef;

/// Result type alias for outline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during outline processing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller supplied an unusable value: unknown page location, unknown
    /// location keyword or a page index outside the page list.
    #[error("{0}")]
    InvalidArgument(String),

    /// An outline object identity reoccurred while traversing the structure.
    /// Only raised in strict mode.
    #[error("Outline object {0} reoccurred in structure")]
    OutlineStructure(ObjectRef),

    /// Referenced object not found in the document
    #[error("Object not found: {0} {1} R")]
    ObjectNotFound(u32, u16),

    /// Object has wrong type
    #[error("Invalid object type: expected {expected}, found {found}")]
    InvalidObjectType {
        /// Expected object type
        expected: String,
        /// Actual object type found
        found: String,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`].
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}
