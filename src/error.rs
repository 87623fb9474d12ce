//! Error types for codec registration, lookup and form decoding

use thiserror::Error;

/// Main error type for codec operations
///
/// Lookup misses are not errors: [`Registry::lookup`](crate::codec::Registry::lookup)
/// returns `None` instead.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A codec is already registered for this mime type
    #[error("codec with mime type {mime_type:?} already registered")]
    AlreadyRegistered { mime_type: String },

    /// No codec is registered for this mime type
    #[error("codec {mime_type:?} is not registered")]
    NotRegistered { mime_type: String },

    /// The mime type is one of the default aliases (`""` or `*/*`)
    #[error("mime type {mime_type:?} is reserved for the default codec")]
    ReservedMimeType { mime_type: String },

    /// Form field name does not follow the bracket notation
    #[error("invalid property name: {name:?}")]
    MalformedFieldName { name: String },

    /// Raw form value cannot be represented even as a JSON string
    #[error("invalid form value {raw:?}: {source}")]
    InvalidValue {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// Field path runs into an existing value of a different shape
    #[error("field {name:?} conflicts with a previously decoded field")]
    FieldConflict { name: String },

    /// Array index in a field path exceeds the configured maximum
    #[error("field {name:?} uses index {index}, maximum is {max}")]
    IndexOutOfRange {
        name: String,
        index: usize,
        max: usize,
    },

    /// Multipart body cannot be decoded without a boundary
    #[error("multipart boundary is missing")]
    MissingBoundary,

    /// Multipart part content or boundary error
    #[error("multipart error: {0}")]
    Multipart(String),

    /// Multipart body framing error reported by the part reader
    #[error("multipart framing error: {0}")]
    Framing(#[from] multer::Error),

    /// Request body exceeds the configured read limit
    #[error("body exceeds limit of {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// The codec cannot handle the given value
    #[error("unsupported value: {0}")]
    Unsupported(String),

    /// I/O error on the underlying sink or source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Text payload is not valid UTF-8
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl CodecError {
    /// Whether this error indicates a wiring bug in registry setup
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CodecError::AlreadyRegistered { .. }
                | CodecError::NotRegistered { .. }
                | CodecError::ReservedMimeType { .. }
        )
    }

    /// Whether this error was caused by malformed input data
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            CodecError::MalformedFieldName { .. }
                | CodecError::InvalidValue { .. }
                | CodecError::FieldConflict { .. }
                | CodecError::IndexOutOfRange { .. }
                | CodecError::MissingBoundary
                | CodecError::Multipart(_)
                | CodecError::Framing(_)
                | CodecError::BodyTooLarge { .. }
                | CodecError::Unsupported(_)
        )
    }
}

/// Result type alias for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
