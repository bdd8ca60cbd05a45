//! Error types for protocol operations.

/// Errors that can occur while decoding host records into typed entities.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The record has no row identifier column.
    #[error("record is missing the row identifier column")]
    MissingRowId,

    /// The row identifier is not an integer.
    #[error("row identifier is not an integer: {0}")]
    InvalidRowId(serde_json::Value),
}

/// A specialized Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
