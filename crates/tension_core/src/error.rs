//! Wire codec error types

use thiserror::Error;

/// Errors produced while decoding an animation message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// The buffer ended in the middle of a field
    #[error("Unexpected end of input at byte {offset}")]
    Truncated { offset: usize },

    /// A varint ran past ten bytes
    #[error("Malformed varint at byte {offset}")]
    MalformedVarint { offset: usize },

    /// A field key carried field number zero
    #[error("Field number zero is reserved")]
    ZeroTag,

    /// The wire type is not one this codec understands
    #[error("Unknown wire type: {0}")]
    UnknownWireType(u8),

    /// A known field arrived with the wrong wire type
    #[error("Field {tag} cannot be read from wire type {wire_type}")]
    UnexpectedWireType { tag: u32, wire_type: u8 },
}

/// Result type for wire operations
pub type Result<T> = std::result::Result<T, WireError>;
