use thiserror::Error;

/// Everything that can go wrong while encoding or decoding wire data.
///
/// A decode stops at the first error. Whatever was partially built is dropped
/// and never handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("Unexpected end of input: needed {needed} bytes, {available} available")]
    UnexpectedEof {
        needed:    usize,
        available: usize,
    },

    #[error("Invalid UTF-8 in string field")]
    InvalidUtf8,

    #[error("Serialized size {size} exceeds the {max} byte limit")]
    DataTooLarge {
        size: usize,
        max:  usize,
    },

    #[error("Array count {count} exceeds the per-array limit of {max}")]
    ArrayTooLarge {
        count: u32,
        max:   u32,
    },

    #[error("Total array elements {total} exceed the per-message limit of {max}")]
    TooManyElements {
        total: u64,
        max:   u64,
    },

    #[error("Invalid boolean byte {0:#04x} (expected 0 or 1)")]
    InvalidBool(u8),

    #[error("Invalid magic bytes {0:?} (expected \"SDP\")")]
    InvalidMagic([u8; 3]),

    #[error("Unsupported protocol version {0:#04x}")]
    UnsupportedVersion(u8),

    #[error("Unknown message type id {0}")]
    UnknownTypeId(u16),

    #[error("Message type id {found} does not match expected type id {expected}")]
    TypeIdMismatch {
        expected: u16,
        found:    u16,
    },

    #[error("Output buffer too small: needed {needed} bytes, {available} available")]
    BufferTooSmall {
        needed:    usize,
        available: usize,
    },

    #[error("Arena handle refers to memory released by a reset")]
    StaleArenaHandle,

    #[error("Value does not match schema: {0}")]
    SchemaMismatch(String),
}

pub type Result<T> = std::result::Result<T, WireError>;
