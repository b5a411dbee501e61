//! Error types for BSON wire encoding and decoding.

use thiserror::Error;

/// Classifies encode-side failures so callers can apply different recovery
/// policies: an `InvalidArgument` or `Range` error indicates a caller bug,
/// whereas a [`DecodeError`] indicates corrupt or truncated input and is
/// often expected when parsing untrusted bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong-shaped input to a primitive (e.g. an interior NUL byte in a
    /// cstring, or a replacement position that was never written).
    InvalidArgument,
    /// Numeric value outside the representable range of the target encoding.
    Range,
}

/// Error during binary encoding.
///
/// These are programmer-facing contract violations. A failed put operation
/// leaves the buffer untouched: validation happens before any byte effect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("cstring contains an interior NUL byte at offset {offset}")]
    InteriorNul { offset: usize },

    #[error("uint32 value {value} is out of range [0, 4294967295]")]
    Uint32OutOfRange { value: i64 },

    #[error("replace_int32 requires 4 written bytes, buffer has {write_position}")]
    ReplaceUnderflow { write_position: usize },

    #[error("replace_int32 position {position} is out of bounds (write position: {write_position})")]
    ReplaceOutOfBounds {
        position: usize,
        write_position: usize,
    },
}

impl EncodeError {
    /// Returns the error kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EncodeError::Uint32OutOfRange { .. } => ErrorKind::Range,
            EncodeError::InteriorNul { .. }
            | EncodeError::ReplaceUnderflow { .. }
            | EncodeError::ReplaceOutOfBounds { .. } => ErrorKind::InvalidArgument,
        }
    }
}

/// Error during binary decoding.
///
/// Raised for malformed or truncated input; the read cursor is left at the
/// position where the corruption was detected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input while reading {context}: needed {needed}, available {available}")]
    UnexpectedEof {
        context: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("invalid UTF-8 in {context}")]
    InvalidUtf8 { context: &'static str },

    #[error("missing NUL terminator at position {position}")]
    MissingNullTerminator { position: usize },

    #[error("invalid string length {length} (minimum is 1 for the trailing NUL)")]
    InvalidStringLength { length: i32 },
}
