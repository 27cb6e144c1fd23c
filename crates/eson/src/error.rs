//! Error types for ESON encoding and decoding.

use thiserror::Error;

use crate::model::ValueKind;

/// Error during binary decoding.
///
/// Decoding never reads outside the supplied buffer: every length field is
/// validated against the remaining input before it is trusted, and any
/// violation surfaces here instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("invalid type tag: {tag:#04x}")]
    InvalidTypeTag { tag: u8 },

    #[error("invalid bool value: {value:#04x} (expected 0x00 or 0x01)")]
    InvalidBool { value: u8 },

    #[error("{field} declares negative length {len}")]
    NegativeLength { field: &'static str, len: i64 },

    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("object key is missing its NUL terminator")]
    UnterminatedKey,

    #[error("container nesting exceeds maximum depth {max}")]
    NestingTooDeep { max: usize },

    #[error("{context} declares size {declared} but its contents occupy {consumed} bytes")]
    SizeMismatch {
        context: &'static str,
        declared: u64,
        consumed: u64,
    },

    #[error("malformed encoding: {context}")]
    MalformedEncoding { context: &'static str },
}

/// Error during size computation or encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("array element {index} is {found:?} but element 0 is {expected:?} (array elements must share one type)")]
    MixedArrayElement {
        index: usize,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("object key contains a NUL byte")]
    KeyContainsNul,
}
