//! Security limits for decoding.
//!
//! Every string, binary, object, and array payload on the wire is
//! length-prefixed, and the decoder validates each prefix against the bytes
//! actually remaining, so payload sizes are implicitly bounded by the input
//! buffer. Two quantities are not bounded that way and get explicit caps
//! here: nesting depth (a short buffer can still declare deeply nested
//! containers and exhaust the stack) and array element counts (Null
//! elements occupy zero payload bytes, so a declared count can exceed the
//! buffer length by any factor).

/// Maximum container nesting depth the decoder will follow.
pub const MAX_DEPTH: usize = 128;

/// Maximum element count accepted for a single array.
pub const MAX_ARRAY_LEN: usize = 1 << 24;
