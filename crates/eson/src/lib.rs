//! ESON: a compact binary serialization format for dynamically-typed,
//! recursively-structured values.
//!
//! ESON is BSON-like: a document is an ordered key→value mapping whose
//! values are scalars, strings, opaque binary blobs, homogeneous arrays,
//! or nested objects, encoded as one self-describing byte buffer. The
//! format exists to embed large binary payloads (geometry buffers,
//! images, sample data) inside a single file without a schema compiler.
//!
//! # Quick Start
//!
//! ```rust
//! use eson::{decode_document, encode_document, Object, Value};
//!
//! let positions: Vec<u8> = (0..12).collect();
//!
//! // Build a document bottom-up
//! let mut mesh = Object::new();
//! mesh.insert("name".to_string(), Value::from("teapot"));
//! mesh.insert("vertex_count".to_string(), Value::from(4i64));
//! mesh.insert("positions".to_string(), Value::binary(&positions));
//!
//! // Encode to binary
//! let bytes = encode_document(&mesh).unwrap();
//!
//! // Decode back (zero-copy: binary payloads borrow `bytes`)
//! let decoded = decode_document(&bytes).unwrap();
//! assert_eq!(decoded["name"].as_str(), Some("teapot"));
//! assert_eq!(decoded["positions"].as_binary(), Some(&positions[..]));
//! ```
//!
//! # Modules
//!
//! - [`model`]: the [`Value`] tree, typed accessors, homogeneity
//!   validation, deep copy
//! - [`codec`]: binary encoding/decoding and exact size computation
//! - [`error`]: error types
//! - [`limits`]: security limits for decoding
//!
//! # Security
//!
//! The decoder is designed to safely handle untrusted input:
//! - Every length field is validated against the remaining buffer before
//!   it is trusted; nothing is ever read outside the supplied slice
//! - Nested containers are bounded to their parent's declared extent
//! - Nesting depth and array element counts are capped ([`limits`])
//! - Invalid data is rejected with descriptive errors
//!
//! # Wire Format
//!
//! All multi-byte quantities are native byte order; there is no magic
//! number, version field, checksum, or compression. A document is:
//!
//! ```text
//! int64  total_size            // includes these 8 bytes
//! entry* // until total_size is consumed
//! ```
//!
//! where each entry is a type tag byte, a NUL-terminated UTF-8 key, and a
//! payload: Int64/Float64 are 8 raw bytes, Bool is one byte, Null is
//! empty, String/Binary are an `int64` length followed by that many
//! bytes, Object recurses, and Array is `int64 total_size`, the shared
//! element tag, an `int64` count, and the untagged elements.
//!
//! # Ownership
//!
//! Decoded Binary values borrow the input buffer and are valid only while
//! it lives; everything else in a decoded tree is owned. Call
//! [`Value::into_owned`] or [`object_into_owned`] to detach a tree from
//! its buffer. Binary values built with [`Value::binary`] borrow caller
//! memory and never free it; [`Value::binary_owned`] payloads are freed
//! exactly once when the value drops.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;

// Re-export commonly used items at crate root
pub use codec::{
    array_size, decode_array, decode_document, decode_value, encode_array, encode_array_into,
    encode_document, encode_document_into, encode_value, object_size, Reader, Writer,
};
pub use error::{DecodeError, EncodeError};
pub use model::{array_into_owned, object_into_owned, Array, Object, Value, ValueKind};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
