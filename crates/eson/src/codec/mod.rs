//! Binary encoding/decoding for ESON documents.

pub mod document;
pub mod primitives;
pub mod value;

pub use document::{
    decode_array, decode_document, encode_array, encode_array_into, encode_document,
    encode_document_into,
};
pub use primitives::{Reader, Writer};
pub use value::{array_size, decode_value, encode_value, object_size};

pub(crate) use value::value_size;
