//! Top-level document encoding/decoding.
//!
//! A document is a complete Object (or, through the `*_array` entry
//! points, a top-level Array) encoded as one contiguous, self-delimiting
//! byte buffer. There is no magic number or version field: consumers know
//! out-of-band that a buffer is ESON.

use crate::codec::primitives::{Reader, Writer};
use crate::codec::value::{
    array_size, decode_array_payload, decode_object_payload, encode_array_payload,
    encode_object_payload, object_size,
};
use crate::error::{DecodeError, EncodeError};
use crate::model::{Array, Object};

/// Encodes an object document into a freshly allocated, exactly sized
/// buffer.
pub fn encode_document(object: &Object<'_>) -> Result<Vec<u8>, EncodeError> {
    let size = object_size(object)?;
    let mut buf = vec![0u8; size as usize];
    encode_document_into(object, &mut buf)?;
    Ok(buf)
}

/// Encodes an object document into `buf`, returning the number of bytes
/// written, which is always exactly [`object_size`].
///
/// The caller owns the allocation. The encoder never writes past the end
/// of `buf`; a buffer shorter than the document fails with
/// [`EncodeError::BufferTooSmall`] before anything is written.
pub fn encode_document_into(object: &Object<'_>, buf: &mut [u8]) -> Result<usize, EncodeError> {
    let needed = object_size(object)? as usize;
    if buf.len() < needed {
        return Err(EncodeError::BufferTooSmall {
            needed,
            available: buf.len(),
        });
    }
    let mut writer = Writer::new(buf);
    encode_object_payload(&mut writer, object)?;
    Ok(writer.position())
}

/// Encodes an array document into a freshly allocated, exactly sized
/// buffer.
pub fn encode_array(array: &Array<'_>) -> Result<Vec<u8>, EncodeError> {
    let size = array_size(array)?;
    let mut buf = vec![0u8; size as usize];
    encode_array_into(array, &mut buf)?;
    Ok(buf)
}

/// Encodes an array document into `buf`, returning the number of bytes
/// written, which is always exactly [`array_size`].
pub fn encode_array_into(array: &Array<'_>, buf: &mut [u8]) -> Result<usize, EncodeError> {
    let needed = array_size(array)? as usize;
    if buf.len() < needed {
        return Err(EncodeError::BufferTooSmall {
            needed,
            available: buf.len(),
        });
    }
    let mut writer = Writer::new(buf);
    encode_array_payload(&mut writer, array)?;
    Ok(writer.position())
}

/// Decodes the object document at the start of `input`.
///
/// The decoded tree borrows `input`: Binary values are zero-copy views
/// into it and are only valid while it lives. Use
/// [`object_into_owned`](crate::model::object_into_owned) (or
/// [`Value::into_owned`](crate::model::Value::into_owned) on a wrapped
/// value) to detach the tree from the buffer. Strings, keys, and
/// containers are owned either way.
///
/// Documents are self-delimiting, so bytes after the declared total (a
/// following document, for instance) are left untouched and unread.
pub fn decode_document(input: &[u8]) -> Result<Object<'_>, DecodeError> {
    let mut reader = Reader::new(input);
    decode_object_payload(&mut reader, 0)
}

/// Decodes the array document at the start of `input`. Same borrowing and
/// trailing-byte rules as [`decode_document`].
pub fn decode_array(input: &[u8]) -> Result<Array<'_>, DecodeError> {
    let mut reader = Reader::new(input);
    decode_array_payload(&mut reader, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    #[test]
    fn test_golden_bytes_single_entry() {
        let mut o = Object::new();
        o.insert("a".to_string(), Value::from(7i64));

        let bytes = encode_document(&o).unwrap();

        // total(8) + tag(1) + "a\0"(2) + int64(8)
        let mut expected = Vec::new();
        expected.extend_from_slice(&19i64.to_ne_bytes());
        expected.push(2); // INT64 tag
        expected.extend_from_slice(b"a\0");
        expected.extend_from_slice(&7i64.to_ne_bytes());
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_prefix_counts_itself() {
        let mut o = Object::new();
        o.insert("name".to_string(), Value::from("jojo"));

        let bytes = encode_document(&o).unwrap();
        let declared = i64::from_ne_bytes(bytes[..8].try_into().unwrap());
        assert_eq!(declared as usize, bytes.len());
    }

    #[test]
    fn test_empty_object_roundtrip() {
        let o = Object::new();
        let bytes = encode_document(&o).unwrap();
        assert_eq!(bytes, 8i64.to_ne_bytes());
        assert_eq!(decode_document(&bytes).unwrap(), Object::new());
    }

    #[test]
    fn test_exact_buffer_is_enough_and_one_less_is_not() {
        let mut o = Object::new();
        o.insert("x".to_string(), Value::from(144i64));
        let size = object_size(&o).unwrap() as usize;

        let mut buf = vec![0u8; size];
        assert_eq!(encode_document_into(&o, &mut buf).unwrap(), size);

        let mut short = vec![0u8; size - 1];
        assert_eq!(
            encode_document_into(&o, &mut short),
            Err(EncodeError::BufferTooSmall {
                needed: size,
                available: size - 1,
            })
        );
        // Nothing was written into the short buffer.
        assert!(short.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut o = Object::new();
        o.insert("x".to_string(), Value::from(1i64));
        let mut bytes = encode_document(&o).unwrap();
        bytes.extend_from_slice(b"next document could start here");

        let decoded = decode_document(&bytes).unwrap();
        assert_eq!(decoded["x"].as_i64(), Some(1));
    }

    #[test]
    fn test_decode_empty_input() {
        assert_eq!(
            decode_document(&[]),
            Err(DecodeError::UnexpectedEof {
                context: "object size"
            })
        );
    }

    #[test]
    fn test_array_document_roundtrip() {
        let array = vec![Value::from(1.0f64), Value::from(2.5f64)];
        let bytes = encode_array(&array).unwrap();
        assert_eq!(bytes.len(), array_size(&array).unwrap() as usize);

        let decoded = decode_array(&bytes).unwrap();
        assert_eq!(decoded, array);
    }

    #[test]
    fn test_array_into_exact_buffer() {
        let array = vec![Value::from("a"), Value::from("bc")];
        let size = array_size(&array).unwrap() as usize;
        let mut buf = vec![0u8; size];
        assert_eq!(encode_array_into(&array, &mut buf).unwrap(), size);
        assert_eq!(decode_array(&buf).unwrap(), array);
    }
}
