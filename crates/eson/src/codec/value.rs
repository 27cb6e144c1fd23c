//! Value encoding/decoding for the ESON binary format.
//!
//! Implements the per-variant payload layout and the object entry grammar
//! (`tag`, NUL-terminated key, payload). Length prefixes are `i64` and an
//! object's or array's prefix counts itself: the prefix value equals the
//! total encoded size of that value, which is also what the size
//! calculator reports.

use std::borrow::Cow;

use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{MAX_ARRAY_LEN, MAX_DEPTH};
use crate::model::{check_homogeneous, Array, Object, Value, ValueKind};

// =============================================================================
// SIZE
// =============================================================================

/// Exact encoded size of an object payload, nested or top-level. This is
/// also the value the object's own length prefix carries.
pub fn object_size(object: &Object<'_>) -> Result<u64, EncodeError> {
    let mut size = 8u64;
    for (key, value) in object {
        if key.as_bytes().contains(&0) {
            return Err(EncodeError::KeyContainsNul);
        }
        size += 1 + key.len() as u64 + 1 + value_size(value)?;
    }
    Ok(size)
}

/// Exact encoded size of an array payload: length prefix, element tag,
/// element count, and the untagged elements.
pub fn array_size(array: &Array<'_>) -> Result<u64, EncodeError> {
    check_homogeneous(array)?;
    let mut size = 8u64 + 1 + 8;
    for element in array {
        size += value_size(element)?;
    }
    Ok(size)
}

pub(crate) fn value_size(value: &Value<'_>) -> Result<u64, EncodeError> {
    Ok(match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int64(_) | Value::Float64(_) => 8,
        Value::String(s) => 8 + s.len() as u64,
        Value::Binary(b) => 8 + b.len() as u64,
        Value::Array(a) => array_size(a)?,
        Value::Object(o) => object_size(o)?,
    })
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writes one value's payload: raw bytes for scalars, length-prefixed data
/// for strings and binaries, the full recursive encoding for containers.
/// The entry tag and key, where applicable, are the caller's business.
pub fn encode_value(writer: &mut Writer<'_>, value: &Value<'_>) -> Result<(), EncodeError> {
    match value {
        Value::Null => Ok(()),
        Value::Bool(v) => writer.write_byte(if *v { 0x01 } else { 0x00 }),
        Value::Int64(v) => writer.write_i64(*v),
        Value::Float64(v) => writer.write_f64(*v),
        Value::String(s) => {
            writer.write_i64(s.len() as i64)?;
            writer.write_bytes(s.as_bytes())
        }
        Value::Binary(b) => {
            writer.write_i64(b.len() as i64)?;
            writer.write_bytes(b)
        }
        Value::Array(a) => encode_array_payload(writer, a),
        Value::Object(o) => encode_object_payload(writer, o),
    }
}

pub(crate) fn encode_object_payload(
    writer: &mut Writer<'_>,
    object: &Object<'_>,
) -> Result<(), EncodeError> {
    let total = object_size(object)?;
    writer.write_i64(total as i64)?;
    for (key, value) in object {
        writer.write_byte(value.kind() as u8)?;
        writer.write_key(key)?;
        encode_value(writer, value)?;
    }
    Ok(())
}

pub(crate) fn encode_array_payload(
    writer: &mut Writer<'_>,
    array: &Array<'_>,
) -> Result<(), EncodeError> {
    // array_size re-checks homogeneity, so a mixed array never hits the
    // wire even when built without Value::array.
    let total = array_size(array)?;
    writer.write_i64(total as i64)?;
    let elem_tag = array.first().map_or(ValueKind::Null, Value::kind);
    writer.write_byte(elem_tag as u8)?;
    writer.write_i64(array.len() as i64)?;
    for element in array {
        encode_value(writer, element)?;
    }
    Ok(())
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes one value payload of the given kind (zero-copy for Binary).
pub fn decode_value<'a>(
    reader: &mut Reader<'a>,
    kind: ValueKind,
) -> Result<Value<'a>, DecodeError> {
    decode_value_at(reader, kind, 0)
}

pub(crate) fn decode_value_at<'a>(
    reader: &mut Reader<'a>,
    kind: ValueKind,
    depth: usize,
) -> Result<Value<'a>, DecodeError> {
    match kind {
        ValueKind::Null => Ok(Value::Null),
        ValueKind::Bool => decode_bool(reader),
        ValueKind::Int64 => Ok(Value::Int64(reader.read_i64("int64")?)),
        ValueKind::Float64 => Ok(Value::Float64(reader.read_f64("float64")?)),
        ValueKind::String => decode_string(reader),
        ValueKind::Binary => decode_binary(reader),
        ValueKind::Array => Ok(Value::Array(decode_array_payload(reader, depth)?)),
        ValueKind::Object => Ok(Value::Object(decode_object_payload(reader, depth)?)),
    }
}

fn decode_bool<'a>(reader: &mut Reader<'a>) -> Result<Value<'a>, DecodeError> {
    let byte = reader.read_byte("bool")?;
    match byte {
        0x00 => Ok(Value::Bool(false)),
        0x01 => Ok(Value::Bool(true)),
        _ => Err(DecodeError::InvalidBool { value: byte }),
    }
}

fn decode_string<'a>(reader: &mut Reader<'a>) -> Result<Value<'a>, DecodeError> {
    let len = reader.read_len("string")?;
    let bytes = reader.read_bytes(len, "string")?;
    // Validate UTF-8 on the borrowed slice, then allocate once.
    std::str::from_utf8(bytes)
        .map(|s| Value::String(s.to_string()))
        .map_err(|_| DecodeError::InvalidUtf8 { field: "string" })
}

fn decode_binary<'a>(reader: &mut Reader<'a>) -> Result<Value<'a>, DecodeError> {
    let len = reader.read_len("binary")?;
    let bytes = reader.read_bytes(len, "binary")?;
    Ok(Value::Binary(Cow::Borrowed(bytes)))
}

pub(crate) fn decode_object_payload<'a>(
    reader: &mut Reader<'a>,
    depth: usize,
) -> Result<Object<'a>, DecodeError> {
    if depth >= MAX_DEPTH {
        return Err(DecodeError::NestingTooDeep { max: MAX_DEPTH });
    }
    let total = reader.read_len("object size")?;
    if total < 8 {
        return Err(DecodeError::MalformedEncoding {
            context: "object size smaller than its own length prefix",
        });
    }
    // The prefix counts itself; entries occupy the remaining total - 8
    // bytes. Bounding them in a sub-reader means no nested length can
    // reach past this object's extent.
    let mut body = reader.sub_reader(total - 8, "object body")?;
    let mut object = Object::new();
    while !body.is_empty() {
        let tag = body.read_byte("entry tag")?;
        let kind = ValueKind::from_u8(tag).ok_or(DecodeError::InvalidTypeTag { tag })?;
        let key = body.read_key()?;
        let value = decode_value_at(&mut body, kind, depth + 1)?;
        // Duplicate keys: last entry wins.
        object.insert(key.to_string(), value);
    }
    Ok(object)
}

pub(crate) fn decode_array_payload<'a>(
    reader: &mut Reader<'a>,
    depth: usize,
) -> Result<Array<'a>, DecodeError> {
    if depth >= MAX_DEPTH {
        return Err(DecodeError::NestingTooDeep { max: MAX_DEPTH });
    }
    let total = reader.read_len("array size")?;
    if total < 17 {
        return Err(DecodeError::MalformedEncoding {
            context: "array size smaller than its own header",
        });
    }
    let mut body = reader.sub_reader(total - 8, "array body")?;
    let tag = body.read_byte("element tag")?;
    let elem_kind = ValueKind::from_u8(tag).ok_or(DecodeError::InvalidTypeTag { tag })?;
    let count = body.read_len("array count")?;
    if count > MAX_ARRAY_LEN {
        return Err(DecodeError::LengthExceedsLimit {
            field: "array count",
            len: count,
            max: MAX_ARRAY_LEN,
        });
    }
    // Null elements occupy no payload bytes, so the declared count alone
    // cannot size the allocation.
    let mut elements = Array::with_capacity(count.min(body.remaining_len()));
    for _ in 0..count {
        elements.push(decode_value_at(&mut body, elem_kind, depth + 1)?);
    }
    if !body.is_empty() {
        return Err(DecodeError::SizeMismatch {
            context: "array",
            declared: total as u64,
            consumed: (total - body.remaining_len()) as u64,
        });
    }
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::document::{decode_document, encode_document};

    fn encode_payload(value: &Value<'_>) -> Vec<u8> {
        let size = value_size(value).unwrap() as usize;
        let mut buf = vec![0u8; size];
        let mut writer = Writer::new(&mut buf);
        encode_value(&mut writer, value).unwrap();
        assert_eq!(writer.position(), size);
        buf
    }

    fn roundtrip(value: &Value<'_>) -> Value<'static> {
        let buf = encode_payload(value);
        let mut reader = Reader::new(&buf);
        let decoded = decode_value(&mut reader, value.kind()).unwrap();
        assert!(reader.is_empty());
        decoded.into_owned()
    }

    #[test]
    fn test_scalar_roundtrips() {
        for v in [0i64, 1, -1, 144, i64::MIN, i64::MAX] {
            assert_eq!(roundtrip(&Value::from(v)), Value::Int64(v));
        }
        for v in [0.0f64, -2.5, 3.4, f64::INFINITY] {
            assert_eq!(roundtrip(&Value::from(v)), Value::Float64(v));
        }
        assert_eq!(roundtrip(&Value::from(true)), Value::Bool(true));
        assert_eq!(roundtrip(&Value::from(false)), Value::Bool(false));
        assert_eq!(roundtrip(&Value::Null), Value::Null);
    }

    #[test]
    fn test_null_payload_is_empty() {
        assert!(encode_payload(&Value::Null).is_empty());
    }

    #[test]
    fn test_string_roundtrip() {
        for s in ["", "hello", "unicode: \u{1F600}"] {
            assert_eq!(roundtrip(&Value::from(s)), Value::String(s.to_string()));
        }
    }

    #[test]
    fn test_string_invalid_utf8() {
        let mut buf = vec![0u8; 10];
        let mut writer = Writer::new(&mut buf);
        writer.write_i64(2).unwrap();
        writer.write_bytes(&[0xff, 0xfe]).unwrap();

        let mut reader = Reader::new(&buf);
        assert_eq!(
            decode_value(&mut reader, ValueKind::String),
            Err(DecodeError::InvalidUtf8 { field: "string" })
        );
    }

    #[test]
    fn test_binary_decodes_borrowed() {
        let payload: Vec<u8> = (0..12).collect();
        let buf = encode_payload(&Value::binary(&payload));

        let mut reader = Reader::new(&buf);
        let decoded = decode_value(&mut reader, ValueKind::Binary).unwrap();
        match &decoded {
            Value::Binary(Cow::Borrowed(slice)) => {
                assert_eq!(*slice, &payload[..]);
                // Zero-copy: the view points into the encoded buffer.
                assert_eq!(slice.as_ptr(), buf[8..].as_ptr());
            }
            other => panic!("expected borrowed binary, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_bool_byte() {
        let mut reader = Reader::new(&[0x02]);
        assert_eq!(
            decode_value(&mut reader, ValueKind::Bool),
            Err(DecodeError::InvalidBool { value: 0x02 })
        );
    }

    #[test]
    fn test_nested_object_with_multiple_entries() {
        let mut inner = Object::new();
        inner.insert("a".to_string(), Value::from(1i64));
        inner.insert("b".to_string(), Value::from(2i64));
        inner.insert("c".to_string(), Value::from("three"));

        let mut outer = Object::new();
        outer.insert("inner".to_string(), Value::from(inner));

        let decoded = roundtrip(&Value::from(outer.clone()));
        assert_eq!(decoded, Value::Object(crate::model::object_into_owned(outer)));
        assert_eq!(decoded.get("inner").get("b").as_i64(), Some(2));
        assert_eq!(decoded.get("inner").get("c").as_str(), Some("three"));
    }

    #[test]
    fn test_array_as_object_value() {
        let mut o = Object::new();
        o.insert(
            "values".to_string(),
            Value::array(vec![Value::from(1i64), Value::from(2i64), Value::from(3i64)]).unwrap(),
        );

        let bytes = encode_document(&o).unwrap();
        let decoded = decode_document(&bytes).unwrap();
        let arr = decoded["values"].as_array().unwrap();
        assert_eq!(arr.len(), 3);
        assert_eq!(decoded["values"].at(2).as_i64(), Some(3));
    }

    #[test]
    fn test_array_header_carries_element_tag() {
        let arr = Value::array(vec![Value::from(1.5f64)]).unwrap();
        let buf = encode_payload(&arr);
        // prefix(8) + tag(1) + count(8) + one f64(8)
        assert_eq!(buf.len(), 25);
        assert_eq!(buf[8], ValueKind::Float64 as u8);
        assert_eq!(i64::from_ne_bytes(buf[9..17].try_into().unwrap()), 1);
    }

    #[test]
    fn test_empty_array_roundtrip() {
        let arr = Value::array(vec![]).unwrap();
        let buf = encode_payload(&arr);
        assert_eq!(buf.len(), 17);
        assert_eq!(buf[8], ValueKind::Null as u8);

        assert_eq!(roundtrip(&arr), Value::Array(vec![]));
    }

    #[test]
    fn test_array_of_nulls_roundtrip() {
        let arr = Value::array(vec![Value::Null; 5]).unwrap();
        let buf = encode_payload(&arr);
        // Five Null elements occupy zero payload bytes.
        assert_eq!(buf.len(), 17);
        assert_eq!(roundtrip(&arr), Value::Array(vec![Value::Null; 5]));
    }

    #[test]
    fn test_nested_arrays_roundtrip() {
        let inner_a = Value::array(vec![Value::from(1i64), Value::from(2i64)]).unwrap();
        let inner_b = Value::array(vec![Value::from(3i64)]).unwrap();
        let outer = Value::array(vec![inner_a, inner_b]).unwrap();

        let decoded = roundtrip(&outer);
        assert_eq!(decoded.at(0).at(1).as_i64(), Some(2));
        assert_eq!(decoded.at(1).at(0).as_i64(), Some(3));
    }

    #[test]
    fn test_array_of_objects_roundtrip() {
        let mut a = Object::new();
        a.insert("n".to_string(), Value::from(1i64));
        let mut b = Object::new();
        b.insert("n".to_string(), Value::from(2i64));

        let arr = Value::array(vec![Value::from(a), Value::from(b)]).unwrap();
        let decoded = roundtrip(&arr);
        assert_eq!(decoded.at(0).get("n").as_i64(), Some(1));
        assert_eq!(decoded.at(1).get("n").as_i64(), Some(2));
    }

    #[test]
    fn test_mixed_array_never_encodes() {
        let mixed = Value::Array(vec![Value::from(1i64), Value::from("a")]);
        assert!(matches!(
            value_size(&mixed),
            Err(EncodeError::MixedArrayElement { index: 1, .. })
        ));

        let mut buf = vec![0u8; 64];
        let mut writer = Writer::new(&mut buf);
        assert!(matches!(
            encode_value(&mut writer, &mixed),
            Err(EncodeError::MixedArrayElement { .. })
        ));
    }

    #[test]
    fn test_unknown_type_tag() {
        // Object with a single entry whose tag byte is 0x09.
        let mut buf = vec![0u8; 32];
        let total: i64 = 8 + 1 + 2 + 8;
        let mut writer = Writer::new(&mut buf);
        writer.write_i64(total).unwrap();
        writer.write_byte(0x09).unwrap();
        writer.write_key("k").unwrap();
        writer.write_i64(0).unwrap();
        let len = writer.position();

        let mut reader = Reader::new(&buf[..len]);
        assert_eq!(
            decode_object_payload(&mut reader, 0),
            Err(DecodeError::InvalidTypeTag { tag: 0x09 })
        );
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        // Two entries under the same key; the last one wins.
        let mut buf = vec![0u8; 64];
        let total: i64 = 8 + 2 * (1 + 2 + 8);
        let mut writer = Writer::new(&mut buf);
        writer.write_i64(total).unwrap();
        for v in [1i64, 2] {
            writer.write_byte(ValueKind::Int64 as u8).unwrap();
            writer.write_key("a").unwrap();
            writer.write_i64(v).unwrap();
        }
        let len = writer.position();

        let mut reader = Reader::new(&buf[..len]);
        let object = decode_object_payload(&mut reader, 0).unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["a"].as_i64(), Some(2));
    }

    #[test]
    fn test_object_size_too_small_rejected() {
        for declared in [0i64, 7] {
            let mut buf = vec![0u8; 8];
            Writer::new(&mut buf).write_i64(declared).unwrap();
            let mut reader = Reader::new(&buf);
            assert!(matches!(
                decode_object_payload(&mut reader, 0),
                Err(DecodeError::MalformedEncoding { .. })
            ));
        }
    }

    #[test]
    fn test_object_negative_size_rejected() {
        let mut buf = vec![0u8; 8];
        Writer::new(&mut buf).write_i64(-1).unwrap();
        let mut reader = Reader::new(&buf);
        assert_eq!(
            decode_object_payload(&mut reader, 0),
            Err(DecodeError::NegativeLength {
                field: "object size",
                len: -1
            })
        );
    }

    #[test]
    fn test_object_size_beyond_buffer_rejected() {
        // Declares 1 MiB of entries but supplies none.
        let mut buf = vec![0u8; 8];
        Writer::new(&mut buf).write_i64(1 << 20).unwrap();
        let mut reader = Reader::new(&buf);
        assert_eq!(
            decode_object_payload(&mut reader, 0),
            Err(DecodeError::UnexpectedEof {
                context: "object body"
            })
        );
    }

    #[test]
    fn test_array_trailing_bytes_rejected() {
        // count = 0 but one stray byte inside the declared extent.
        let mut buf = vec![0u8; 32];
        let total: i64 = 17 + 1;
        let mut writer = Writer::new(&mut buf);
        writer.write_i64(total).unwrap();
        writer.write_byte(ValueKind::Null as u8).unwrap();
        writer.write_i64(0).unwrap();
        writer.write_byte(0xAA).unwrap();
        let len = writer.position();

        let mut reader = Reader::new(&buf[..len]);
        assert_eq!(
            decode_array_payload(&mut reader, 0),
            Err(DecodeError::SizeMismatch {
                context: "array",
                declared: 18,
                consumed: 17,
            })
        );
    }

    #[test]
    fn test_array_count_limit() {
        let mut buf = vec![0u8; 32];
        let mut writer = Writer::new(&mut buf);
        writer.write_i64(17).unwrap();
        writer.write_byte(ValueKind::Null as u8).unwrap();
        writer.write_i64((MAX_ARRAY_LEN as i64) + 1).unwrap();
        let len = writer.position();

        let mut reader = Reader::new(&buf[..len]);
        assert_eq!(
            decode_array_payload(&mut reader, 0),
            Err(DecodeError::LengthExceedsLimit {
                field: "array count",
                len: MAX_ARRAY_LEN + 1,
                max: MAX_ARRAY_LEN,
            })
        );
    }

    #[test]
    fn test_nesting_depth_limit() {
        let mut value = Value::from(1i64);
        for _ in 0..=MAX_DEPTH {
            let mut o = Object::new();
            o.insert("d".to_string(), value);
            value = Value::from(o);
        }
        let Value::Object(document) = value else {
            unreachable!()
        };

        let bytes = encode_document(&document).unwrap();
        assert_eq!(
            decode_document(&bytes),
            Err(DecodeError::NestingTooDeep { max: MAX_DEPTH })
        );
    }
}
