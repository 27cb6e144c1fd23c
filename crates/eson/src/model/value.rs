//! The ESON value model.
//!
//! A document is a tree of [`Value`]s: scalars, strings, opaque binary
//! payloads, homogeneous arrays, and key-sorted objects. Values own their
//! children; binary payloads may instead borrow caller-supplied memory
//! (see [`Value::binary`]).

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::codec::value_size;
use crate::error::EncodeError;

/// Wire type tags, one byte each on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueKind {
    Null = 0,
    Float64 = 1,
    Int64 = 2,
    Bool = 3,
    String = 4,
    Array = 5,
    Binary = 6,
    Object = 7,
}

impl ValueKind {
    /// Creates a ValueKind from its wire representation.
    pub fn from_u8(v: u8) -> Option<ValueKind> {
        match v {
            0 => Some(ValueKind::Null),
            1 => Some(ValueKind::Float64),
            2 => Some(ValueKind::Int64),
            3 => Some(ValueKind::Bool),
            4 => Some(ValueKind::String),
            5 => Some(ValueKind::Array),
            6 => Some(ValueKind::Binary),
            7 => Some(ValueKind::Object),
            _ => None,
        }
    }
}

/// Ordered sequence of values. All elements must share one [`ValueKind`];
/// the size calculator and encoder reject sequences that don't.
pub type Array<'a> = Vec<Value<'a>>;

/// Mapping from string keys to values. `BTreeMap` iterates in key order,
/// which is also the wire order for object entries.
pub type Object<'a> = BTreeMap<String, Value<'a>>;

static NULL_VALUE: Value<'static> = Value::Null;

/// A single ESON datum.
///
/// Binary payloads are [`Cow`]s: values decoded from a buffer borrow it
/// (zero-copy), and values built by the caller either borrow caller memory
/// or own their bytes. An owned payload is released exactly once when the
/// value drops; a borrowed payload is never released by the value, and the
/// caller must keep it alive for the value's lifetime. `Value<'static>` is
/// a fully self-contained tree; [`Value::into_owned`] converts.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(f64),
    String(String),
    Binary(Cow<'a, [u8]>),
    Array(Array<'a>),
    Object(Object<'a>),
}

impl Default for Value<'_> {
    fn default() -> Self {
        Value::Null
    }
}

impl<'a> Value<'a> {
    /// Returns the wire type tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int64(_) => ValueKind::Int64,
            Value::Float64(_) => ValueKind::Float64,
            Value::String(_) => ValueKind::String,
            Value::Binary(_) => ValueKind::Binary,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_i64(&self) -> bool {
        matches!(self, Value::Int64(_))
    }

    pub fn is_f64(&self) -> bool {
        matches!(self, Value::Float64(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Value::Binary(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns the boolean payload, or `None` if this is not a Bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array<'a>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array<'a>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object<'a>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object<'a>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Looks up a key in an Object.
    ///
    /// Returns a shared Null sentinel when the key is absent or when this
    /// value is not an Object, so lookups chain without intermediate
    /// checks: `doc.get("sub").get("muda").as_f64()`.
    pub fn get(&self, key: &str) -> &Value<'a> {
        self.as_object()
            .and_then(|o| o.get(key))
            .unwrap_or(&NULL_VALUE)
    }

    /// Looks up an index in an Array.
    ///
    /// Returns the Null sentinel when the index is out of range or when
    /// this value is not an Array.
    pub fn at(&self, index: usize) -> &Value<'a> {
        self.as_array()
            .and_then(|a| a.get(index))
            .unwrap_or(&NULL_VALUE)
    }

    /// Returns true if this is an Object containing `key`.
    pub fn has(&self, key: &str) -> bool {
        self.as_object().is_some_and(|o| o.contains_key(key))
    }

    /// Iterates over an Object's keys, in wire (sorted) order. Empty for
    /// any other variant.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.as_object()
            .into_iter()
            .flatten()
            .map(|(k, _)| k.as_str())
    }

    /// Returns the element count of an Array, 0 for any other variant.
    pub fn array_len(&self) -> usize {
        self.as_array().map_or(0, Vec::len)
    }

    /// Creates a Binary value borrowing `bytes`. The caller keeps
    /// ownership and must outlive the value; the value never frees the
    /// payload.
    pub fn binary(bytes: &'a [u8]) -> Value<'a> {
        Value::Binary(Cow::Borrowed(bytes))
    }

    /// Creates a Binary value that owns its payload.
    pub fn binary_owned(bytes: impl Into<Vec<u8>>) -> Value<'static> {
        Value::Binary(Cow::Owned(bytes.into()))
    }

    /// Creates an Array value, verifying that all elements share one type
    /// tag. An empty array is legal.
    pub fn array(elements: Vec<Value<'a>>) -> Result<Value<'a>, EncodeError> {
        check_homogeneous(&elements)?;
        Ok(Value::Array(elements))
    }

    /// Recursively verifies the invariants the encoder will enforce:
    /// currently, that every array in the tree is homogeneous. Useful for
    /// failing early when a tree is assembled through `as_array_mut` or
    /// direct variant construction.
    pub fn validate(&self) -> Result<(), EncodeError> {
        match self {
            Value::Array(elements) => {
                check_homogeneous(elements)?;
                for element in elements {
                    element.validate()?;
                }
                Ok(())
            }
            Value::Object(object) => {
                for value in object.values() {
                    value.validate()?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Exact number of bytes this value occupies on the wire, as an object
    /// entry payload or array element. For Objects and Arrays this equals
    /// the value their length prefix carries.
    ///
    /// Recomputed on every call; there is no cache to invalidate.
    pub fn encoded_size(&self) -> Result<u64, EncodeError> {
        value_size(self)
    }

    /// Deep-copies the tree into one that owns every payload, detaching it
    /// from any borrowed buffers.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Bool(b) => Value::Bool(b),
            Value::Int64(i) => Value::Int64(i),
            Value::Float64(f) => Value::Float64(f),
            Value::String(s) => Value::String(s),
            Value::Binary(b) => Value::Binary(Cow::Owned(b.into_owned())),
            Value::Array(a) => Value::Array(a.into_iter().map(Value::into_owned).collect()),
            Value::Object(o) => Value::Object(object_into_owned(o)),
        }
    }
}

/// Deep-copies a decoded object so it no longer borrows the input buffer.
pub fn object_into_owned(object: Object<'_>) -> Object<'static> {
    object
        .into_iter()
        .map(|(k, v)| (k, v.into_owned()))
        .collect()
}

/// Deep-copies a decoded array so it no longer borrows the input buffer.
pub fn array_into_owned(array: Array<'_>) -> Array<'static> {
    array.into_iter().map(Value::into_owned).collect()
}

pub(crate) fn check_homogeneous(elements: &[Value<'_>]) -> Result<(), EncodeError> {
    let Some(first) = elements.first() else {
        return Ok(());
    };
    let expected = first.kind();
    for (index, element) in elements.iter().enumerate().skip(1) {
        let found = element.kind();
        if found != expected {
            return Err(EncodeError::MixedArrayElement {
                index,
                expected,
                found,
            });
        }
    }
    Ok(())
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value<'_> {
    fn from(i: i64) -> Self {
        Value::Int64(i)
    }
}

impl From<f64> for Value<'_> {
    fn from(f: f64) -> Self {
        Value::Float64(f)
    }
}

impl From<&str> for Value<'_> {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<'a> From<Object<'a>> for Value<'a> {
    fn from(o: Object<'a>) -> Self {
        Value::Object(o)
    }
}
