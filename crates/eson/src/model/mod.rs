//! Data model types for ESON documents.

pub mod value;

pub use value::{array_into_owned, object_into_owned, Array, Object, Value, ValueKind};

pub(crate) use value::check_homogeneous;
