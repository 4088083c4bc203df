//! # dynval-encoder
//!
//! A compact, self-describing binary codec for dynamic values.
//!
//! - Encodes null, undefined, booleans, numbers, arbitrary-precision integers, text, bytes,
//!   timestamps, sequences and insertion-ordered mappings without a schema
//! - Every value starts with a type tag, so two ends of a boundary only have to agree on the format
//! - Plain numbers are written with the narrowest exact variant (Int32, SafeInt or Double)
//! - Big integers keep their own tag and come back as big integers, even when small
//! - Encoding refuses to nest deeper than a configurable bound (100 by default)
//!
//! ## Feature Flags
//!
//! - `serde_json` — Enables conversions between [`Value`] and `serde_json::Value`.
//!
//! ## Example
//!
//! ```rust
//! use dynval_encoder::{deserialize, serialize, Value};
//! use indexmap::IndexMap;
//!
//! let mut map = IndexMap::new();
//! map.insert("id".to_string(), Value::from(42));
//! map.insert("name".to_string(), Value::from("hello"));
//! let value = Value::Mapping(map);
//!
//! let bytes = serialize(&value).unwrap();
//! let decoded = deserialize(&bytes).unwrap();
//! assert_eq!(value, decoded);
//! ```

pub mod coerce;
pub mod config;
pub mod core;
mod features;
pub mod value;
pub mod wire;

use bytes::{Bytes, BytesMut};
use log::trace;

pub use crate::config::{Config, UnknownTagPolicy};
pub use crate::core::{
    decode_array, decode_map, decode_value, decode_value_with, encode_array, encode_array_with,
    encode_map, encode_map_with, encode_value, encode_value_with,
};
pub use crate::value::{TypeTag, Value};

/// Errors that can occur during encoding or decoding operations.
#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    /// The value nests deeper than the configured encode limit.
    ///
    /// The writer holds a partial encoding afterwards and must be discarded.
    #[error("Serialize too deep: nesting exceeds {max} levels")]
    DepthExceeded { max: usize },
    /// The input nests deeper than the configured decode limit.
    #[error("Deserialize too deep: nesting exceeds {max} levels")]
    DecodeDepthExceeded { max: usize },
    /// A type tag outside the known range, reported only with [`UnknownTagPolicy::Reject`].
    #[error("Unknown type tag: {0}")]
    UnknownTag(u32),
    /// The value could not be encoded (a length or count too large for its 32-bit prefix).
    #[error("Encode error: {0}")]
    Encode(String),
    /// The value could not be decoded (malformed varint, invalid UTF-8, out of range timestamp).
    #[error("Decode error: {0}")]
    Decode(String),
    /// The buffer did not contain enough data to complete the operation.
    #[error("Insufficient data in buffer")]
    InsufficientData,
}

/// The result type used throughout this crate for encode/decode operations.
pub type Result<T> = std::result::Result<T, EncoderError>;

/// Trait for shapes that can be written in the dynval binary format.
///
/// [`Value`] writes a leading type tag. Bare sequences (`[Value]`, `Vec<Value>`) and bare
/// mappings (`IndexMap<String, Value>`) write only their count-prefixed body, for callers
/// that already know the shape on both ends.
pub trait Encoder {
    /// Encode the value into the given buffer, starting at depth 0.
    ///
    /// # Errors
    /// Returns [`EncoderError::DepthExceeded`] if the value nests too deeply.
    fn encode(&self, writer: &mut BytesMut) -> Result<()>;
}

/// Trait for shapes that can be read back from the dynval binary format.
///
/// Mirrors [`Encoder`]: `Value` expects a leading type tag, bare sequences and mappings do not.
pub trait Decoder: Sized {
    /// Decode the value from the given buffer, advancing it past the consumed bytes.
    fn decode(reader: &mut Bytes) -> Result<Self>;
}

/// Convenience function to encode a value to bytes with a fresh writer.
///
/// # Example
/// ```rust
/// use dynval_encoder::{decode, encode, Value};
///
/// let items = vec![Value::from(1), Value::from("two")];
/// let mut buf = encode(&items).unwrap();
/// let decoded: Vec<Value> = decode(&mut buf).unwrap();
/// assert_eq!(items, decoded);
/// ```
pub fn encode<T: Encoder + ?Sized>(value: &T) -> Result<Bytes> {
    let mut writer = BytesMut::new();
    value.encode(&mut writer)?;
    Ok(writer.freeze())
}

/// Convenience function to decode a value from bytes.
///
/// This is equivalent to calling `T::decode(reader)`.
pub fn decode<T: Decoder>(reader: &mut Bytes) -> Result<T> {
    T::decode(reader)
}

/// Serializes a value into a self-describing byte sequence using the default [`Config`].
///
/// # Errors
/// Returns [`EncoderError::DepthExceeded`] when the value nests more than 100 levels.
pub fn serialize(value: &Value) -> Result<Bytes> {
    serialize_with(value, &Config::default())
}

/// Serializes a value with an explicit [`Config`].
pub fn serialize_with(value: &Value, config: &Config) -> Result<Bytes> {
    let mut writer = BytesMut::new();
    encode_value_with(value, &mut writer, 0, config)?;
    trace!(
        "serialized {:?} value into {} bytes",
        value.type_tag(),
        writer.len()
    );
    Ok(writer.freeze())
}

/// Deserializes one value from the start of `data` using the default [`Config`].
///
/// Bytes following the first complete value are ignored.
pub fn deserialize(data: &[u8]) -> Result<Value> {
    deserialize_with(data, &Config::default())
}

/// Deserializes one value from the start of `data` with an explicit [`Config`].
pub fn deserialize_with(data: &[u8], config: &Config) -> Result<Value> {
    let mut reader = data;
    let value = decode_value_with(&mut reader, config)?;
    trace!(
        "deserialized {:?} value from {} bytes",
        value.type_tag(),
        data.len() - reader.len()
    );
    Ok(value)
}
