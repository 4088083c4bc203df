use crate::coerce::{
    bigint_to_long, long_to_bigint, long_to_number, long_to_timestamp, timestamp_to_long,
};
use crate::wire::{length_prefix, Long, WireReader, WireWriter};
use crate::*;
use bytes::Buf;
use indexmap::IndexMap;
use log::{debug, warn};

// --- Encoding ---

/// Encodes `value` with its leading type tag at nesting level `depth`, using the default [`Config`].
///
/// Top-level callers pass `0`. Elements of a sequence and values of a mapping are encoded
/// one level deeper than their container.
///
/// # Errors
/// Returns [`EncoderError::DepthExceeded`] once `depth` passes the limit. Whatever was
/// appended to `writer` before the failure is not a valid encoding.
pub fn encode_value(value: &Value, writer: &mut BytesMut, depth: usize) -> Result<()> {
    encode_value_with(value, writer, depth, &Config::default())
}

/// Encodes `value` with its leading type tag, honoring `config`.
pub fn encode_value_with(
    value: &Value,
    writer: &mut BytesMut,
    depth: usize,
    config: &Config,
) -> Result<()> {
    let max = config.encode_depth_limit();
    if depth > max {
        debug!(
            "refusing to encode {:?} at depth {} (limit {})",
            value.type_tag(),
            depth,
            max
        );
        return Err(EncoderError::DepthExceeded { max });
    }

    let tag = value.type_tag();
    writer.put_uint32(tag.to_wire());
    match value {
        Value::Null | Value::Undefined => {}
        Value::Bool(b) => writer.put_boolean(*b),
        Value::Number(n) => match tag {
            TypeTag::Int32 => writer.put_int32(*n as i32),
            TypeTag::SafeInt => writer.put_int64(Long::from_number(*n)),
            _ => writer.put_double(*n),
        },
        Value::BigInt(n) => writer.put_int64(bigint_to_long(n)),
        Value::Text(s) => writer.put_string(s)?,
        Value::Bytes(b) => writer.put_byte_range(b)?,
        Value::Timestamp(t) => writer.put_int64(timestamp_to_long(t)),
        Value::Sequence(items) => encode_array_with(items, writer, depth, config)?,
        Value::Mapping(entries) => encode_map_with(entries, writer, depth, config)?,
    }
    Ok(())
}

/// Encodes a bare sequence: the element count, then each element with its tag.
///
/// No tag is written for the sequence itself; read it back with [`decode_array`].
pub fn encode_array(items: &[Value], writer: &mut BytesMut, depth: usize) -> Result<()> {
    encode_array_with(items, writer, depth, &Config::default())
}

/// Encodes a bare sequence, honoring `config`.
pub fn encode_array_with(
    items: &[Value],
    writer: &mut BytesMut,
    depth: usize,
    config: &Config,
) -> Result<()> {
    writer.put_uint32(length_prefix(items.len())?);
    for item in items {
        encode_value_with(item, writer, depth + 1, config)?;
    }
    Ok(())
}

/// Encodes a bare mapping: the entry count, then each key followed by its tagged value.
///
/// Entries are written in iteration order. No tag is written for the mapping itself;
/// read it back with [`decode_map`].
pub fn encode_map(
    entries: &IndexMap<String, Value>,
    writer: &mut BytesMut,
    depth: usize,
) -> Result<()> {
    encode_map_with(entries, writer, depth, &Config::default())
}

/// Encodes a bare mapping, honoring `config`.
pub fn encode_map_with(
    entries: &IndexMap<String, Value>,
    writer: &mut BytesMut,
    depth: usize,
    config: &Config,
) -> Result<()> {
    writer.put_uint32(length_prefix(entries.len())?);
    for (key, value) in entries {
        writer.put_string(key)?;
        encode_value_with(value, writer, depth + 1, config)?;
    }
    Ok(())
}

// --- Decoding ---

/// Upper bound on the elements reserved up front for a decoded sequence or mapping.
///
/// Counts come from the input, and every nesting level reserves before its children
/// consume any bytes, so the reservation is bounded independently of the input length.
const MAX_PREALLOC: usize = 1024;

/// Decodes one tagged value from `reader`, using the default [`Config`].
///
/// `reader` can be a fresh cursor (`&[u8]`, `Bytes`) or one already partway through a
/// larger buffer; it is left just past the decoded value.
///
/// # Errors
/// [`EncoderError::InsufficientData`] on truncated input, [`EncoderError::Decode`] on
/// malformed primitives and [`EncoderError::DecodeDepthExceeded`] on excessive nesting.
/// An unknown tag yields [`Value::Undefined`] without error.
pub fn decode_value<B: Buf + ?Sized>(reader: &mut B) -> Result<Value> {
    decode_value_with(reader, &Config::default())
}

/// Decodes one tagged value from `reader`, honoring `config`.
pub fn decode_value_with<B: Buf + ?Sized>(reader: &mut B, config: &Config) -> Result<Value> {
    read_value(reader, 0, config)
}

/// Decodes a bare sequence written by [`encode_array`].
pub fn decode_array<B: Buf + ?Sized>(reader: &mut B) -> Result<Vec<Value>> {
    read_array(reader, 0, &Config::default())
}

/// Decodes a bare mapping written by [`encode_map`], keeping the order entries were read in.
///
/// A repeated key keeps the position of its first occurrence and the value of its last.
pub fn decode_map<B: Buf + ?Sized>(reader: &mut B) -> Result<IndexMap<String, Value>> {
    read_map(reader, 0, &Config::default())
}

fn read_value<B: Buf + ?Sized>(reader: &mut B, depth: usize, config: &Config) -> Result<Value> {
    if let Some(max) = config.decode_depth_limit() {
        if depth > max {
            debug!("refusing to decode at depth {} (limit {})", depth, max);
            return Err(EncoderError::DecodeDepthExceeded { max });
        }
    }

    let raw = reader.read_uint32()?;
    let Some(tag) = TypeTag::from_wire(raw) else {
        return unknown_tag(raw, config);
    };
    let value = match tag {
        TypeTag::Null => Value::Null,
        TypeTag::Undefined => Value::Undefined,
        TypeTag::Boolean => Value::Bool(reader.read_boolean()?),
        TypeTag::Int32 => Value::Number(f64::from(reader.read_int32()?)),
        TypeTag::SafeInt => Value::Number(long_to_number(reader.read_int64()?)),
        TypeTag::Double => Value::Number(reader.read_double()?),
        TypeTag::BigInt => Value::BigInt(long_to_bigint(reader.read_int64()?)),
        TypeTag::Text => Value::Text(reader.read_string()?),
        TypeTag::Bytes => Value::Bytes(reader.read_byte_range()?),
        TypeTag::Timestamp => Value::Timestamp(long_to_timestamp(reader.read_int64()?)?),
        TypeTag::Sequence => Value::Sequence(read_array(reader, depth, config)?),
        TypeTag::Mapping => Value::Mapping(read_map(reader, depth, config)?),
    };
    Ok(value)
}

fn read_array<B: Buf + ?Sized>(reader: &mut B, depth: usize, config: &Config) -> Result<Vec<Value>> {
    let count = reader.read_uint32()? as usize;
    // every element takes at least one byte
    let mut items = Vec::with_capacity(count.min(reader.remaining()).min(MAX_PREALLOC));
    for _ in 0..count {
        items.push(read_value(reader, depth + 1, config)?);
    }
    Ok(items)
}

fn read_map<B: Buf + ?Sized>(
    reader: &mut B,
    depth: usize,
    config: &Config,
) -> Result<IndexMap<String, Value>> {
    let count = reader.read_uint32()? as usize;
    // every entry takes at least two bytes
    let mut entries =
        IndexMap::with_capacity(count.min(reader.remaining() / 2).min(MAX_PREALLOC));
    for _ in 0..count {
        let key = reader.read_string()?;
        let value = read_value(reader, depth + 1, config)?;
        entries.insert(key, value);
    }
    Ok(entries)
}

fn unknown_tag(tag: u32, config: &Config) -> Result<Value> {
    match config.unknown_tag_policy() {
        UnknownTagPolicy::Lenient => {
            warn!("unknown type tag {} decoded as undefined", tag);
            Ok(Value::Undefined)
        }
        UnknownTagPolicy::Reject => Err(EncoderError::UnknownTag(tag)),
    }
}

// --- Trait implementations ---

/// Encodes a `Value` with its leading type tag.
impl Encoder for Value {
    fn encode(&self, writer: &mut BytesMut) -> Result<()> {
        encode_value(self, writer, 0)
    }
}
/// Decodes a `Value` from its leading type tag.
impl Decoder for Value {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        decode_value(reader)
    }
}

/// Encodes a bare sequence without a leading tag.
impl Encoder for [Value] {
    fn encode(&self, writer: &mut BytesMut) -> Result<()> {
        encode_array(self, writer, 0)
    }
}
impl Encoder for Vec<Value> {
    fn encode(&self, writer: &mut BytesMut) -> Result<()> {
        encode_array(self, writer, 0)
    }
}
impl Decoder for Vec<Value> {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        decode_array(reader)
    }
}

/// Encodes a bare mapping without a leading tag.
impl Encoder for IndexMap<String, Value> {
    fn encode(&self, writer: &mut BytesMut) -> Result<()> {
        encode_map(self, writer, 0)
    }
}
impl Decoder for IndexMap<String, Value> {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        decode_map(reader)
    }
}
