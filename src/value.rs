use crate::coerce::{is_int32, is_safe_integer};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;

/// Type tags used in the dynval binary format.
///
/// The tag is written as an unsigned varint before every value and selects how the
/// payload is read back. Tags are stable and part of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    Null = 0,
    Undefined = 1,
    Boolean = 2,
    /// Signed 32-bit integer, decoded as a plain number
    Int32 = 3,
    /// 64-bit integer, decoded as a plain number
    SafeInt = 4,
    Double = 5,
    /// 64-bit integer, decoded as an arbitrary-precision integer
    BigInt = 6,
    Text = 7,
    Bytes = 8,
    /// Milliseconds since the Unix epoch
    Timestamp = 9,
    /// Element count followed by tagged values
    Sequence = 10,
    /// Entry count followed by (text key, tagged value) pairs
    Mapping = 11,
}

impl TypeTag {
    /// Every tag, in wire order.
    pub const ALL: [TypeTag; 12] = [
        TypeTag::Null,
        TypeTag::Undefined,
        TypeTag::Boolean,
        TypeTag::Int32,
        TypeTag::SafeInt,
        TypeTag::Double,
        TypeTag::BigInt,
        TypeTag::Text,
        TypeTag::Bytes,
        TypeTag::Timestamp,
        TypeTag::Sequence,
        TypeTag::Mapping,
    ];

    /// Looks up a tag read from the wire; `None` for values outside the table.
    pub fn from_wire(tag: u32) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    pub fn to_wire(self) -> u32 {
        self as u32
    }
}

/// A dynamic value the codec can carry.
///
/// `Number` is a plain double-precision number; on the wire it takes the narrowest of
/// Int32, SafeInt and Double that keeps it exact. `BigInt` always travels as BigInt and
/// comes back as a `BigInt`, however small.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Null,
    #[default]
    Undefined,
    Bool(bool),
    Number(f64),
    BigInt(BigInt),
    Text(String),
    Bytes(Bytes),
    Timestamp(DateTime<Utc>),
    Sequence(Vec<Value>),
    /// Keys keep their insertion order through encode and decode.
    Mapping(IndexMap<String, Value>),
}

impl Value {
    /// Classifies the value into the variant it is written as.
    ///
    /// # Example
    /// ```rust
    /// use dynval_encoder::{TypeTag, Value};
    ///
    /// assert_eq!(Value::from(42).type_tag(), TypeTag::Int32);
    /// assert_eq!(Value::from(2_147_483_648.0).type_tag(), TypeTag::SafeInt);
    /// assert_eq!(Value::from(3.14).type_tag(), TypeTag::Double);
    /// ```
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Null,
            Value::Undefined => TypeTag::Undefined,
            Value::Bool(_) => TypeTag::Boolean,
            Value::Number(n) if is_int32(*n) => TypeTag::Int32,
            Value::Number(n) if is_safe_integer(*n) => TypeTag::SafeInt,
            Value::Number(_) => TypeTag::Double,
            Value::Text(_) => TypeTag::Text,
            Value::BigInt(_) => TypeTag::BigInt,
            Value::Bytes(_) => TypeTag::Bytes,
            Value::Timestamp(_) => TypeTag::Timestamp,
            Value::Sequence(_) => TypeTag::Sequence,
            Value::Mapping(_) => TypeTag::Mapping,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` when this is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Value::Bytes(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(value))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Sequence(value)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(value: IndexMap<String, Value>) -> Self {
        Value::Mapping(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    /// `None` becomes `Null`.
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Sequence(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
