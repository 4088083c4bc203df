#[cfg(feature = "serde_json")]
use crate::coerce::is_safe_integer;
#[cfg(feature = "serde_json")]
use crate::Value;
#[cfg(feature = "serde_json")]
use chrono::SecondsFormat;
#[cfg(feature = "serde_json")]
use num_bigint::BigInt;
#[cfg(feature = "serde_json")]
use num_traits::ToPrimitive;
#[cfg(feature = "serde_json")]
use serde_json::{Map, Number};

// --- serde_json::Value ---
/// Converts JSON into a dynamic value.
///
/// Integers a plain number holds exactly become `Number`; wider integers become `BigInt`
/// so no digits are lost. Object key order is preserved.
#[cfg(feature = "serde_json")]
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => number_to_value(&n),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Mapping(
                obj.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(feature = "serde_json")]
fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        let as_number = i as f64;
        if is_safe_integer(as_number) {
            Value::Number(as_number)
        } else {
            Value::BigInt(BigInt::from(i))
        }
    } else if let Some(u) = n.as_u64() {
        Value::BigInt(BigInt::from(u))
    } else {
        Value::Number(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Converts a dynamic value into JSON. The conversion is lossy:
///
/// - `Undefined` and non-finite numbers become `null`
/// - `BigInt` becomes a number when it fits `i64`/`u64`, otherwise its decimal string
/// - `Bytes` becomes an array of byte values
/// - `Timestamp` becomes an RFC 3339 string with millisecond precision
#[cfg(feature = "serde_json")]
impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null | Value::Undefined => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => {
                if is_safe_integer(n) {
                    serde_json::Value::Number(Number::from(n as i64))
                } else {
                    Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
                }
            }
            Value::BigInt(n) => {
                if let Some(i) = n.to_i64() {
                    serde_json::Value::Number(Number::from(i))
                } else if let Some(u) = n.to_u64() {
                    serde_json::Value::Number(Number::from(u))
                } else {
                    serde_json::Value::String(n.to_string())
                }
            }
            Value::Text(s) => serde_json::Value::String(s),
            Value::Bytes(b) => serde_json::Value::Array(
                b.iter()
                    .map(|byte| serde_json::Value::Number(Number::from(*byte)))
                    .collect(),
            ),
            Value::Timestamp(t) => {
                serde_json::Value::String(t.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Sequence(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Mapping(entries) => {
                let mut obj = Map::with_capacity(entries.len());
                for (key, value) in entries {
                    obj.insert(key, serde_json::Value::from(value));
                }
                serde_json::Value::Object(obj)
            }
        }
    }
}
