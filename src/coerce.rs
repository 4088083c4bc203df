//! Conversions between plain numbers, big integers, timestamps and the wire's [`Long`].

use crate::wire::Long;
use crate::{EncoderError, Result};
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// Largest integer a plain number holds exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
/// Smallest integer a plain number holds exactly (-(2^53 - 1)).
pub const MIN_SAFE_INTEGER: f64 = -9_007_199_254_740_991.0;

/// True when `value` is an integer in the signed 32-bit range.
///
/// Negative zero is excluded since the Int32 form would lose its sign.
pub fn is_int32(value: f64) -> bool {
    value.fract() == 0.0
        && value >= f64::from(i32::MIN)
        && value <= f64::from(i32::MAX)
        && !(value == 0.0 && value.is_sign_negative())
}

/// True when `value` is an integer a plain number represents exactly.
pub fn is_safe_integer(value: f64) -> bool {
    value.is_finite()
        && value.fract() == 0.0
        && (MIN_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&value)
}

/// Reduces a big integer to the 64-bit wire form.
///
/// Values in the safe range go through a plain number; larger magnitudes keep their
/// low 64 bits, the same result the decimal-string path of the wire produces.
pub fn bigint_to_long(value: &BigInt) -> Long {
    match value.to_f64() {
        Some(number) if is_safe_integer(number) => Long::from_number(number),
        _ => Long::from(value),
    }
}

/// Combines the low and high words into a big integer, the high word carrying the sign.
pub fn long_to_bigint(value: Long) -> BigInt {
    BigInt::from(value.low) + (BigInt::from(value.high as i32) << 32)
}

/// Reads a 64-bit wire integer as the nearest plain number.
pub fn long_to_number(value: Long) -> f64 {
    long_to_bigint(value).to_f64().unwrap_or(f64::NAN)
}

/// Interprets a 64-bit wire integer as milliseconds since the Unix epoch.
///
/// # Errors
/// Returns [`EncoderError::Decode`] when the instant is outside the representable range.
pub fn long_to_timestamp(value: Long) -> Result<DateTime<Utc>> {
    let millis = value.to_i64();
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| EncoderError::Decode(format!("Timestamp out of range: {millis} ms")))
}

/// Milliseconds since the Unix epoch; sub-millisecond precision is dropped.
pub fn timestamp_to_long(value: &DateTime<Utc>) -> Long {
    Long::from(value.timestamp_millis())
}
