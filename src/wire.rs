//! Wire primitives shared by the encoder and decoder.
//!
//! The substrate follows protobuf wire conventions:
//!
//! - unsigned integers (tags, lengths, counts) are base-128 varints
//! - `int32` is a varint; negative values are sign extended to 64 bits (10 bytes)
//! - `int64` is the varint of the two's complement 64-bit word pair
//! - doubles are 8 bytes little-endian IEEE 754
//! - booleans are a single varint byte, 0 or 1
//! - strings and byte ranges are a varint byte length followed by the raw bytes
//!
//! [`WireWriter`] is implemented for every [`BufMut`] and [`WireReader`] for every [`Buf`],
//! so `BytesMut`, `Vec<u8>`, `Bytes` and `&[u8]` all work as cursors.

use crate::{EncoderError, Result};
use bytes::{Buf, BufMut, Bytes};
use num_bigint::{BigInt, Sign};
use std::str::FromStr;

/// Longest varint the reader accepts, enough for any 64-bit value.
const MAX_VARINT_LEN: usize = 10;

const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// A 64-bit two's complement integer held as low and high 32-bit words.
///
/// This is the representation the wire uses for every integer wider than 32 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Long {
    pub low: u32,
    pub high: u32,
}

impl Long {
    pub const ZERO: Long = Long { low: 0, high: 0 };

    pub const fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    /// Converts a plain number, truncating toward zero and wrapping modulo 2^64.
    ///
    /// NaN and infinities become zero.
    pub fn from_number(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        let magnitude = (value.trunc().abs() % TWO_POW_64) as u64;
        if value.is_sign_negative() {
            Self::from(magnitude.wrapping_neg())
        } else {
            Self::from(magnitude)
        }
    }

    /// Parses a decimal integer of any magnitude, keeping its low 64 bits.
    ///
    /// # Errors
    /// Returns [`EncoderError::Decode`] if `text` is not a decimal integer.
    pub fn from_decimal(text: &str) -> Result<Self> {
        let value = BigInt::from_str(text.trim())
            .map_err(|e| EncoderError::Decode(format!("Invalid decimal integer {text:?}: {e}")))?;
        Ok(Self::from(&value))
    }

    pub fn to_u64(self) -> u64 {
        (u64::from(self.high) << 32) | u64::from(self.low)
    }

    pub fn to_i64(self) -> i64 {
        self.to_u64() as i64
    }
}

impl From<u64> for Long {
    fn from(value: u64) -> Self {
        Self {
            low: value as u32,
            high: (value >> 32) as u32,
        }
    }
}

impl From<i64> for Long {
    fn from(value: i64) -> Self {
        Self::from(value as u64)
    }
}

/// Keeps the low 64 bits of the two's complement form.
impl From<&BigInt> for Long {
    fn from(value: &BigInt) -> Self {
        let mut bytes = value.to_signed_bytes_le();
        let fill = if value.sign() == Sign::Minus { 0xff } else { 0x00 };
        bytes.resize(8, fill);
        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[..8]);
        Self::from(u64::from_le_bytes(word))
    }
}

impl From<Long> for i64 {
    fn from(value: Long) -> Self {
        value.to_i64()
    }
}

/// Write side of the wire substrate.
pub trait WireWriter: BufMut {
    /// Writes a base-128 varint.
    fn put_varint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.put_u8((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        self.put_u8(value as u8);
    }

    /// Writes a type tag, length or count.
    fn put_uint32(&mut self, value: u32) {
        self.put_varint(u64::from(value));
    }

    fn put_int32(&mut self, value: i32) {
        // sign extension makes negatives occupy the full 10 bytes
        self.put_varint(i64::from(value) as u64);
    }

    fn put_int64(&mut self, value: Long) {
        self.put_varint(value.to_u64());
    }

    fn put_double(&mut self, value: f64) {
        self.put_f64_le(value);
    }

    fn put_boolean(&mut self, value: bool) {
        self.put_u8(u8::from(value));
    }

    /// Writes the UTF-8 byte length followed by the bytes.
    ///
    /// # Errors
    /// Returns [`EncoderError::Encode`] if the string is 4 GiB or longer.
    fn put_string(&mut self, value: &str) -> Result<()> {
        self.put_byte_range(value.as_bytes())
    }

    /// Writes the byte length followed by the bytes.
    ///
    /// # Errors
    /// Returns [`EncoderError::Encode`] if the range is 4 GiB or longer; nothing is written.
    fn put_byte_range(&mut self, value: &[u8]) -> Result<()> {
        self.put_uint32(length_prefix(value.len())?);
        self.put_slice(value);
        Ok(())
    }
}

impl<B: BufMut + ?Sized> WireWriter for B {}

/// Converts a byte length or element count into its 32-bit wire prefix.
///
/// # Errors
/// Returns [`EncoderError::Encode`] when `len` does not fit in 32 bits.
#[inline]
pub fn length_prefix(len: usize) -> Result<u32> {
    u32::try_from(len)
        .map_err(|_| EncoderError::Encode(format!("Length {len} exceeds the 32-bit prefix")))
}

/// Read side of the wire substrate. Every read advances the cursor.
pub trait WireReader: Buf {
    /// Reads a base-128 varint of at most ten bytes.
    ///
    /// # Errors
    /// [`EncoderError::InsufficientData`] when the input ends mid-varint,
    /// [`EncoderError::Decode`] when the varint is longer than ten bytes.
    fn read_varint(&mut self) -> Result<u64> {
        let mut value = 0u64;
        for index in 0..MAX_VARINT_LEN {
            if !self.has_remaining() {
                return Err(EncoderError::InsufficientData);
            }
            let byte = self.get_u8();
            value |= u64::from(byte & 0x7f) << (7 * index);
            if byte < 0x80 {
                return Ok(value);
            }
        }
        Err(EncoderError::Decode(format!(
            "Varint longer than {} bytes",
            MAX_VARINT_LEN
        )))
    }

    /// Reads a type tag, length or count; wider varints keep their low 32 bits.
    fn read_uint32(&mut self) -> Result<u32> {
        Ok(self.read_varint()? as u32)
    }

    fn read_int32(&mut self) -> Result<i32> {
        Ok(self.read_varint()? as u32 as i32)
    }

    fn read_int64(&mut self) -> Result<Long> {
        Ok(Long::from(self.read_varint()?))
    }

    fn read_double(&mut self) -> Result<f64> {
        if self.remaining() < 8 {
            return Err(EncoderError::InsufficientData);
        }
        Ok(self.get_f64_le())
    }

    fn read_boolean(&mut self) -> Result<bool> {
        Ok(self.read_varint()? != 0)
    }

    /// Reads a length-prefixed UTF-8 string.
    fn read_string(&mut self) -> Result<String> {
        let raw = self.read_byte_range()?;
        std::str::from_utf8(&raw)
            .map(str::to_owned)
            .map_err(|e| EncoderError::Decode(e.to_string()))
    }

    /// Reads a length-prefixed byte range. On a `Bytes` cursor this does not copy.
    fn read_byte_range(&mut self) -> Result<Bytes> {
        let len = self.read_uint32()? as usize;
        if self.remaining() < len {
            return Err(EncoderError::InsufficientData);
        }
        Ok(self.copy_to_bytes(len))
    }
}

impl<B: Buf + ?Sized> WireReader for B {}
