//! Tagged binary form of a [`Value`], optionally zlib-compressed.
//!
//! Every value is a one-byte tag followed by its payload. Fixed-width fields
//! are big-endian and lengths and counts are `u32`:
//!
//! | tag | payload |
//! |-----|---------|
//! | 0 object | count, then per entry: key length, UTF-8 key, tagged value |
//! | 1 array | count, then tagged values |
//! | 2..=5 integer | `i8`, `i16`, `i32` or `i64` |
//! | 6, 7 float | `f32` or `f64` (read only; never written) |
//! | 8 decimal | `i32` scale, length, two's-complement unscaled bytes |
//! | 9 string | length, UTF-8 bytes |
//! | 10 bool | `0` or `1` |
//! | 11, 12, 13 | `NaN`, `Infinity`, `-Infinity` |
//! | 14 null | none |
//!
//! Integers written with scale zero use the narrowest integer tag; every other
//! finite number is a decimal, so the literal's scale survives a round trip.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;
use num_bigint::{BigInt, Sign};

use crate::constants::DEFAULT_MAX_DEPTH;
use crate::num::decimal::Decimal;
use crate::num::number::Number;
use crate::value::{Map, Value};
use crate::{Error, Result};

pub const TAG_OBJECT: u8 = 0;
pub const TAG_ARRAY: u8 = 1;
pub const TAG_I8: u8 = 2;
pub const TAG_I16: u8 = 3;
pub const TAG_I32: u8 = 4;
pub const TAG_I64: u8 = 5;
pub const TAG_F32: u8 = 6;
pub const TAG_F64: u8 = 7;
pub const TAG_DECIMAL: u8 = 8;
pub const TAG_STRING: u8 = 9;
pub const TAG_BOOL: u8 = 10;
pub const TAG_NAN: u8 = 11;
pub const TAG_POSITIVE_INFINITY: u8 = 12;
pub const TAG_NEGATIVE_INFINITY: u8 = 13;
pub const TAG_NULL: u8 = 14;

pub fn to_bytes(value: &Value) -> Result<Vec<u8>> {
    let mut encoder = BinaryEncoder { buffer: Vec::new() };
    encoder.write_value(value)?;
    Ok(encoder.buffer)
}

/// [`to_bytes`] wrapped in a zlib stream.
pub fn to_compressed_bytes(value: &Value) -> Result<Vec<u8>> {
    let raw = to_bytes(value)?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw)?;
    let compressed = encoder.finish()?;
    debug!("compressed {} bytes to {}", raw.len(), compressed.len());
    Ok(compressed)
}

/// Decodes exactly one tagged value; trailing bytes are an error.
pub fn from_bytes(bytes: &[u8]) -> Result<Value> {
    let mut reader = BinaryReader {
        input: bytes,
        pos: 0,
        depth: 0,
    };
    let value = reader.read_value()?;
    if reader.pos != bytes.len() {
        return Err(reader.error("trailing bytes after value"));
    }
    Ok(value)
}

pub fn from_compressed_bytes(bytes: &[u8]) -> Result<Value> {
    let mut raw = Vec::new();
    ZlibDecoder::new(bytes)
        .read_to_end(&mut raw)
        .map_err(|err| Error::Binary {
            offset: 0,
            reason: format!("invalid zlib stream: {err}"),
        })?;
    from_bytes(&raw)
}

struct BinaryEncoder {
    buffer: Vec<u8>,
}

impl BinaryEncoder {
    fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.buffer.push(TAG_NULL),
            Value::Bool(b) => {
                self.buffer.push(TAG_BOOL);
                self.buffer.push(u8::from(*b));
            }
            Value::Number(number) => self.write_number(number)?,
            Value::String(s) => {
                self.buffer.push(TAG_STRING);
                self.write_str(s)?;
            }
            Value::Array(items) => {
                self.buffer.push(TAG_ARRAY);
                self.write_len(items.len())?;
                for item in items {
                    self.write_value(item)?;
                }
            }
            Value::Object(map) => {
                self.buffer.push(TAG_OBJECT);
                self.write_len(map.len())?;
                for (key, value) in map {
                    self.write_str(key)?;
                    self.write_value(value)?;
                }
            }
        }
        Ok(())
    }

    fn write_number(&mut self, number: &Number) -> Result<()> {
        let decimal = match number {
            Number::NaN => {
                self.buffer.push(TAG_NAN);
                return Ok(());
            }
            Number::PositiveInfinity => {
                self.buffer.push(TAG_POSITIVE_INFINITY);
                return Ok(());
            }
            Number::NegativeInfinity => {
                self.buffer.push(TAG_NEGATIVE_INFINITY);
                return Ok(());
            }
            Number::Finite(decimal) => decimal,
        };
        if decimal.exponent() == 0 {
            if let Ok(value) = decimal.to_integer::<i64>("i64") {
                self.write_integer(value);
                return Ok(());
            }
        }
        self.write_decimal(decimal)
    }

    fn write_integer(&mut self, value: i64) {
        if let Ok(value) = i8::try_from(value) {
            self.buffer.push(TAG_I8);
            self.buffer.extend_from_slice(&value.to_be_bytes());
        } else if let Ok(value) = i16::try_from(value) {
            self.buffer.push(TAG_I16);
            self.buffer.extend_from_slice(&value.to_be_bytes());
        } else if let Ok(value) = i32::try_from(value) {
            self.buffer.push(TAG_I32);
            self.buffer.extend_from_slice(&value.to_be_bytes());
        } else {
            self.buffer.push(TAG_I64);
            self.buffer.extend_from_slice(&value.to_be_bytes());
        }
    }

    fn write_decimal(&mut self, decimal: &Decimal) -> Result<()> {
        let scale = i32::try_from(decimal.scale())
            .map_err(|_| Error::serialize("decimal scale does not fit in i32"))?;
        let sign = if decimal.is_negative() {
            Sign::Minus
        } else {
            Sign::Plus
        };
        let unscaled = BigInt::from_biguint(sign, decimal.magnitude()).to_signed_bytes_be();
        self.buffer.push(TAG_DECIMAL);
        self.buffer.extend_from_slice(&scale.to_be_bytes());
        self.write_len(unscaled.len())?;
        self.buffer.extend_from_slice(&unscaled);
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_len(s.len())?;
        self.buffer.extend_from_slice(s.as_bytes());
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len)
            .map_err(|_| Error::serialize("length does not fit in the binary format"))?;
        self.buffer.extend_from_slice(&len.to_be_bytes());
        Ok(())
    }
}

struct BinaryReader<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> BinaryReader<'a> {
    fn read_value(&mut self) -> Result<Value> {
        let tag = self.read_u8()?;
        let value = match tag {
            TAG_OBJECT => self.read_object()?,
            TAG_ARRAY => self.read_array()?,
            TAG_I8 => Value::from(i8::from_be_bytes(self.read_fixed()?)),
            TAG_I16 => Value::from(i16::from_be_bytes(self.read_fixed()?)),
            TAG_I32 => Value::from(i32::from_be_bytes(self.read_fixed()?)),
            TAG_I64 => Value::from(i64::from_be_bytes(self.read_fixed()?)),
            TAG_F32 => Value::Number(Number::from_f32(f32::from_be_bytes(self.read_fixed()?))),
            TAG_F64 => Value::Number(Number::from_f64(f64::from_be_bytes(self.read_fixed()?))),
            TAG_DECIMAL => Value::Number(Number::Finite(self.read_decimal()?)),
            TAG_STRING => Value::String(self.read_string()?),
            TAG_BOOL => match self.read_u8()? {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                _ => return Err(self.error_before(1, "boolean byte is not 0 or 1")),
            },
            TAG_NAN => Value::Number(Number::NaN),
            TAG_POSITIVE_INFINITY => Value::Number(Number::PositiveInfinity),
            TAG_NEGATIVE_INFINITY => Value::Number(Number::NegativeInfinity),
            TAG_NULL => Value::Null,
            other => return Err(self.error_before(1, format!("unknown tag {other}"))),
        };
        Ok(value)
    }

    fn read_object(&mut self) -> Result<Value> {
        let count = self.read_len()?;
        self.enter()?;
        let mut map = Map::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            let key = self.read_string()?;
            let value = self.read_value()?;
            map.insert(key, value);
        }
        self.depth -= 1;
        Ok(Value::Object(map))
    }

    fn read_array(&mut self) -> Result<Value> {
        let count = self.read_len()?;
        self.enter()?;
        let mut items = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            items.push(self.read_value()?);
        }
        self.depth -= 1;
        Ok(Value::Array(items))
    }

    fn read_decimal(&mut self) -> Result<Decimal> {
        let scale = i32::from_be_bytes(self.read_fixed()?);
        let len = self.read_len()?;
        let unscaled = BigInt::from_signed_bytes_be(self.take(len)?);
        let (sign, magnitude) = unscaled.into_parts();
        Ok(Decimal::new(
            sign == Sign::Minus,
            magnitude,
            -i64::from(scale),
        )?)
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.read_len()?;
        let bytes = self.take(len)?;
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_string()),
            Err(_) => Err(self.error_before(len, "string is not valid UTF-8")),
        }
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= DEFAULT_MAX_DEPTH {
            return Err(self.error("nesting exceeds the depth limit"));
        }
        self.depth += 1;
        Ok(())
    }

    fn read_len(&mut self) -> Result<usize> {
        let len = u32::from_be_bytes(self.read_fixed()?);
        usize::try_from(len).map_err(|_| self.error_before(4, "length does not fit in memory"))
    }

    fn read_u8(&mut self) -> Result<u8> {
        let [byte] = self.read_fixed()?;
        Ok(byte)
    }

    fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let input = self.input;
        match self.pos.checked_add(len) {
            Some(end) if end <= input.len() => {
                let bytes = &input[self.pos..end];
                self.pos = end;
                Ok(bytes)
            }
            _ => Err(self.error("unexpected end of data")),
        }
    }

    fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::Binary {
            offset: self.pos,
            reason: reason.into(),
        }
    }

    /// Error pointing at the start of the `len` bytes just read.
    fn error_before(&self, len: usize, reason: impl Into<String>) -> Error {
        Error::Binary {
            offset: self.pos.saturating_sub(len),
            reason: reason.into(),
        }
    }
}
