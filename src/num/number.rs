use std::fmt;
use std::str::FromStr;

use crate::decode::cursor::Cursor;
use crate::decode::scanner::scan_number;
use crate::decode::Halt;
use crate::error::{NonFinite, NumberError};
use crate::num::decimal::Decimal;
use crate::options::Dialect;

/// A numeric literal: an exact decimal or one of the three non-finite values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Number {
    Finite(Decimal),
    NaN,
    PositiveInfinity,
    NegativeInfinity,
}

macro_rules! integer_coercions {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            pub fn $name(&self) -> Result<$ty, NumberError> {
                self.finite()?.to_integer::<$ty>(stringify!($ty))
            }
        )*
    };
}

impl Number {
    pub fn is_finite(&self) -> bool {
        matches!(self, Number::Finite(_))
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Number::NaN)
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Number::PositiveInfinity | Number::NegativeInfinity)
    }

    pub fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            Number::Finite(decimal) => Some(decimal),
            _ => None,
        }
    }

    pub fn non_finite(&self) -> Option<NonFinite> {
        match self {
            Number::Finite(_) => None,
            Number::NaN => Some(NonFinite::NaN),
            Number::PositiveInfinity => Some(NonFinite::PositiveInfinity),
            Number::NegativeInfinity => Some(NonFinite::NegativeInfinity),
        }
    }

    fn finite(&self) -> Result<&Decimal, NumberError> {
        match self {
            Number::Finite(decimal) => Ok(decimal),
            Number::NaN => Err(NumberError::NotARealNumber(NonFinite::NaN)),
            Number::PositiveInfinity => {
                Err(NumberError::NotARealNumber(NonFinite::PositiveInfinity))
            }
            Number::NegativeInfinity => {
                Err(NumberError::NotARealNumber(NonFinite::NegativeInfinity))
            }
        }
    }

    integer_coercions! {
        as_i8 => i8,
        as_i16 => i16,
        as_i32 => i32,
        as_i64 => i64,
        as_i128 => i128,
        as_u8 => u8,
        as_u16 => u16,
        as_u32 => u32,
        as_u64 => u64,
    }

    pub fn as_u128(&self) -> Result<u128, NumberError> {
        self.finite()?.to_u128()
    }

    pub fn as_f64(&self) -> Result<f64, NumberError> {
        self.finite()?.to_f64()
    }

    pub fn as_f32(&self) -> Result<f32, NumberError> {
        self.finite()?.to_f32()
    }

    /// Lossy float view: non-finite variants map to their IEEE counterparts.
    pub fn to_f64_lossy(&self) -> f64 {
        match self {
            Number::Finite(decimal) => decimal.to_f64().unwrap_or_else(|_| {
                if decimal.is_negative() {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                }
            }),
            Number::NaN => f64::NAN,
            Number::PositiveInfinity => f64::INFINITY,
            Number::NegativeInfinity => f64::NEG_INFINITY,
        }
    }

    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Number::NaN
        } else if value == f64::INFINITY {
            Number::PositiveInfinity
        } else if value == f64::NEG_INFINITY {
            Number::NegativeInfinity
        } else {
            Decimal::from_f64(value)
                .map(Number::Finite)
                .unwrap_or(Number::NaN)
        }
    }

    pub fn from_f32(value: f32) -> Self {
        if value.is_finite() {
            Decimal::from_f32(value)
                .map(Number::Finite)
                .unwrap_or(Number::NaN)
        } else {
            Number::from_f64(f64::from(value))
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Finite(decimal) => fmt::Display::fmt(decimal, f),
            Number::NaN => f.write_str("NaN"),
            Number::PositiveInfinity => f.write_str("Infinity"),
            Number::NegativeInfinity => f.write_str("-Infinity"),
        }
    }
}

/// Parses one JSON5 numeric literal (`0x1F`, `-Infinity`, `.5e3`, ...).
impl FromStr for Number {
    type Err = NumberError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let malformed = || NumberError::Malformed(text.to_string());
        let mut cursor = Cursor::new(text, true);
        match scan_number(&mut cursor, Dialect::Json5) {
            Ok(number) if cursor.at_end() => Ok(number),
            Ok(_) | Err(Halt::Suspend) | Err(Halt::Fail(_)) => Err(malformed()),
        }
    }
}

impl From<Decimal> for Number {
    fn from(decimal: Decimal) -> Self {
        Number::Finite(decimal)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number::Finite(Decimal::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::from_f32(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case("42", "42")]
    #[case("-0", "0")]
    #[case("0x1F", "31")]
    #[case("-0XfF", "-255")]
    #[case(".5", "0.5")]
    #[case("5.", "5")]
    #[case("+1.50e2", "150")]
    #[case("Infinity", "Infinity")]
    #[case("-Infinity", "-Infinity")]
    #[case("-NaN", "NaN")]
    fn test_from_str_and_display(#[case] input: &str, #[case] expected: &str) {
        let number: Number = input.parse().unwrap();
        assert_eq!(number.to_string(), expected);
    }

    #[rstest::rstest]
    #[case("1 ")]
    #[case("abc")]
    #[case("1e")]
    #[case("")]
    fn test_from_str_rejects(#[case] input: &str) {
        assert!(input.parse::<Number>().is_err());
    }

    #[rstest::rstest]
    fn test_non_finite_coercion_fails() {
        assert_eq!(
            Number::NaN.as_i64(),
            Err(NumberError::NotARealNumber(NonFinite::NaN))
        );
        assert_eq!(
            Number::NegativeInfinity.as_f64(),
            Err(NumberError::NotARealNumber(NonFinite::NegativeInfinity))
        );
        assert_eq!(
            Number::PositiveInfinity.as_u8(),
            Err(NumberError::NotARealNumber(NonFinite::PositiveInfinity))
        );
    }

    #[rstest::rstest]
    fn test_finite_coercions() {
        let number: Number = "1.9".parse().unwrap();
        assert_eq!(number.as_i32().unwrap(), 1);
        assert_eq!(number.as_f64().unwrap(), 1.9);
        let number: Number = "256".parse().unwrap();
        assert_eq!(number.as_u8(), Err(NumberError::OutOfRange("u8")));
        assert_eq!(number.as_u16().unwrap(), 256);
    }

    #[rstest::rstest]
    fn test_from_float() {
        assert_eq!(Number::from(f64::NAN), Number::NaN);
        assert_eq!(Number::from(f64::NEG_INFINITY), Number::NegativeInfinity);
        assert_eq!(Number::from(0.25).to_string(), "0.25");
        assert_eq!(Number::from(2.5f32).as_f32().unwrap(), 2.5);
    }

    #[rstest::rstest]
    fn test_equality_is_numeric() {
        let a: Number = "1.50".parse().unwrap();
        let b: Number = "1.5".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(Number::NaN, Number::NaN);
        assert_ne!(Number::PositiveInfinity, Number::NegativeInfinity);
    }
}
